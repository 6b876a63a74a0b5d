// Plain-text rendering of a report for the terminal.

use std::io::{self, Write};

use chrono_tz::Tz;

use superleague_core::highlights::{ClosestMatchup, Highlight, HighlightSet, ScorerHighlight};
use superleague_core::report::{LeagueStandings, SuperLeagueReport};
use superleague_core::standings::Zone;

/// Write the whole report: header, one table per league, highlights, warnings.
pub fn write_report<W: Write>(
    out: &mut W,
    title: &str,
    timezone: Tz,
    report: &SuperLeagueReport,
) -> io::Result<()> {
    let updated = report.generated_at.with_timezone(&timezone);
    writeln!(out, "{title}")?;
    writeln!(out, "Last updated: {}", updated.format("%B %d, %Y at %I:%M %p %Z"))?;
    if let Some(state) = &report.platform {
        writeln!(out, "Current week: {}", state.week)?;
    }
    writeln!(out)?;

    for league in &report.standings {
        write_standings(out, league)?;
        writeln!(out)?;
    }

    match report.weekly.selection.week {
        Some(week) => {
            let caption = if report.weekly.selection.provisional {
                format!("Week {week} highlights (provisional, not all games final)")
            } else {
                format!("Week {week} highlights")
            };
            write_highlights(out, &caption, &report.weekly.highlights)?;
        }
        None => writeln!(out, "Weekly highlights: no data available")?,
    }
    writeln!(out)?;

    let caption = match report.season.before_week {
        Some(week) if week > 1 => format!("Season highlights (weeks 1-{})", week - 1),
        _ => "Season highlights".to_string(),
    };
    write_highlights(out, &caption, &report.season.highlights)?;

    if !report.issues.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings:")?;
        for issue in &report.issues {
            writeln!(out, "  - {issue}")?;
        }
    }

    Ok(())
}

fn write_standings<W: Write>(out: &mut W, league: &LeagueStandings) -> io::Result<()> {
    writeln!(out, "== {} ==", league.league.name)?;
    let Some(rows) = &league.rows else {
        return writeln!(out, "Could not load data for {}", league.league.name);
    };

    let width = rows
        .iter()
        .map(|r| r.team_name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    writeln!(
        out,
        "{:>4}  {:<width$}  {:>3} {:>3} {:>3}  {:>8} {:>8}",
        "Rank", "Team", "W", "L", "T", "PF", "PA"
    )?;
    for row in rows {
        let marker = match row.zone {
            Zone::Promotion => "  ^",
            Zone::Demotion => "  v",
            Zone::None => "",
        };
        writeln!(
            out,
            "{:>4}  {:<width$}  {:>3} {:>3} {:>3}  {:>8.1} {:>8.1}{marker}",
            row.rank,
            row.team_name,
            row.wins,
            row.losses,
            row.ties,
            row.points_for,
            row.points_against,
        )?;
    }
    Ok(())
}

fn write_highlights<W: Write>(out: &mut W, caption: &str, set: &HighlightSet) -> io::Result<()> {
    writeln!(out, "{caption}")?;
    if set.is_empty() {
        return writeln!(out, "  No data available");
    }
    for highlight in set.clone().into_highlights() {
        match &highlight {
            Highlight::Top(s) => writeln!(out, "  Top scorer:      {}", scorer_line(s))?,
            Highlight::Bottom(s) => writeln!(out, "  Bottom scorer:   {}", scorer_line(s))?,
            Highlight::Closest(c) => writeln!(out, "  Closest matchup: {}", closest_line(c))?,
        }
    }
    Ok(())
}

fn scorer_line(s: &ScorerHighlight) -> String {
    match s.week {
        Some(week) => format!("{} ({}, week {week}) {:.2}", s.team_name, s.league_name, s.points),
        None => format!("{} ({}) {:.2}", s.team_name, s.league_name, s.points),
    }
}

fn closest_line(c: &ClosestMatchup) -> String {
    let sides: Vec<String> = c
        .sides
        .iter()
        .map(|s| format!("{} {:.2}", s.team_name, s.points))
        .collect();
    let week = c.week.map(|w| format!(", week {w}")).unwrap_or_default();
    format!(
        "{} ({}{week}, margin {:.2})",
        sides.join(" vs "),
        c.league_name,
        c.differential
    )
}
