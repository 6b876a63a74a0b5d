// Super league dashboard entry point.
//
// Startup sequence:
// 1. Parse command-line arguments
// 2. Initialize tracing (log to file, stdout is reserved for the report)
// 3. Load config (copying defaults on first run)
// 4. Build the league registry and the Sleeper client
// 5. Assemble the report and print it, once or on every refresh tick

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use superleague_app::config::{self, Config};
use superleague_app::sleeper::SleeperClient;
use superleague_app::summary;
use superleague_core::report::{build_report, SuperLeagueReport};

#[derive(Parser)]
#[command(name = "superleague")]
#[command(about = "Standings and weekly highlights for a promotion/relegation fantasy league")]
#[command(version)]
struct Cli {
    /// Directory containing `config/` and `defaults/`
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Keep running and reprint the report every `dashboard.refresh_secs`
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.base_dir)?;
    info!("Super league dashboard starting up");

    let config = config::load_config_in(&cli.base_dir).context("failed to load configuration")?;
    let registry = config.registry();
    info!(
        "Config loaded: {} leagues ({} configured)",
        registry.len(),
        registry.configured().count()
    );

    let missing: Vec<&str> = registry.missing().map(|l| l.name.as_str()).collect();
    if !missing.is_empty() {
        warn!("Setup required: no league id for {}", missing.join(", "));
    }

    let client = SleeperClient::from_config(&config)?;
    let settings = config.report_settings();

    if !cli.watch {
        let report = build_report(&client, &registry, &settings).await;
        print_report(&config, &report, cli.json)?;
        info!("Report written ({} issues)", report.issues.len());
        return Ok(());
    }

    // The client's cache lives across ticks, so each refresh only refetches
    // what has expired.
    let mut refresh = tokio::time::interval(Duration::from_secs(config.dashboard.refresh_secs));
    info!("Watching, refresh every {}s", config.dashboard.refresh_secs);

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                let report = build_report(&client, &registry, &settings).await;
                print_report(&config, &report, cli.json)?;
                info!("Report refreshed ({} issues)", report.issues.len());
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn print_report(config: &Config, report: &SuperLeagueReport, json: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, report).context("failed to write JSON report")?;
    } else {
        summary::write_report(
            &mut out,
            &config.dashboard.title,
            config.dashboard.timezone,
            report,
        )
        .context("failed to write report")?;
    }
    std::io::Write::write_all(&mut out, b"\n")?;
    std::io::Write::flush(&mut out)?;
    Ok(())
}

/// Initialize tracing to log to a file under `logs/`.
fn init_tracing(base_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("superleague.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("superleague=info,superleague_core=info,superleague_app=info,warn")
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
