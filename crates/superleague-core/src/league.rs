// League hierarchy: the ordered table of leagues that make up the super league.

use serde::Serialize;

/// Prefix used by the shipped config template for ids that still need filling in.
const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// One league and its position in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueRef {
    pub name: String,
    pub external_id: String,
    /// 0 is the top tier; `total_leagues - 1` is the bottom tier.
    pub hierarchy_index: usize,
    pub total_leagues: usize,
}

impl LeagueRef {
    /// Whether the league id has actually been configured.
    pub fn is_configured(&self) -> bool {
        let id = self.external_id.trim();
        !id.is_empty() && !id.starts_with(PLACEHOLDER_PREFIX)
    }
}

/// Immutable, ordered table of leagues. Table order is hierarchy order.
///
/// Leagues with a missing or placeholder id keep their slot (they still count
/// toward `total_leagues`, so the zones of the other tiers don't shift) but
/// are excluded from aggregation via [`LeagueRegistry::configured`].
#[derive(Debug, Clone, Default)]
pub struct LeagueRegistry {
    leagues: Vec<LeagueRef>,
}

impl LeagueRegistry {
    /// Build a registry from `(name, external_id)` pairs, top tier first.
    pub fn new<I, N, S>(leagues: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let pairs: Vec<(String, String)> = leagues
            .into_iter()
            .map(|(name, id)| (name.into(), id.into()))
            .collect();
        let total_leagues = pairs.len();

        let leagues = pairs
            .into_iter()
            .enumerate()
            .map(|(hierarchy_index, (name, external_id))| LeagueRef {
                name,
                external_id,
                hierarchy_index,
                total_leagues,
            })
            .collect();

        LeagueRegistry { leagues }
    }

    pub fn len(&self) -> usize {
        self.leagues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty()
    }

    /// All leagues in hierarchy order.
    pub fn iter(&self) -> impl Iterator<Item = &LeagueRef> {
        self.leagues.iter()
    }

    /// Leagues with a usable id, in hierarchy order.
    pub fn configured(&self) -> impl Iterator<Item = &LeagueRef> {
        self.leagues.iter().filter(|l| l.is_configured())
    }

    /// Leagues whose id is unset or still the template placeholder.
    pub fn missing(&self) -> impl Iterator<Item = &LeagueRef> {
        self.leagues.iter().filter(|l| !l.is_configured())
    }

    pub fn by_name(&self, name: &str) -> Option<&LeagueRef> {
        self.leagues.iter().find(|l| l.name == name)
    }
}
