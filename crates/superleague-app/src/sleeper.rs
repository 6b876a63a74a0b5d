// Sleeper API client implementing the engine's data source.
//
// Plain JSON GETs against the public read-only API, with responses cached in
// memory: league, roster and user data for the slow TTL, platform state and
// matchups for the live TTL.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use superleague_core::error::FetchError;
use superleague_core::model::{LeagueInfo, PlatformState};
use superleague_core::source::LeagueDataSource;

use crate::cache::TtlCache;
use crate::config::Config;

const USER_AGENT: &str = concat!("superleague/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Sleeper v1 API.
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
    sport: String,
    league_ttl: Duration,
    live_ttl: Duration,
    cache: TtlCache<Value>,
}

impl SleeperClient {
    /// Build a client from the platform and cache sections of the config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.platform.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.platform.base_url.trim_end_matches('/').to_string(),
            sport: config.platform.sport.clone(),
            league_ttl: Duration::from_secs(config.cache.league_ttl_secs),
            live_ttl: Duration::from_secs(config.cache.live_ttl_secs),
            cache: TtlCache::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET `path` as JSON, served from the cache while fresh.
    async fn get_json(&self, path: &str, ttl: Duration) -> Result<(String, Value), FetchError> {
        let url = self.url(path);
        if let Some(value) = self.cache.get(&url) {
            debug!(%url, "cache hit");
            return Ok((url, value));
        }

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let value: Value = response.json().await.map_err(|e| FetchError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;

        debug!(%url, "fetched");
        self.cache.insert(url.clone(), value.clone(), ttl);
        Ok((url, value))
    }
}

#[async_trait]
impl LeagueDataSource for SleeperClient {
    async fn fetch_league_info(&self, league_id: &str) -> Result<Option<LeagueInfo>, FetchError> {
        let (url, value) = self
            .get_json(&format!("league/{league_id}"), self.league_ttl)
            .await?;
        decode_optional(&url, value)
    }

    async fn fetch_rosters(&self, league_id: &str) -> Result<Vec<Value>, FetchError> {
        let (url, value) = self
            .get_json(&format!("league/{league_id}/rosters"), self.league_ttl)
            .await?;
        decode_list(&url, value)
    }

    async fn fetch_users(&self, league_id: &str) -> Result<Vec<Value>, FetchError> {
        let (url, value) = self
            .get_json(&format!("league/{league_id}/users"), self.league_ttl)
            .await?;
        decode_list(&url, value)
    }

    async fn fetch_week_matchups(
        &self,
        league_id: &str,
        week: u32,
    ) -> Result<Vec<Value>, FetchError> {
        let (url, value) = self
            .get_json(&format!("league/{league_id}/matchups/{week}"), self.live_ttl)
            .await?;
        decode_list(&url, value)
    }

    async fn fetch_platform_state(&self) -> Result<Option<PlatformState>, FetchError> {
        let (url, value) = self
            .get_json(&format!("state/{}", self.sport), self.live_ttl)
            .await?;
        decode_optional(&url, value)
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

/// A JSON `null` body means the resource doesn't exist.
fn decode_optional<T: DeserializeOwned>(url: &str, value: Value) -> Result<Option<T>, FetchError> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
}

/// Array bodies pass through; `null` is an empty list.
fn decode_list(url: &str, value: Value) -> Result<Vec<Value>, FetchError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(FetchError::Decode {
            url: url.to_string(),
            message: format!("expected a JSON array, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
