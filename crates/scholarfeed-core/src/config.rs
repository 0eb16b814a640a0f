use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FeedError, Result};

pub const DEFAULT_RELAYS: &[&str] = &[
    "https://api.allorigins.win/raw?url=",
    "https://cors-anywhere.herokuapp.com/",
    "https://crossorigin.me/",
];

const DEFAULT_SCHOLAR_ID: &str = "4aPlo98AAAAJ";
const CONFIG_ENV: &str = "SCHOLARFEED_CONFIG";
const CONFIG_FILE: &str = "scholarfeed.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Google Scholar profile identifier (`citations?user=...`).
    pub scholar_id: String,
    /// CORS-bridging relay prefixes, tried in round-robin order.
    pub relays: Vec<String>,
    /// Where the rendered fragment is written. Content is fully replaced
    /// on every render.
    pub output_path: PathBuf,
    /// Overrides the platform-default cache slot location.
    pub cache_path: Option<PathBuf>,
    pub highlight: HighlightRules,
}

/// Author-name variants wrapped in `<strong>` when rendering author lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightRules {
    /// Citation form, also matched with a trailing `*` or `#` marker.
    pub short_name: String,
    /// Spelled-out form; a period after the middle initial is optional.
    pub full_name: String,
}

impl Default for HighlightRules {
    fn default() -> Self {
        Self {
            short_name: "Nair S".to_string(),
            full_name: "Shailesh S. Nair".to_string(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            scholar_id: DEFAULT_SCHOLAR_ID.to_string(),
            relays: DEFAULT_RELAYS.iter().map(|r| (*r).to_string()).collect(),
            output_path: PathBuf::from("publications.html"),
            cache_path: None,
            highlight: HighlightRules::default(),
        }
    }
}

impl FeedConfig {
    /// Load from `$SCHOLARFEED_CONFIG`, then `./scholarfeed.toml`, then
    /// defaults. An unreadable file is logged and ignored.
    pub fn load() -> Self {
        let candidate = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .ok()
            .or_else(|| {
                let local = PathBuf::from(CONFIG_FILE);
                local.exists().then_some(local)
            });

        let Some(path) = candidate else {
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!("config: falling back to defaults: {err}");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FeedError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&text)
            .map_err(|e| FeedError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    pub fn profile_url(&self) -> String {
        format!(
            "https://scholar.google.com/citations?user={}&hl=en&cstart=0&pagesize=100",
            self.scholar_id
        )
    }

    pub fn serp_url(&self) -> String {
        format!(
            "https://serpapi.com/search.json?engine=google_scholar_author&author_id={}&hl=en&num=100",
            self.scholar_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_three_relays() {
        let config = FeedConfig::default();
        assert_eq!(config.relays.len(), 3);
        assert!(config.profile_url().contains(DEFAULT_SCHOLAR_ID));
        assert!(config.serp_url().starts_with("https://serpapi.com/"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.toml");
        std::fs::write(&path, "scholar_id = \"abc123\"\n").unwrap();

        let config = FeedConfig::from_file(&path).unwrap();
        assert_eq!(config.scholar_id, "abc123");
        assert_eq!(config.relays.len(), 3);
        assert_eq!(config.highlight.short_name, "Nair S");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.toml");
        std::fs::write(&path, "relays = 7\n").unwrap();

        assert!(matches!(
            FeedConfig::from_file(&path),
            Err(FeedError::Config(_))
        ));
    }
}
