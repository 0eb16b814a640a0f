use std::fmt;

use serde::{Deserialize, Serialize};

/// One publication record. `doi` and `link` use the empty string for
/// "absent", matching the cached JSON shape; `doi` wins when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub authors: String,
    #[serde(default)]
    pub venue: String,
    pub year: String,
    #[serde(default)]
    pub doi: String,
    #[serde(default)]
    pub link: String,
}

impl Publication {
    /// Records without a title, authors, or year are never shown.
    pub fn is_displayable(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.authors.trim().is_empty()
            && !self.year.trim().is_empty()
    }
}

/// Which stage of the pipeline ended up serving the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Cache,
    Scholar,
    Alternate,
    Static,
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedSource::Cache => "cache",
            FeedSource::Scholar => "scholar profile",
            FeedSource::Alternate => "alternate api",
            FeedSource::Static => "static catalog",
        };
        f.write_str(name)
    }
}
