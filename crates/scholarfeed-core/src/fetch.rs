use tracing::{debug, info, warn};

use crate::catalog::static_catalog;
use crate::config::FeedConfig;
use crate::sources::scholar::ScholarHtmlSource;
use crate::sources::serp::SerpApiSource;
use crate::sources::{PublicationSource, RelayStatus};
use crate::types::{FeedSource, Publication};

/// What a fetch pass produced, and which stage produced it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub source: FeedSource,
    pub publications: Vec<Publication>,
}

/// Ordered retrieval: the relay-scraped profile page, then the structured
/// alternate through the first relay, then the static catalog.
///
/// Infallible by construction — every stage's errors are logged and the
/// catalog terminates the chain with non-empty data.
pub struct PublicationFetcher {
    primary: ScholarHtmlSource,
    alternate: SerpApiSource,
}

impl PublicationFetcher {
    pub fn new(config: &FeedConfig) -> Self {
        let first_relay = config.relays.first().cloned().unwrap_or_default();
        Self {
            primary: ScholarHtmlSource::new(config.relays.clone(), config.profile_url()),
            alternate: SerpApiSource::new(first_relay, config.serp_url()),
        }
    }

    pub async fn fetch_publications(&self) -> FetchOutcome {
        match self.primary.fetch().await {
            Ok(publications) if !publications.is_empty() => {
                info!(
                    "{}: fetched {} publication(s)",
                    self.primary.name(),
                    publications.len()
                );
                return FetchOutcome {
                    source: FeedSource::Scholar,
                    publications,
                };
            }
            Ok(_) => debug!("{}: no records", self.primary.name()),
            Err(err) => warn!("{}: {err}", self.primary.name()),
        }

        match self.alternate.fetch().await {
            Ok(publications) if !publications.is_empty() => {
                info!(
                    "{}: fetched {} publication(s)",
                    self.alternate.name(),
                    publications.len()
                );
                return FetchOutcome {
                    source: FeedSource::Alternate,
                    publications,
                };
            }
            Ok(_) => debug!("{}: no records", self.alternate.name()),
            Err(err) => warn!("{}: {err}", self.alternate.name()),
        }

        info!("all remote sources failed; serving the static catalog");
        FetchOutcome {
            source: FeedSource::Static,
            publications: static_catalog(),
        }
    }

    pub async fn probe_relays(&self) -> Vec<RelayStatus> {
        self.primary.probe_relays().await
    }
}
