use std::path::Path;

use tracing::{info, warn};

use crate::cache::SlotCache;
use crate::catalog::static_catalog;
use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::fetch::PublicationFetcher;
use crate::render::render_publications;
use crate::types::{FeedSource, Publication};

/// Outcome of one load pass: which stage served the list, how many records
/// were rendered, and any non-fatal trouble along the way.
#[derive(Debug)]
pub struct LoadReport {
    pub source: FeedSource,
    pub rendered: usize,
    pub errors: Vec<String>,
}

/// Sequences cache lookup, the remote fetch chain, the fallback catalog,
/// the cache write-back, and the render to the output file.
pub struct Pipeline {
    config: FeedConfig,
    cache: SlotCache,
    fetcher: PublicationFetcher,
}

impl Pipeline {
    pub fn new(config: FeedConfig) -> Self {
        let cache = match &config.cache_path {
            Some(path) => SlotCache::at(path.clone()),
            None => SlotCache::new(),
        };
        let fetcher = PublicationFetcher::new(&config);
        Self {
            config,
            cache,
            fetcher,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.config.output_path
    }

    /// Never fails: a fresh cache slot wins, otherwise the fetch chain runs
    /// and its result is cached; an empty chain result degrades to the
    /// static catalog without touching the cache.
    pub async fn load(&self) -> LoadReport {
        if let Some(cached) = self.cache.read().await {
            info!("serving {} publication(s) from cache", cached.len());
            return self
                .render_to_output(&cached, FeedSource::Cache, Vec::new())
                .await;
        }

        let outcome = self.fetcher.fetch_publications().await;
        if outcome.publications.is_empty() {
            // Unreachable while the static catalog is non-empty; kept so an
            // emptied catalog can never blank the page.
            warn!("fetch chain produced no records");
            let errors = vec!["fetch chain produced no records".to_string()];
            return self
                .render_to_output(&static_catalog(), FeedSource::Static, errors)
                .await;
        }

        self.cache.write(&outcome.publications).await;
        self.render_to_output(&outcome.publications, outcome.source, Vec::new())
            .await
    }

    /// Manual refresh: drop the cache slot and run a full load.
    pub async fn refresh(&self) -> LoadReport {
        self.cache.invalidate().await;
        self.load().await
    }

    async fn render_to_output(
        &self,
        publications: &[Publication],
        source: FeedSource,
        mut errors: Vec<String>,
    ) -> LoadReport {
        let html = render_publications(publications, &self.config.highlight);
        if let Err(err) = self.replace_output(&html).await {
            warn!("{err}");
            errors.push(err.to_string());
        }
        LoadReport {
            source,
            rendered: publications.len(),
            errors,
        }
    }

    /// Full replacement of the output file's contents.
    async fn replace_output(&self, html: &str) -> Result<()> {
        let path = &self.config.output_path;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| FeedError::OutputWrite(format!("{}: {e}", parent.display())))?;
            }
        }
        tokio::fs::write(path, html)
            .await
            .map_err(|e| FeedError::OutputWrite(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const PROFILE_FIXTURE: &str = include_str!("sources/fixtures/scholar_profile.html");

    fn test_config(server_url: &str, dir: &tempfile::TempDir) -> FeedConfig {
        FeedConfig {
            relays: vec![
                format!("{server_url}/a?url="),
                format!("{server_url}/b?url="),
            ],
            output_path: dir.path().join("publications.html"),
            cache_path: Some(dir.path().join("cache.json")),
            ..FeedConfig::default()
        }
    }

    fn sample() -> Vec<Publication> {
        vec![Publication {
            title: "Cached sentinel title".to_string(),
            authors: "Nair S".to_string(),
            venue: "mBio".to_string(),
            year: "2021".to_string(),
            doi: "10.1128/mBio.01614-21".to_string(),
            link: String::new(),
        }]
    }

    #[tokio::test]
    async fn fresh_cache_bypasses_the_network() {
        let server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.url(), &dir);

        SlotCache::at(config.cache_path.clone().unwrap())
            .write(&sample())
            .await;

        let pipeline = Pipeline::new(config);
        let report = pipeline.load().await;

        assert_eq!(report.source, FeedSource::Cache);
        assert_eq!(report.rendered, 1);
        assert!(report.errors.is_empty());

        let html = std::fs::read_to_string(pipeline.output_path()).unwrap();
        assert!(html.contains("Cached sentinel title"));
    }

    #[tokio::test]
    async fn full_degradation_still_renders_the_catalog() {
        // No cache, no reachable relay, no alternate: the static catalog
        // must land in the output with no surfaced error.
        let server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.url(), &dir);
        let cache_path = config.cache_path.clone().unwrap();

        let pipeline = Pipeline::new(config);
        let report = pipeline.load().await;

        assert_eq!(report.source, FeedSource::Static);
        assert_eq!(report.rendered, 11);
        assert!(report.errors.is_empty());

        let html = std::fs::read_to_string(pipeline.output_path()).unwrap();
        assert!(html.contains("Plastoquinone synthesis inhibition"));

        // The chain's own fallback is a non-empty result, so it is cached.
        let cached = SlotCache::at(cache_path).read().await;
        assert_eq!(cached.map(|p| p.len()), Some(11));
    }

    #[tokio::test]
    async fn refresh_drops_the_cache_and_refetches() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.url(), &dir);
        let encoded = urlencoding::encode(&config.profile_url()).into_owned();

        let _m = server
            .mock("GET", format!("/a?url={encoded}").as_str())
            .with_status(200)
            .with_body(PROFILE_FIXTURE)
            .create_async()
            .await;

        SlotCache::at(config.cache_path.clone().unwrap())
            .write(&sample())
            .await;

        let pipeline = Pipeline::new(config);
        let report = pipeline.refresh().await;

        assert_eq!(report.source, FeedSource::Scholar);
        assert_eq!(report.rendered, 3);

        let html = std::fs::read_to_string(pipeline.output_path()).unwrap();
        assert!(!html.contains("Cached sentinel title"));
        assert!(html.contains("Inherent tendency of Synechococcus"));
    }

    #[tokio::test]
    async fn repeated_loads_replace_the_output_in_full() {
        let server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.url(), &dir);

        let pipeline = Pipeline::new(config);
        pipeline.load().await;
        let first = std::fs::read_to_string(pipeline.output_path()).unwrap();
        pipeline.load().await;
        let second = std::fs::read_to_string(pipeline.output_path()).unwrap();

        assert_eq!(first, second);
    }
}
