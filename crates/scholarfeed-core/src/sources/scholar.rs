use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::doi::extract_doi;
use crate::error::{FeedError, Result};
use crate::http::RelayClient;
use crate::sources::{PublicationSource, RelayStatus};
use crate::types::Publication;

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".gsc_a_tr").expect("valid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".gsc_a_at").expect("valid selector"));
static GRAY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".gs_gray").expect("valid selector"));
static YEAR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".gsc_a_y").expect("valid selector"));

/// Extract publication rows from a Scholar profile page.
///
/// Rows missing a title, authors, or year are skipped; a malformed row never
/// aborts the rest. Document order is preserved — sorting is the renderer's
/// job. The title anchor's href only feeds DOI extraction: scraped hrefs are
/// relative profile links, so `link` stays empty and linking is DOI-based.
pub fn parse_profile_page(html: &str) -> Vec<Publication> {
    let document = Html::parse_document(html);
    let mut publications = Vec::new();

    for row in document.select(&ROW_SELECTOR) {
        let Some(title_el) = row.select(&TITLE_SELECTOR).next() else {
            continue;
        };
        let title = element_text(title_el);
        let href = title_el.value().attr("href").unwrap_or_default();

        let mut grays = row.select(&GRAY_SELECTOR);
        let authors = grays.next().map(element_text).unwrap_or_default();
        let venue = grays.next().map(element_text).unwrap_or_default();
        let year = row
            .select(&YEAR_SELECTOR)
            .next()
            .map(element_text)
            .unwrap_or_default();

        if title.is_empty() || authors.is_empty() || year.is_empty() {
            debug!("scholar: skipping incomplete row (title: {title:?})");
            continue;
        }

        publications.push(Publication {
            title,
            authors,
            venue,
            year,
            doi: extract_doi(href).unwrap_or_default(),
            link: String::new(),
        });
    }

    publications
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scrapes the profile page through CORS-bridging relays.
///
/// The rotation index survives across calls and advances only on failure, so
/// a relay that failed last time is not the first one tried next time.
pub struct ScholarHtmlSource {
    client: RelayClient,
    relays: Vec<String>,
    profile_url: String,
    current_relay: AtomicUsize,
}

impl ScholarHtmlSource {
    pub fn new(relays: Vec<String>, profile_url: String) -> Self {
        Self {
            client: RelayClient::new(),
            relays,
            profile_url,
            current_relay: AtomicUsize::new(0),
        }
    }

    pub fn rotation_index(&self) -> usize {
        self.current_relay.load(Ordering::Relaxed)
    }

    pub fn reset_rotation(&self) {
        self.current_relay.store(0, Ordering::Relaxed);
    }

    /// GET each relay once and report reachability.
    pub async fn probe_relays(&self) -> Vec<RelayStatus> {
        let mut statuses = Vec::new();
        for relay in &self.relays {
            let url = self.relayed_url(relay);
            let start = Instant::now();
            let reachable = self.client.get_text(&url).await.is_ok();
            statuses.push(RelayStatus {
                relay: relay.clone(),
                reachable,
                latency_ms: start.elapsed().as_millis() as u64,
            });
        }
        statuses
    }

    fn relayed_url(&self, relay: &str) -> String {
        format!("{relay}{}", urlencoding::encode(&self.profile_url))
    }

    fn advance_rotation(&self) {
        let len = self.relays.len().max(1);
        let next = (self.current_relay.load(Ordering::Relaxed) + 1) % len;
        self.current_relay.store(next, Ordering::Relaxed);
    }

    async fn fetch_via_relays(&self) -> Result<Vec<Publication>> {
        let mut last_error: Option<FeedError> = None;

        for _ in 0..self.relays.len() {
            let relay = &self.relays[self.rotation_index() % self.relays.len()];
            match self.client.get_text(&self.relayed_url(relay)).await {
                Ok(html) => {
                    let publications = parse_profile_page(&html);
                    if !publications.is_empty() {
                        return Ok(publications);
                    }
                    debug!("scholar: {relay} returned a page with no entries");
                    self.advance_rotation();
                    last_error = Some(FeedError::Parse(format!("no entries via {relay}")));
                }
                Err(err) => {
                    warn!("scholar: {relay} failed: {err}");
                    self.advance_rotation();
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FeedError::Relay(self.profile_url.clone(), "no relays".to_string())))
    }
}

#[async_trait]
impl PublicationSource for ScholarHtmlSource {
    fn name(&self) -> &'static str {
        "scholar-html"
    }

    async fn fetch(&self) -> Result<Vec<Publication>> {
        self.fetch_via_relays().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const PROFILE_FIXTURE: &str = include_str!("fixtures/scholar_profile.html");

    #[test]
    fn parses_fixture_rows_in_document_order() {
        let publications = parse_profile_page(PROFILE_FIXTURE);

        assert_eq!(publications.len(), 3);
        assert_eq!(
            publications[0].title,
            "Inherent tendency of Synechococcus and heterotrophic bacteria for mutualism on long-term coexistence"
        );
        assert_eq!(publications[0].authors, "S Nair, Z Zhang, H Li");
        assert_eq!(publications[0].venue, "Science Advances 8 (32)");
        assert_eq!(publications[0].year, "2022");
        assert_eq!(publications[0].doi, "10.1126/sciadv.abf4792");
        assert_eq!(publications[0].link, "");

        // Source order, not year order.
        assert_eq!(publications[1].year, "2024");
        assert_eq!(publications[2].year, "2021");
    }

    #[test]
    fn relative_href_leaves_doi_empty() {
        let publications = parse_profile_page(PROFILE_FIXTURE);
        assert_eq!(publications[1].doi, "");
    }

    #[test]
    fn row_without_year_is_skipped() {
        let html = r#"
            <table>
              <tr class="gsc_a_tr">
                <td><a class="gsc_a_at" href="/citations?view_op=x">Complete entry</a>
                    <div class="gs_gray">Nair S, Zhang Z</div>
                    <div class="gs_gray">mBio 12 (4)</div></td>
                <td class="gsc_a_y"><span>2021</span></td>
              </tr>
              <tr class="gsc_a_tr">
                <td><a class="gsc_a_at" href="/citations?view_op=y">No year marker</a>
                    <div class="gs_gray">Nair S</div></td>
                <td class="gsc_a_y"><span></span></td>
              </tr>
            </table>"#;

        let publications = parse_profile_page(html);
        assert_eq!(publications.len(), 1);
        assert_eq!(publications[0].title, "Complete entry");
    }

    #[test]
    fn garbage_input_parses_to_nothing() {
        assert!(parse_profile_page("not html at all").is_empty());
        assert!(parse_profile_page("").is_empty());
    }

    #[tokio::test]
    async fn first_reachable_relay_short_circuits() {
        let mut server = Server::new_async().await;
        let profile_url = "https://scholar.example/citations?user=test".to_string();
        let encoded = urlencoding::encode(&profile_url).into_owned();

        let hit = server
            .mock("GET", format!("/a?url={encoded}").as_str())
            .with_status(200)
            .with_body(PROFILE_FIXTURE)
            .create_async()
            .await;

        let source = ScholarHtmlSource::new(
            vec![
                format!("{}/a?url=", server.url()),
                format!("{}/b?url=", server.url()),
            ],
            profile_url,
        );

        let publications = source.fetch().await.unwrap();
        assert_eq!(publications.len(), 3);
        assert_eq!(source.rotation_index(), 0, "no failure, no advance");
        hit.assert_async().await;
    }

    #[tokio::test]
    async fn failed_relay_advances_rotation_before_next_attempt() {
        let mut server = Server::new_async().await;
        let profile_url = "https://scholar.example/citations?user=test".to_string();
        let encoded = urlencoding::encode(&profile_url).into_owned();

        let _down = server
            .mock("GET", format!("/a?url={encoded}").as_str())
            .with_status(502)
            .create_async()
            .await;
        let up = server
            .mock("GET", format!("/b?url={encoded}").as_str())
            .with_status(200)
            .with_body(PROFILE_FIXTURE)
            .create_async()
            .await;

        let source = ScholarHtmlSource::new(
            vec![
                format!("{}/a?url=", server.url()),
                format!("{}/b?url=", server.url()),
            ],
            profile_url,
        );

        let publications = source.fetch().await.unwrap();
        assert_eq!(publications.len(), 3);
        assert_eq!(source.rotation_index(), 1, "rotation stays past the dead relay");
        up.assert_async().await;
    }

    #[tokio::test]
    async fn all_relays_down_is_an_error() {
        let server = Server::new_async().await;
        let source = ScholarHtmlSource::new(
            vec![
                format!("{}/a?url=", server.url()),
                format!("{}/b?url=", server.url()),
            ],
            "https://scholar.example/citations?user=test".to_string(),
        );

        assert!(source.fetch().await.is_err());
        // Two failures walk the index all the way around.
        assert_eq!(source.rotation_index(), 0);
    }
}
