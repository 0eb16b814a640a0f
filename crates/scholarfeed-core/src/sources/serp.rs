use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::doi::extract_doi;
use crate::error::Result;
use crate::http::RelayClient;
use crate::sources::PublicationSource;
use crate::types::Publication;

/// Last-resort structured source: a SerpAPI-shaped author endpoint, reached
/// through a single relay. Response shape is an `articles` array with
/// `title/authors/publication/year/link` fields.
pub struct SerpApiSource {
    client: RelayClient,
    relay: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    articles: Vec<SerpArticle>,
}

#[derive(Debug, Deserialize)]
struct SerpArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: String,
    #[serde(default)]
    publication: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    link: String,
}

impl SerpApiSource {
    pub fn new(relay: String, api_url: String) -> Self {
        Self {
            client: RelayClient::new(),
            relay,
            api_url,
        }
    }
}

#[async_trait]
impl PublicationSource for SerpApiSource {
    fn name(&self) -> &'static str {
        "serp-api"
    }

    async fn fetch(&self) -> Result<Vec<Publication>> {
        let url = format!("{}{}", self.relay, urlencoding::encode(&self.api_url));
        let resp: SerpResponse = self.client.get_json(&url).await?;

        let publications: Vec<Publication> = resp
            .articles
            .into_iter()
            .filter_map(|article| {
                let doi = extract_doi(&article.link).unwrap_or_default();
                let publication = Publication {
                    title: article.title,
                    authors: article.authors,
                    venue: article.publication,
                    year: article.year,
                    doi,
                    link: article.link,
                };
                publication.is_displayable().then_some(publication)
            })
            .collect();

        debug!("serp: mapped {} article(s)", publications.len());
        Ok(publications)
    }
}
