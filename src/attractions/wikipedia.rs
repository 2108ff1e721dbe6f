use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use super::AttractionSource;
use crate::config::AttractionsConfig;
use crate::error::FetchError;
use crate::http::ensure_success;

/// Attraction lookup from Wikipedia introductory extracts
pub struct WikipediaAttractions {
    client: Client,
    config: AttractionsConfig,
}

/// Page titles tried for a city, most specific first
#[must_use]
pub fn candidate_titles(city: &str) -> [String; 4] {
    [
        format!("Tourist attractions in {city}"),
        format!("{city} landmarks"),
        format!("Tourism in {city}"),
        city.to_string(),
    ]
}

/// Split an extract into attraction-like sentences.
///
/// Returns nothing unless the extract is longer than `min_extract_chars`.
/// Sentences are period-separated, trimmed, must be longer than
/// `min_sentence_chars` and must not open with a parenthesis.
#[must_use]
pub fn extract_sentences(
    text: &str,
    min_extract_chars: usize,
    min_sentence_chars: usize,
    max_items: usize,
) -> Vec<String> {
    if text.chars().count() <= min_extract_chars {
        return Vec::new();
    }
    text.split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > min_sentence_chars && !s.starts_with('('))
        .take(max_items)
        .map(str::to_string)
        .collect()
}

impl WikipediaAttractions {
    pub fn new(client: Client, config: AttractionsConfig) -> Self {
        Self { client, config }
    }

    async fn lookup(&self, title: &str) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(&self.config.wikipedia_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts"),
                ("titles", title),
                ("exintro", "1"),
                ("redirects", "1"),
                ("explaintext", "1"),
            ])
            .send()
            .await?;

        let body: mediawiki::QueryResponse = ensure_success(response)?.json().await?;
        let pages = body
            .query
            .map(|query| query.pages)
            .ok_or_else(|| FetchError::parse("missing query.pages"))?;

        pages
            .into_values()
            .filter(|page| page.missing.is_none())
            .filter_map(|page| page.extract)
            .map(|text| {
                extract_sentences(
                    &text,
                    self.config.min_extract_chars,
                    self.config.min_sentence_chars,
                    self.config.max_items,
                )
            })
            .find(|sentences| !sentences.is_empty())
            .ok_or_else(|| FetchError::empty(format!("no usable extract for '{title}'")))
    }
}

impl AttractionSource for WikipediaAttractions {
    #[instrument(name = "wikipedia_attractions", skip(self))]
    async fn attractions(&self, city: &str) -> Vec<String> {
        for title in candidate_titles(city) {
            debug!("Trying page '{}'", title);
            match self.lookup(&title).await {
                Ok(found) => {
                    info!("Found {} attractions from '{}'", found.len(), title);
                    return found;
                }
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, title = %title, "Candidate page unusable");
                }
            }
        }

        warn!("No usable page for {}, using generic attractions", city);
        self.config.fallback.clone()
    }
}

mod mediawiki {
    use super::{BTreeMap, Deserialize};

    #[derive(Debug, Deserialize)]
    pub struct QueryResponse {
        pub query: Option<Query>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Query {
        #[serde(default)]
        pub pages: BTreeMap<String, Page>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Page {
        /// Present (as an empty string) when the title does not exist
        pub missing: Option<serde_json::Value>,
        pub extract: Option<String>,
    }
}
