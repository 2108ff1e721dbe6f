use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::AttractionSource;
use crate::config::PlacesConfig;
use crate::error::FetchError;
use crate::http::ensure_success;

pub const NO_PLACES: &str = "No attractions found";

/// Attraction lookup through the Google Places text search
pub struct PlacesAttractions {
    client: Client,
    config: PlacesConfig,
}

impl PlacesAttractions {
    pub fn new(client: Client, config: PlacesConfig) -> Self {
        Self { client, config }
    }

    async fn search(&self, destination: &str) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/textsearch/json", self.config.base_url);
        let query = format!("tourist attractions in {destination}");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query.as_str()),
                ("key", self.config.api_key.as_deref().unwrap_or_default()),
            ])
            .send()
            .await?;

        let body: google::TextSearchResponse = ensure_success(response)?.json().await?;
        let names: Vec<String> = body
            .results
            .into_iter()
            .take(self.config.max_results)
            .filter_map(|place| place.name)
            .collect();

        if names.is_empty() {
            return Err(FetchError::empty(format!(
                "text search returned status {}",
                body.status.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(names)
    }
}

impl AttractionSource for PlacesAttractions {
    #[instrument(name = "places_attractions", skip(self))]
    async fn attractions(&self, city: &str) -> Vec<String> {
        match self.search(city).await {
            Ok(names) => {
                info!("Places search returned {:?}", names);
                names
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Places search failed, using fallback");
                vec![NO_PLACES.to_string()]
            }
        }
    }
}

mod google {
    use super::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct TextSearchResponse {
        pub status: Option<String>,
        #[serde(default)]
        pub results: Vec<Place>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Place {
        pub name: Option<String>,
    }
}
