//! Attraction lookup
//!
//! Turns a city name into a short list of attraction names. Every source
//! returns a usable list: real data when the upstream service cooperates,
//! a fixed fallback otherwise.

pub mod places;
pub mod wikipedia;

use reqwest::Client;

use crate::config::{AttractionSourceKind, AttractionsConfig, PlacesConfig};

pub use places::PlacesAttractions;
pub use wikipedia::WikipediaAttractions;

pub trait AttractionSource {
    async fn attractions(&self, city: &str) -> Vec<String>;
}

/// The attraction source selected by configuration
pub enum AttractionProvider {
    Wikipedia(WikipediaAttractions),
    Places(PlacesAttractions),
}

impl AttractionProvider {
    pub fn from_config(
        client: Client,
        attractions: &AttractionsConfig,
        places: &PlacesConfig,
    ) -> Self {
        match attractions.source {
            AttractionSourceKind::Wikipedia => {
                Self::Wikipedia(WikipediaAttractions::new(client, attractions.clone()))
            }
            AttractionSourceKind::Places => {
                Self::Places(PlacesAttractions::new(client, places.clone()))
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> AttractionSourceKind {
        match self {
            Self::Wikipedia(_) => AttractionSourceKind::Wikipedia,
            Self::Places(_) => AttractionSourceKind::Places,
        }
    }
}

impl AttractionSource for AttractionProvider {
    async fn attractions(&self, city: &str) -> Vec<String> {
        match self {
            Self::Wikipedia(source) => source.attractions(city).await,
            Self::Places(source) => source.attractions(city).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_client;

    #[test]
    fn test_default_source_is_wikipedia() {
        let provider = AttractionProvider::from_config(
            test_client(),
            &AttractionsConfig::default(),
            &PlacesConfig::default(),
        );
        assert_eq!(provider.kind(), AttractionSourceKind::Wikipedia);
    }

    #[test]
    fn test_places_source_is_selectable() {
        let attractions = AttractionsConfig {
            source: AttractionSourceKind::Places,
            ..AttractionsConfig::default()
        };
        let provider =
            AttractionProvider::from_config(test_client(), &attractions, &PlacesConfig::default());
        assert_eq!(provider.kind(), AttractionSourceKind::Places);
    }
}
