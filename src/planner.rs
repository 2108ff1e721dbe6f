//! Itinerary orchestration
//!
//! Weather, flight and attraction data are fetched once per request, one
//! after another, then each day is synthesized in order. No fetch can fail
//! the request: every client returns its own fallback text.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, instrument};

use crate::attractions::{AttractionProvider, AttractionSource};
use crate::config::{AttractionSourceKind, TravelPlanConfig};
use crate::flights::FlightClient;
use crate::http::{build_client, build_token_client};
use crate::models::{DayPlan, ItineraryRequest};
use crate::synthesizer::{DayContext, ItinerarySynthesizer};
use crate::weather::WeatherClient;

/// Day-invariant context shared by every day of one itinerary
#[derive(Debug, Clone, PartialEq)]
pub struct TripContext {
    pub weather: String,
    pub flights: String,
    pub attractions: Vec<String>,
}

pub struct ItineraryPlanner {
    weather: WeatherClient,
    flights: FlightClient,
    attractions: AttractionProvider,
    synthesizer: ItinerarySynthesizer,
}

impl ItineraryPlanner {
    pub fn new(
        weather: WeatherClient,
        flights: FlightClient,
        attractions: AttractionProvider,
        synthesizer: ItinerarySynthesizer,
    ) -> Self {
        Self {
            weather,
            flights,
            attractions,
            synthesizer,
        }
    }

    /// Wire every upstream client from configuration
    pub fn from_config(config: &TravelPlanConfig) -> Result<Self> {
        let client = build_client(&config.http)?;
        let token_client = build_token_client(&config.http)?;

        Ok(Self::new(
            WeatherClient::new(client.clone(), config.weather.clone()),
            FlightClient::new(client.clone(), token_client, config.flights.clone()),
            AttractionProvider::from_config(client.clone(), &config.attractions, &config.places),
            ItinerarySynthesizer::new(client, config.llm.clone()),
        ))
    }

    /// Which attraction source this planner queries
    #[must_use]
    pub fn attraction_source(&self) -> AttractionSourceKind {
        self.attractions.kind()
    }

    /// Fetch the shared context in a fixed order: weather, flights, attractions
    pub async fn trip_context(&self, destination: &str) -> TripContext {
        let weather = self.weather.summary(destination).await;
        let flights = self.flights.price_summary(destination).await;
        let attractions = self.attractions.attractions(destination).await;

        TripContext {
            weather,
            flights,
            attractions,
        }
    }

    /// Build the full itinerary, one `DayPlan` per day in ascending order
    #[instrument(skip_all, fields(destination = %request.destination, days = request.days))]
    pub async fn plan(&self, request: &ItineraryRequest) -> Vec<DayPlan> {
        let start_time = Instant::now();
        let trip = self.trip_context(&request.destination).await;
        info!(
            weather = %trip.weather,
            flights = %trip.flights,
            attractions = trip.attractions.len(),
            "Shared trip context ready"
        );

        let mut itinerary = Vec::with_capacity(request.days as usize);
        for day in 1..=request.days {
            let plan = self
                .synthesizer
                .plan_day(DayContext {
                    destination: &request.destination,
                    day,
                    weather: &trip.weather,
                    attractions: &trip.attractions,
                })
                .await;

            itinerary.push(DayPlan {
                day,
                plan,
                weather: trip.weather.clone(),
                flights: trip.flights.clone(),
                attractions: trip.attractions.clone(),
            });
        }

        info!(
            "Itinerary with {} days ready in {:.3}s",
            itinerary.len(),
            start_time.elapsed().as_secs_f64()
        );
        itinerary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttractionsConfig;
    use crate::test_support::{test_http_config, unreachable_url};

    fn offline_config() -> TravelPlanConfig {
        let down = unreachable_url();
        let mut config = TravelPlanConfig::default();
        config.http = test_http_config();
        config.weather.base_url = down.clone();
        config.flights.client_id = Some("id".to_string());
        config.flights.client_secret = Some("secret".to_string());
        config.flights.token_url = format!("{down}/token");
        config.flights.offers_url = format!("{down}/offers");
        config.attractions.wikipedia_url = format!("{down}/w/api.php");
        config.places.base_url = down.clone();
        config.llm.base_url = down;
        config
    }

    #[tokio::test]
    async fn test_offline_trip_context_is_all_fallbacks() {
        let planner = ItineraryPlanner::from_config(&offline_config()).unwrap();

        let trip = planner.trip_context("Delhi").await;
        assert_eq!(
            trip,
            TripContext {
                weather: "N/A".to_string(),
                flights: "No flight data available".to_string(),
                attractions: AttractionsConfig::default().fallback,
            }
        );
    }

    #[tokio::test]
    async fn test_offline_plan_days_in_order() {
        let planner = ItineraryPlanner::from_config(&offline_config()).unwrap();
        let request = ItineraryRequest {
            destination: "Delhi".to_string(),
            days: 3,
        };

        let itinerary = planner.plan(&request).await;
        let days: Vec<u32> = itinerary.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![1, 2, 3]);
        assert_eq!(
            itinerary[2].plan,
            "Day 3: Explore Delhi in N/A weather. Visit: Museum, Historical Site"
        );
    }

    #[test]
    fn test_attraction_source_follows_config() {
        let mut config = offline_config();
        config.attractions.source = AttractionSourceKind::Places;
        let planner = ItineraryPlanner::from_config(&config).unwrap();
        assert_eq!(planner.attraction_source(), AttractionSourceKind::Places);
    }

    #[tokio::test]
    async fn test_unknown_city_reports_missing_airport() {
        let planner = ItineraryPlanner::from_config(&offline_config()).unwrap();

        let trip = planner.trip_context("Reykjavik").await;
        assert_eq!(trip.flights, "No airport found for this city");
    }
}
