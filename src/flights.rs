//! Cheapest-offer lookup against the Amadeus flight-offers API
//!
//! A lookup is two calls: an OAuth2 client-credentials exchange for a bearer
//! token, then a single-result offer search. Destinations missing from the
//! static airport table never reach the network.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use oauth2::basic::BasicClient;
use oauth2::{AuthType, ClientId, ClientSecret, TokenResponse, TokenUrl};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::FlightsConfig;
use crate::error::FetchError;
use crate::http::ensure_success;

pub const NO_FLIGHT_DATA: &str = "No flight data available";
pub const NO_AIRPORT: &str = "No airport found for this city";

pub struct FlightClient {
    client: Client,
    token_client: Client,
    config: FlightsConfig,
}

/// A concrete origin/destination pair for one departure date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRoute {
    pub origin: String,
    pub destination: String,
    pub departure: NaiveDate,
}

/// The fields of the cheapest offer that end up in the itinerary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheapestOffer {
    pub total_price: String,
    pub airline: String,
}

impl CheapestOffer {
    #[must_use]
    pub fn format_summary(&self, currency_symbol: &str) -> String {
        format!(
            "Cheapest flight ~{}{} via {}",
            currency_symbol, self.total_price, self.airline
        )
    }
}

/// Pick an origin that never equals the destination.
///
/// Flights default to leaving from the primary hub; a trip to the primary hub
/// leaves from the secondary one instead.
#[must_use]
pub fn select_origin<'a>(
    destination_code: &str,
    primary_hub: &'a str,
    secondary_hub: &'a str,
) -> &'a str {
    if destination_code == primary_hub {
        secondary_hub
    } else {
        primary_hub
    }
}

/// Departures are always searched for the day after `today`
#[must_use]
pub fn departure_date(today: NaiveDate) -> NaiveDate {
    today.succ_opt().unwrap_or(today)
}

impl FlightClient {
    pub fn new(client: Client, token_client: Client, config: FlightsConfig) -> Self {
        Self {
            client,
            token_client,
            config,
        }
    }

    /// Resolve the route for a destination city, `None` if it has no airport
    #[must_use]
    pub fn route_for(&self, destination: &str, today: NaiveDate) -> Option<FlightRoute> {
        let code = self.config.airport_code(destination)?;
        let origin = select_origin(code, &self.config.primary_hub, &self.config.secondary_hub);
        Some(FlightRoute {
            origin: origin.to_string(),
            destination: code.to_string(),
            departure: departure_date(today),
        })
    }

    /// Cheapest offer for tomorrow as display text, or a fixed fallback
    #[instrument(skip(self))]
    pub async fn price_summary(&self, destination: &str) -> String {
        let Some(route) = self.route_for(destination, Local::now().date_naive()) else {
            info!("No airport code for {}", destination);
            return NO_AIRPORT.to_string();
        };

        let start_time = Instant::now();
        match self.cheapest_offer(&route).await {
            Ok(offer) => {
                let summary = offer.format_summary(&self.config.currency_symbol);
                info!(
                    "Flights {} -> {} in {:.3}s: {}",
                    route.origin,
                    route.destination,
                    start_time.elapsed().as_secs_f64(),
                    summary
                );
                summary
            }
            Err(e) => {
                warn!(
                    kind = e.kind(),
                    error = %e,
                    origin = %route.origin,
                    destination = %route.destination,
                    "Flight lookup failed, using fallback"
                );
                NO_FLIGHT_DATA.to_string()
            }
        }
    }

    async fn cheapest_offer(&self, route: &FlightRoute) -> Result<CheapestOffer, FetchError> {
        let token = self.access_token().await?;

        debug!(
            "Searching offers {} -> {} on {}",
            route.origin, route.destination, route.departure
        );
        let departure = route.departure.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(&self.config.offers_url)
            .bearer_auth(token)
            .query(&[
                ("originLocationCode", route.origin.as_str()),
                ("destinationLocationCode", route.destination.as_str()),
                ("adults", "1"),
                ("currencyCode", self.config.currency_code.as_str()),
                ("departureDate", departure.as_str()),
                ("max", "1"),
            ])
            .send()
            .await?;

        let body: amadeus::OffersResponse = ensure_success(response)?.json().await?;
        body.into_cheapest()
    }

    async fn access_token(&self) -> Result<String, FetchError> {
        let (Some(client_id), Some(client_secret)) =
            (&self.config.client_id, &self.config.client_secret)
        else {
            return Err(FetchError::auth("client credentials are not configured"));
        };

        let token_url = TokenUrl::new(self.config.token_url.clone())
            .map_err(|e| FetchError::auth(format!("invalid token URL: {e}")))?;

        let oauth = BasicClient::new(ClientId::new(client_id.clone()))
            .set_client_secret(ClientSecret::new(client_secret.clone()))
            .set_token_uri(token_url)
            .set_auth_type(AuthType::RequestBody);

        let token = oauth
            .exchange_client_credentials()
            .request_async(&self.token_client)
            .await
            .map_err(|e| FetchError::auth(e.to_string()))?;

        debug!("Flight provider token received");
        Ok(token.access_token().secret().clone())
    }
}

mod amadeus {
    use super::{CheapestOffer, Deserialize, FetchError};

    #[derive(Debug, Deserialize)]
    pub struct OffersResponse {
        #[serde(default)]
        pub data: Vec<Offer>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Offer {
        pub price: Price,
        #[serde(default)]
        pub validating_airline_codes: Vec<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Price {
        pub total: String,
    }

    impl OffersResponse {
        pub fn into_cheapest(self) -> Result<CheapestOffer, FetchError> {
            let offer = self
                .data
                .into_iter()
                .next()
                .ok_or_else(|| FetchError::empty("no flight offers"))?;
            let airline = offer
                .validating_airline_codes
                .into_iter()
                .next()
                .ok_or_else(|| FetchError::parse("offer has no validating airline"))?;
            Ok(CheapestOffer {
                total_price: offer.price.total,
                airline,
            })
        }
    }
}
