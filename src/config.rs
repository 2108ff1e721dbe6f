//! Configuration management for the `TravelPlan` service
//!
//! Handles loading configuration from an optional TOML file, environment
//! variables and the conventional provider-secret variables, and validates
//! every setting once at startup.

use crate::TravelPlanError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Root configuration structure for the `TravelPlan` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelPlanConfig {
    /// Inbound HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared outbound HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Flight-offer provider configuration
    #[serde(default)]
    pub flights: FlightsConfig,
    /// Attraction lookup configuration
    #[serde(default)]
    pub attractions: AttractionsConfig,
    /// Places text-search provider configuration
    #[serde(default)]
    pub places: PlacesConfig,
    /// Language-model completion service configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Inbound HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory served for `GET /` and other static assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Upper bound on the number of days a single request may ask for
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Outbound HTTP settings shared by every upstream client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout applied to every outbound call
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Weather provider (OpenWeatherMap) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    #[serde(default = "default_weather_units")]
    pub units: String,
}

/// One row of the static airport table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportEntry {
    /// City name as typed by users
    pub city: String,
    /// IATA airport code
    pub code: String,
}

impl AirportEntry {
    pub fn new(city: &str, code: &str) -> Self {
        Self {
            city: city.to_string(),
            code: code.to_string(),
        }
    }
}

/// Flight-offer provider (Amadeus) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightsConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_flights_token_url")]
    pub token_url: String,
    #[serde(default = "default_flights_offers_url")]
    pub offers_url: String,
    /// Default origin, also the destination that forces `secondary_hub`
    #[serde(default = "default_primary_hub")]
    pub primary_hub: String,
    #[serde(default = "default_secondary_hub")]
    pub secondary_hub: String,
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Closed city-to-airport table; cities not listed never get flight data
    #[serde(default = "default_airports")]
    pub airports: Vec<AirportEntry>,
}

/// Which attraction source the orchestrator uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttractionSourceKind {
    #[default]
    Wikipedia,
    Places,
}

/// Attraction lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttractionsConfig {
    #[serde(default)]
    pub source: AttractionSourceKind,
    #[serde(default = "default_wikipedia_url")]
    pub wikipedia_url: String,
    /// An extract must be strictly longer than this to be considered
    #[serde(default = "default_min_extract_chars")]
    pub min_extract_chars: usize,
    /// A sentence must be strictly longer than this to be kept
    #[serde(default = "default_min_sentence_chars")]
    pub min_sentence_chars: usize,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Generic list returned when no lookup yields anything usable
    #[serde(default = "default_attraction_fallback")]
    pub fallback: Vec<String>,
}

/// Places text-search provider (Google Maps) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
    #[serde(default = "default_places_max_results")]
    pub max_results: usize,
}

/// Chat-completion service (OpenAI) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_max_days() -> u32 {
    14
}

fn default_body_limit() -> usize {
    16 * 1024
}

fn default_http_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("TravelPlan/{}", env!("CARGO_PKG_VERSION"))
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_units() -> String {
    "metric".to_string()
}

fn default_flights_token_url() -> String {
    "https://test.api.amadeus.com/v1/security/oauth2/token".to_string()
}

fn default_flights_offers_url() -> String {
    "https://test.api.amadeus.com/v2/shopping/flight-offers".to_string()
}

fn default_primary_hub() -> String {
    "DEL".to_string()
}

fn default_secondary_hub() -> String {
    "BOM".to_string()
}

fn default_currency_code() -> String {
    "INR".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_airports() -> Vec<AirportEntry> {
    vec![
        AirportEntry::new("Dehradun", "DED"),
        AirportEntry::new("Delhi", "DEL"),
        AirportEntry::new("Mumbai", "BOM"),
        AirportEntry::new("Bangalore", "BLR"),
        AirportEntry::new("Kolkata", "CCU"),
    ]
}

fn default_wikipedia_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_min_extract_chars() -> usize {
    50
}

fn default_min_sentence_chars() -> usize {
    15
}

fn default_max_items() -> usize {
    5
}

fn default_attraction_fallback() -> Vec<String> {
    ["Museum", "Historical Site", "Local Market", "Park", "Temple"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_places_max_results() -> usize {
    3
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_llm_max_tokens() -> u32 {
    60
}

fn default_llm_temperature() -> f32 {
    0.5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: default_static_dir(),
            max_days: default_max_days(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            units: default_weather_units(),
        }
    }
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            token_url: default_flights_token_url(),
            offers_url: default_flights_offers_url(),
            primary_hub: default_primary_hub(),
            secondary_hub: default_secondary_hub(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
            airports: default_airports(),
        }
    }
}

impl Default for AttractionsConfig {
    fn default() -> Self {
        Self {
            source: AttractionSourceKind::default(),
            wikipedia_url: default_wikipedia_url(),
            min_extract_chars: default_min_extract_chars(),
            min_sentence_chars: default_min_sentence_chars(),
            max_items: default_max_items(),
            fallback: default_attraction_fallback(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_places_base_url(),
            max_results: default_places_max_results(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
            temperature: default_llm_temperature(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl FlightsConfig {
    /// Look up the airport code for a city in the static table
    #[must_use]
    pub fn airport_code(&self, city: &str) -> Option<&str> {
        self.airports
            .iter()
            .find(|entry| entry.city == city)
            .map(|entry| entry.code.as_str())
    }
}

impl TravelPlanConfig {
    /// Load configuration from `TRAVELPLAN_CONFIG` (or `config.toml`) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(env::var("TRAVELPLAN_CONFIG").ok().map(PathBuf::from))
    }

    /// Load configuration from the specified path.
    ///
    /// An explicit path must exist; without one, `config.toml` is optional.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let required = config_path.is_some();
        let config_file = config_path.unwrap_or_else(Self::get_config_path);

        if required && !config_file.exists() {
            return Err(TravelPlanError::config(format!(
                "Config file {} does not exist",
                config_file.display()
            ))
            .into());
        }

        let mut builder = Config::builder().add_source(
            File::from(config_file)
                .required(required)
                .format(config::FileFormat::Toml),
        );

        // TRAVELPLAN_WEATHER__BASE_URL style overrides
        builder = builder.add_source(
            Environment::with_prefix("TRAVELPLAN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelPlanConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_provider_secrets();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Default configuration file, looked up in the working directory
    #[must_use]
    pub fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Pick up the conventional provider secret variables
    pub fn apply_provider_secrets(&mut self) {
        let secret = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(key) = secret("OPENWEATHER_KEY") {
            self.weather.api_key = Some(key);
        }
        if let Some(key) = secret("GOOGLE_MAPS_KEY") {
            self.places.api_key = Some(key);
        }
        if let Some(id) = secret("AMADEUS_CLIENT_ID") {
            self.flights.client_id = Some(id);
        }
        if let Some(secret_value) = secret("AMADEUS_CLIENT_SECRET") {
            self.flights.client_secret = Some(secret_value);
        }
        if let Some(key) = secret("OPENAI_KEY") {
            self.llm.api_key = Some(key);
        }
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.max_days == 0 {
            self.server.max_days = default_max_days();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_http_timeout();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.attractions.max_items == 0 {
            self.attractions.max_items = default_max_items();
        }
        if self.attractions.fallback.is_empty() {
            self.attractions.fallback = default_attraction_fallback();
        }
        if self.places.max_results == 0 {
            self.places.max_results = default_places_max_results();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_airports()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.max_days > 365 {
            return Err(TravelPlanError::config("Maximum days cannot exceed 365").into());
        }

        if self.http.timeout_seconds > 300 {
            return Err(
                TravelPlanError::config("Outbound HTTP timeout cannot exceed 300 seconds").into(),
            );
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(
                TravelPlanError::config("LLM temperature must be between 0.0 and 2.0").into(),
            );
        }

        if self.llm.max_tokens == 0 || self.llm.max_tokens > 4096 {
            return Err(TravelPlanError::config("LLM max tokens must be between 1 and 4096").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelPlanError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelPlanError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("weather.base_url", &self.weather.base_url),
            ("flights.token_url", &self.flights.token_url),
            ("flights.offers_url", &self.flights.offers_url),
            ("attractions.wikipedia_url", &self.attractions.wikipedia_url),
            ("places.base_url", &self.places.base_url),
            ("llm.base_url", &self.llm.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelPlanError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate the static airport table and hub pair
    fn validate_airports(&self) -> Result<()> {
        let flights = &self.flights;
        if flights.primary_hub.is_empty() || flights.secondary_hub.is_empty() {
            return Err(TravelPlanError::config("Flight hubs cannot be empty").into());
        }
        if flights.primary_hub == flights.secondary_hub {
            return Err(
                TravelPlanError::config("Primary and secondary hub must be different airports")
                    .into(),
            );
        }
        if let Some(entry) = flights
            .airports
            .iter()
            .find(|entry| entry.city.trim().is_empty() || entry.code.trim().is_empty())
        {
            return Err(TravelPlanError::config(format!(
                "Airport table entry {entry:?} needs both a city and a code"
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TravelPlanConfig::default();
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.http.timeout_seconds, 10);
        assert_eq!(config.server.max_days, 14);
        assert_eq!(config.attractions.min_extract_chars, 50);
        assert_eq!(config.attractions.min_sentence_chars, 15);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_airport_table() {
        let flights = FlightsConfig::default();
        assert_eq!(flights.airport_code("Delhi"), Some("DEL"));
        assert_eq!(flights.airport_code("Mumbai"), Some("BOM"));
        assert_eq!(flights.airport_code("Kolkata"), Some("CCU"));
        // Lookups are exact, like the table itself
        assert_eq!(flights.airport_code("delhi"), None);
        assert_eq!(flights.airport_code("Paris"), None);
    }

    #[test]
    fn test_missing_api_keys_are_valid() {
        let config = TravelPlanConfig::default();
        assert!(config.flights.client_id.is_none());
        assert!(config.llm.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TravelPlanConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TravelPlanConfig::default();
        config.http.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = TravelPlanConfig::default();
        config.llm.base_url = "api.openai.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("llm.base_url"));
    }

    #[test]
    fn test_config_validation_same_hubs() {
        let mut config = TravelPlanConfig::default();
        config.flights.secondary_hub = "DEL".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("must be different"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = TravelPlanConfig::default();
        config.attractions.fallback.clear();
        config.server.max_days = 0;
        config.apply_defaults();
        assert_eq!(config.attractions.fallback.len(), 5);
        assert_eq!(config.server.max_days, 14);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("travelplan-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
max_days = 7

[attractions]
source = "places"

[[flights.airports]]
city = "Chennai"
code = "MAA"
"#,
        )
        .unwrap();

        let config = TravelPlanConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.server.max_days, 7);
        assert_eq!(config.attractions.source, AttractionSourceKind::Places);
        assert_eq!(config.flights.airport_code("Chennai"), Some("MAA"));
        assert_eq!(config.flights.airport_code("Delhi"), None);
        // Untouched sections keep their defaults
        assert_eq!(config.weather.units, "metric");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let path = std::env::temp_dir().join("travelplan-no-such-dir/confg.toml");
        let result = TravelPlanConfig::load_from_path(Some(path));
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }
}
