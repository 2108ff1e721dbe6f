//! `TravelPlan` - day-by-day travel itineraries
//!
//! This library aggregates weather, flight-price and attraction data for a
//! destination and asks a language model for a short plan per day. Every
//! upstream lookup degrades to fixed fallback text instead of failing.

pub mod api;
pub mod attractions;
pub mod config;
pub mod error;
pub mod flights;
pub mod http;
pub mod logging;
pub mod models;
pub mod planner;
pub mod synthesizer;
pub mod weather;
pub mod web;

#[cfg(test)]
mod test_support;

// Re-export core types for public API
pub use attractions::{AttractionProvider, AttractionSource};
pub use config::TravelPlanConfig;
pub use error::{FetchError, TravelPlanError};
pub use models::{DayPlan, ItineraryPayload, ItineraryRequest};
pub use planner::ItineraryPlanner;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
