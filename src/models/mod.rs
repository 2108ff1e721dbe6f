//! Data models for the `TravelPlan` service
//!
//! All of them are per-request values; nothing is persisted.

pub mod itinerary;

pub use itinerary::{
    BODY_TOO_LARGE, DESTINATION_REQUIRED, DayPlan, INVALID_BODY, ItineraryPayload,
    ItineraryRequest,
};
