//! Itinerary request and response shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::TravelPlanError;

pub const DESTINATION_REQUIRED: &str = "Destination required";
pub const INVALID_BODY: &str = "Request body must be a JSON object";
pub const BODY_TOO_LARGE: &str = "Request body too large";

/// Raw JSON body of `POST /get_itinerary`, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItineraryPayload {
    /// Anything other than a string counts as missing
    #[serde(default)]
    pub destination: Option<Value>,
    /// Accepts integers, floats and numeric strings
    #[serde(default)]
    pub days: Option<Value>,
}

/// A validated itinerary request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryRequest {
    /// Trimmed, never empty
    pub destination: String,
    /// At least 1
    pub days: u32,
}

/// One day of the itinerary response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub plan: String,
    pub weather: String,
    pub flights: String,
    pub attractions: Vec<String>,
}

impl ItineraryPayload {
    /// Validate the payload against the configured day limit.
    ///
    /// The destination is checked first so an empty destination always
    /// reports `Destination required`, whatever `days` holds.
    pub fn validate(self, max_days: u32) -> Result<ItineraryRequest, TravelPlanError> {
        let destination = self
            .destination
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| TravelPlanError::validation(DESTINATION_REQUIRED))?
            .to_string();

        let days = match self.days {
            None | Some(Value::Null) => 1,
            Some(value) => coerce_days(&value)
                .ok_or_else(|| TravelPlanError::validation("Days must be a whole number"))?,
        };

        if days < 1 {
            return Err(TravelPlanError::validation("Days must be at least 1"));
        }
        if days > i64::from(max_days) {
            return Err(TravelPlanError::validation(format!(
                "Days must not exceed {max_days}"
            )));
        }

        Ok(ItineraryRequest {
            destination,
            days: u32::try_from(days).map_err(|_| TravelPlanError::validation("Days out of range"))?,
        })
    }
}

fn coerce_days(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn payload(value: Value) -> ItineraryPayload {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case(json!({"destination": "Delhi", "days": 3}), "Delhi", 3)]
    #[case(json!({"destination": "  Mumbai \n", "days": 2}), "Mumbai", 2)]
    #[case(json!({"destination": "Delhi"}), "Delhi", 1)]
    #[case(json!({"destination": "Delhi", "days": null}), "Delhi", 1)]
    #[case(json!({"destination": "Delhi", "days": "4"}), "Delhi", 4)]
    #[case(json!({"destination": "Delhi", "days": 2.9}), "Delhi", 2)]
    fn test_valid_payloads(#[case] body: Value, #[case] destination: &str, #[case] days: u32) {
        let request = payload(body).validate(14).unwrap();
        assert_eq!(request.destination, destination);
        assert_eq!(request.days, days);
    }

    #[rstest]
    #[case(json!({"days": 2}), "Destination required")]
    #[case(json!({"destination": "", "days": 2}), "Destination required")]
    #[case(json!({"destination": "   ", "days": 2}), "Destination required")]
    #[case(json!({"destination": "\t\n", "days": "abc"}), "Destination required")]
    #[case(json!({"destination": 42, "days": 1}), "Destination required")]
    #[case(json!({"destination": null, "days": 1}), "Destination required")]
    #[case(json!({"destination": ["Delhi"], "days": 1}), "Destination required")]
    #[case(json!({"destination": {"city": "Delhi"}}), "Destination required")]
    #[case(json!({"destination": "Delhi", "days": "abc"}), "Days must be a whole number")]
    #[case(json!({"destination": "Delhi", "days": [1]}), "Days must be a whole number")]
    #[case(json!({"destination": "Delhi", "days": 0}), "Days must be at least 1")]
    #[case(json!({"destination": "Delhi", "days": -3}), "Days must be at least 1")]
    #[case(json!({"destination": "Delhi", "days": 15}), "Days must not exceed 14")]
    fn test_rejected_payloads(#[case] body: Value, #[case] message: &str) {
        let err = payload(body).validate(14).unwrap_err();
        assert_eq!(err.user_message(), message);
    }

    #[test]
    fn test_day_plan_json_shape() {
        let plan = DayPlan {
            day: 1,
            plan: "Walk around".to_string(),
            weather: "N/A".to_string(),
            flights: "No flight data available".to_string(),
            attractions: vec!["Museum".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            json!({
                "day": 1,
                "plan": "Walk around",
                "weather": "N/A",
                "flights": "No flight data available",
                "attractions": ["Museum"]
            })
        );
    }
}
