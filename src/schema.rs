//! Record schema for yield observations
//!
//! Defines the stored document shape and the explicit validation step that
//! gates every submission before it reaches the store. Field names are
//! camelCase on the wire and in the collection, matching the dashboard
//! frontend.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A persisted crop-yield observation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldObservation {
    /// Identifier assigned by the storage layer on creation
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub crop_name: String,
    pub yield_amount: f64,
    pub location: String,
    /// Stamped at insertion time; sole ordering key for listing
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// A validated candidate observation, not yet stamped or stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewObservation {
    pub crop_name: String,
    pub yield_amount: f64,
    pub location: String,
}

impl NewObservation {
    /// Attach the insertion timestamp, producing the document to store
    pub fn stamped(self, created_at: DateTime<Utc>) -> YieldObservation {
        YieldObservation {
            id: None,
            crop_name: self.crop_name,
            yield_amount: self.yield_amount,
            location: self.location,
            created_at,
        }
    }
}

/// Inbound body of a collect request
///
/// Every field is optional so that validation, not deserialization, decides
/// what is missing and can report all absent fields together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectRequest {
    pub crop_name: Option<String>,
    pub yield_amount: Option<f64>,
    pub location: Option<String>,
}

impl CollectRequest {
    /// Accept the candidate only if both text fields are present and
    /// non-empty and the yield amount is present.
    ///
    /// A yield of `0` is a legitimate observation and passes; only absence
    /// of the field rejects. Whitespace-only text counts as missing.
    pub fn validate(self) -> Result<NewObservation, ValidationError> {
        let mut missing = Vec::new();

        if !matches!(&self.crop_name, Some(s) if !s.trim().is_empty()) {
            missing.push("cropName");
        }
        if self.yield_amount.is_none() {
            missing.push("yieldAmount");
        }
        if !matches!(&self.location, Some(s) if !s.trim().is_empty()) {
            missing.push("location");
        }

        match (self.crop_name, self.yield_amount, self.location) {
            (Some(crop_name), Some(yield_amount), Some(location)) if missing.is_empty() => {
                Ok(NewObservation {
                    crop_name,
                    yield_amount,
                    location,
                })
            }
            _ => Err(ValidationError::MissingFields { fields: missing }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CollectRequest {
        CollectRequest {
            crop_name: Some("Wheat".to_string()),
            yield_amount: Some(120.0),
            location: Some("Field A".to_string()),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let candidate = full_request().validate().unwrap();
        assert_eq!(candidate.crop_name, "Wheat");
        assert_eq!(candidate.yield_amount, 120.0);
        assert_eq!(candidate.location, "Field A");
    }

    #[test]
    fn test_zero_yield_is_valid() {
        let request = CollectRequest {
            yield_amount: Some(0.0),
            ..full_request()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_missing_yield_amount_rejected() {
        let request = CollectRequest {
            yield_amount: None,
            ..full_request()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.fields(), &["yieldAmount"]);
    }

    #[test]
    fn test_empty_crop_name_rejected() {
        let request = CollectRequest {
            crop_name: Some(String::new()),
            ..full_request()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.fields(), &["cropName"]);
    }

    #[test]
    fn test_whitespace_location_rejected() {
        let request = CollectRequest {
            location: Some("   ".to_string()),
            ..full_request()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.fields(), &["location"]);
    }

    #[test]
    fn test_empty_request_reports_all_fields() {
        let err = CollectRequest::default().validate().unwrap_err();
        assert_eq!(err.fields(), &["cropName", "yieldAmount", "location"]);
    }

    #[test]
    fn test_observation_serializes_camel_case() {
        let observation = NewObservation {
            crop_name: "Corn".to_string(),
            yield_amount: 85.5,
            location: "Field B".to_string(),
        }
        .stamped(Utc::now());

        let value = serde_json::to_value(&observation).unwrap();
        assert_eq!(value["cropName"], "Corn");
        assert_eq!(value["yieldAmount"], 85.5);
        assert_eq!(value["location"], "Field B");
        assert!(value.get("createdAt").is_some());
        // Unassigned id is omitted entirely
        assert!(value.get("_id").is_none());
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: CollectRequest = serde_json::from_str(
            r#"{"cropName":"Rice","yieldAmount":42,"location":"Paddy 3"}"#,
        )
        .unwrap();
        assert_eq!(request.crop_name.as_deref(), Some("Rice"));
        assert_eq!(request.yield_amount, Some(42.0));
    }

    #[test]
    fn test_request_tolerates_partial_body() {
        let request: CollectRequest =
            serde_json::from_str(r#"{"cropName":"Corn"}"#).unwrap();
        assert!(request.yield_amount.is_none());
        assert!(request.location.is_none());
    }
}
