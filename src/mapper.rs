//! Response Mapper
//!
//! Converts the raw upstream JSON document into a [`VehicleRecord`]. This is
//! the single place that turns "field present and well-typed" into typed
//! data; required fields fail fast, naming the offending field, rather than
//! defaulting to empty strings.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{LookupError, Result};
use crate::models::VehicleRecord;
use crate::registration;

/// Date formats the vehicle API has been observed to use.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y.%m.%d"];

/// Maps an upstream vehicle-history document to a [`VehicleRecord`].
///
/// `registration`, `make`, `model` and `primaryColour` must be present as
/// strings. `motTests` is optional: when present and non-empty, element 0 is
/// taken as the most recent test (the API is assumed, not verified, to order
/// tests by descending recency) and its `expiryDate` and `odometerValue` are
/// parsed. An absent or empty `motTests` yields the epoch date and zero
/// mileage, which is a valid degraded result.
pub fn map(doc: &Value) -> Result<VehicleRecord> {
    let registration = registration::normalize(required_str(doc, "registration")?)
        .map_err(|_| LookupError::MalformedResponse {
            field: "registration",
        })?;
    let make = required_str(doc, "make")?.to_string();
    let model = required_str(doc, "model")?.to_string();
    let primary_colour = required_str(doc, "primaryColour")?.to_string();

    let mut mot_expiry_date = NaiveDate::default();
    let mut mileage_at_last_mot = 0;

    if let Some(latest) = doc
        .get("motTests")
        .and_then(Value::as_array)
        .and_then(|tests| tests.first())
    {
        // A test entry without these fields stays at the defaults; only a
        // present-but-unparsable value is an error.
        if let Some(raw) = latest.get("expiryDate") {
            mot_expiry_date = parse_expiry(raw)?;
        }
        if let Some(raw) = latest.get("odometerValue") {
            mileage_at_last_mot = parse_mileage(raw)?;
        }
    }

    Ok(VehicleRecord {
        registration,
        make,
        model,
        primary_colour,
        mot_expiry_date,
        mileage_at_last_mot,
    })
}

fn required_str<'a>(doc: &'a Value, field: &'static str) -> Result<&'a str> {
    doc.get(field)
        .and_then(Value::as_str)
        .ok_or(LookupError::MalformedResponse { field })
}

fn parse_expiry(raw: &Value) -> Result<NaiveDate> {
    let text = raw
        .as_str()
        .ok_or_else(|| LookupError::MalformedDate(raw.to_string()))?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .ok_or_else(|| LookupError::MalformedDate(text.to_string()))
}

fn parse_mileage(raw: &Value) -> Result<u32> {
    let text = raw
        .as_str()
        .ok_or_else(|| LookupError::MalformedMileage(raw.to_string()))?;
    text.parse::<u32>()
        .map_err(|_| LookupError::MalformedMileage(text.to_string()))
}
