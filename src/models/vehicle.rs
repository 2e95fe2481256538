//! Vehicle Record
//!
//! The normalized lookup result assembled by the response mapper.

use chrono::NaiveDate;
use serde::Serialize;

/// Vehicle identity and most-recent MOT summary.
///
/// Immutable once constructed; the registration field always carries the
/// compact uppercase form with no interior whitespace. When the upstream
/// document has no MOT tests, `mot_expiry_date` is the Unix epoch date and
/// `mileage_at_last_mot` is zero - a degraded but valid result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Normalized registration plate
    pub registration: String,
    /// Vehicle manufacturer
    pub make: String,
    /// Vehicle model
    pub model: String,
    /// Primary colour as reported upstream
    pub primary_colour: String,
    /// Expiry date of the most recent MOT certificate
    pub mot_expiry_date: NaiveDate,
    /// Recorded mileage at the most recent MOT test
    pub mileage_at_last_mot: u32,
}
