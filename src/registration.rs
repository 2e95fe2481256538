//! Registration Normalizer
//!
//! Produces the compact uppercase form of a registration plate, used both
//! as the cache key and as the path value sent upstream.

use crate::error::{LookupError, Result};

/// Normalizes a raw registration plate string.
///
/// Trims the input, uppercases it, rejects anything outside `[A-Z0-9 ]`,
/// and strips all remaining whitespace. This is a permissive shape check,
/// not DVLA plate grammar; the upstream API is the authority on whether a
/// registration exists.
///
/// # Errors
/// Returns `InvalidInput` for empty/whitespace-only input or when the
/// uppercased input contains characters outside letters, digits and spaces.
pub fn normalize(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LookupError::InvalidInput(
            "registration must not be empty".to_string(),
        ));
    }

    let upper = trimmed.to_uppercase();
    if let Some(bad) = upper
        .chars()
        .find(|c| !c.is_ascii_uppercase() && !c.is_ascii_digit() && *c != ' ')
    {
        return Err(LookupError::InvalidInput(format!(
            "invalid character {:?} in registration",
            bad
        )));
    }

    Ok(upper.chars().filter(|c| *c != ' ').collect())
}
