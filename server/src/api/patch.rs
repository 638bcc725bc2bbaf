//! Helpers for partial-update request bodies.

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes between absent, null, and present.
///
/// - Field absent in JSON → `#[serde(default)]` yields `None` (leave unchanged)
/// - `"field": null` → `Some(None)` (clear the value)
/// - `"field": value` → `Some(Some(value))` (set value)
#[allow(clippy::option_option)]
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a nullable patch field.
#[allow(clippy::option_option)]
pub fn apply_nullable<T>(target: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *target = value;
    }
}

/// Apply a required patch field.
pub fn apply<T>(target: &mut T, patch: Option<T>) {
    if let Some(value) = patch {
        *target = value;
    }
}
