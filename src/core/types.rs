//! Domain entity for a port facility.

use super::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A geographic/logistics facility keyed by its unique ID.
///
/// Only `id` and `name` carry invariants (see [`Port::validate`]); every other
/// field is free-form and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Port {
    /// Unique key, usually the UN/LOCODE.
    pub id: String,
    /// Display name.
    pub name: String,
    /// City the port belongs to.
    pub city: String,
    /// Country name.
    pub country: String,
    /// Alternative names.
    pub alias: Vec<String>,
    /// Region names.
    pub regions: Vec<String>,
    /// Longitude, latitude. Not range checked.
    pub coordinates: Vec<f64>,
    /// Province or state.
    pub province: String,
    /// IANA timezone name.
    pub timezone: String,
    /// UN/LOCODEs served by the port.
    pub unlocs: Vec<String>,
    /// Free-form port code.
    pub code: String,
}

impl Port {
    /// Create a port with the two required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check the structural invariants of the record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(())
    }

    /// Longitude, if present.
    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.first().copied()
    }

    /// Latitude, if present.
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.get(1).copied()
    }
}
