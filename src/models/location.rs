//! Location model for point coordinates

use serde::{Deserialize, Serialize};

/// Location coordinates, verbatim from the document's `point` element
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: String,
    /// Longitude in decimal degrees
    pub longitude: String,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new<S: Into<String>, T: Into<String>>(latitude: S, longitude: T) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Numeric coordinates, if both strings parse
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.trim().parse::<f64>().ok()?;
        let lon = self.longitude.trim().parse::<f64>().ok()?;
        Some((lat, lon))
    }
}
