//! Per-location forecast points

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Location, ParameterRecord};

/// Location key to its point
pub type ParseResult = BTreeMap<String, Point>;

/// Everything the document says about one location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Point {
    pub location: Location,
    /// Parameter key (`temperature-hourly`, `weather`, ...) to its series
    pub values: BTreeMap<String, ParameterRecord>,
}

impl Point {
    #[must_use]
    pub fn new(location: Location, values: BTreeMap<String, ParameterRecord>) -> Self {
        Self { location, values }
    }

    /// Series for a parameter key
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&ParameterRecord> {
        self.values.get(key)
    }
}
