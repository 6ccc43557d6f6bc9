//! Parameter series and their values

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TimeFrame;

/// One structured qualifier nested in a `weather-conditions` element
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct WeatherSubCondition {
    pub coverage: Option<String>,
    pub intensity: Option<String>,
    pub weather_type: Option<String>,
    pub qualifier: Option<String>,
}

/// Decoded `weather-conditions` value
///
/// The four qualifier fields come from the first nested sub-condition and are
/// `None` when the element has no children. `additional` is only filled when
/// every sub-condition is decoded.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct WeatherCondition {
    pub summary: Option<String>,
    pub coverage: Option<String>,
    pub intensity: Option<String>,
    pub weather_type: Option<String>,
    pub qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional: Vec<WeatherSubCondition>,
}

impl WeatherCondition {
    /// Condition with a summary and no qualifiers
    #[must_use]
    pub fn summary_only(summary: Option<String>) -> Self {
        Self {
            summary,
            ..Self::default()
        }
    }

    /// Condition whose qualifiers come from `primary`
    #[must_use]
    pub fn with_primary(summary: Option<String>, primary: WeatherSubCondition) -> Self {
        Self {
            summary,
            coverage: primary.coverage,
            intensity: primary.intensity,
            weather_type: primary.weather_type,
            qualifier: primary.qualifier,
            additional: Vec::new(),
        }
    }
}

/// Payload of a single time step
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reading {
    /// Plain scalar reading
    Text(String),
    /// Decoded weather conditions
    Weather(WeatherCondition),
    /// A `value` element without content (`xsi:nil="true"`)
    Nil,
}

impl Reading {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reading::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_weather(&self) -> Option<&WeatherCondition> {
        match self {
            Reading::Weather(condition) => Some(condition),
            _ => None,
        }
    }
}

/// A time frame carrying one reading
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ParameterValue {
    #[serde(flatten)]
    pub frame: TimeFrame,
    pub value: Reading,
}

/// One parameter series for a location
///
/// The element's attributes (`type`, `units`, `time-layout`, ...) sit next to
/// `values`, so the serialized record reads like the DWML element it came
/// from.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ParameterRecord {
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
    pub values: Vec<ParameterValue>,
}

impl ParameterRecord {
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The `type` attribute
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.attribute("type")
    }

    #[must_use]
    pub fn units(&self) -> Option<&str> {
        self.attribute("units")
    }

    #[must_use]
    pub fn time_layout(&self) -> Option<&str> {
        self.attribute("time-layout")
    }

    /// Fold a later record with the same key into this one
    ///
    /// Overlapping attributes and the value series are taken from `later`.
    pub fn merge(&mut self, later: ParameterRecord) {
        self.attributes.extend(later.attributes);
        self.values = later.values;
    }
}
