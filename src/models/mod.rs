//! Data models for parsed DWML forecasts
//!
//! This module contains the output structures organized by concern:
//! - Time layout: ordered start/end frames keyed by layout key
//! - Parameter: aligned value series and decoded weather conditions
//! - Location: point coordinates
//! - Forecast: per-location points and the overall parse result

pub mod forecast;
pub mod location;
pub mod parameter;
pub mod time_layout;

// Re-export all public types for convenient access
pub use forecast::{ParseResult, Point};
pub use location::Location;
pub use parameter::{ParameterRecord, ParameterValue, Reading, WeatherCondition, WeatherSubCondition};
pub use time_layout::{TimeFrame, TimeLayouts};
