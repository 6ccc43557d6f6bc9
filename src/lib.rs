//! DWML parser - NWS forecast documents as location-keyed time series
//!
//! This library turns the `data` part of a DWML document into one point per
//! location, each holding its coordinates and every parameter series with
//! values aligned to their time frames.

pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod tree;

// Re-export core types for public API
pub use crate::config::{ParserConfig, WeatherConditionsMode};
pub use data::DataSubtreeParser;
pub use document::DwmlParser;
pub use error::DwmlError;
pub use models::{
    Location, ParameterRecord, ParameterValue, ParseResult, Point, Reading, TimeFrame,
    TimeLayouts, WeatherCondition, WeatherSubCondition,
};
pub use tree::TreeNode;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DwmlError>;

/// Transform a DWML `data` subtree into per-location points
pub fn parse(data: &TreeNode, config: &ParserConfig) -> Result<ParseResult> {
    DataSubtreeParser::new(config.clone()).parse(data)
}

/// Parse DWML document text
pub fn parse_str(xml: &str, config: &ParserConfig) -> Result<ParseResult> {
    DwmlParser::new(config.clone()).parse_str(xml)
}
