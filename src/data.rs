//! Data subtree transformation
//!
//! Parsing a DWML `data` element runs in four steps:
//!   1. resolve every time layout by layout key
//!   2. align every parameter group against those layouts, grouped by
//!      location key
//!   3. read the coordinates of every location, grouped by location key
//!   4. join locations and parameters on the location key
//!
//! Locations decide which keys appear in the result; parameters for a key
//! with no location are dropped.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::Result;
use crate::config::ParserConfig;
use crate::models::{Location, ParameterRecord, ParseResult, Point, TimeLayouts};
use crate::parsers::{LocationParser, ParameterParser, TimeLayoutParser};
use crate::tree::TreeNode;

/// Location key to its parameter records
pub type LocationParameters = BTreeMap<String, BTreeMap<String, ParameterRecord>>;

/// Parser for the `data` element of a DWML document
#[derive(Debug, Clone, Default)]
pub struct DataSubtreeParser {
    config: ParserConfig,
}

impl DataSubtreeParser {
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Transform a `data` subtree into per-location points
    #[tracing::instrument(name = "parse_data_subtree", level = "debug", skip_all, fields(children = data.children().len()))]
    pub fn parse(&self, data: &TreeNode) -> Result<ParseResult> {
        let children = data.children();

        let time_layouts = Self::time_layouts(children)?;
        let parameters = Self::parameters(children, &time_layouts, &self.config)?;
        let locations = Self::locations(children)?;

        Ok(Self::merge(locations, parameters))
    }

    /// Every `time-layout` child, later duplicate keys replacing earlier ones
    pub fn time_layouts(children: &[TreeNode]) -> Result<TimeLayouts> {
        let layouts = children
            .iter()
            .filter(|child| child.is("time-layout"))
            .map(TimeLayoutParser::parse)
            .collect::<Result<TimeLayouts>>()?;
        debug!("Resolved {} time layouts", layouts.len());
        Ok(layouts)
    }

    /// Every `parameters` child, grouped by its applicable location
    pub fn parameters(
        children: &[TreeNode],
        time_layouts: &TimeLayouts,
        config: &ParserConfig,
    ) -> Result<LocationParameters> {
        children
            .iter()
            .filter(|child| child.is("parameters"))
            .map(|group| ParameterParser::parse(time_layouts, group, config))
            .collect()
    }

    /// Every `location` child by location key
    pub fn locations(children: &[TreeNode]) -> Result<BTreeMap<String, Location>> {
        children
            .iter()
            .filter(|child| child.is("location"))
            .map(LocationParser::parse)
            .collect()
    }

    /// Join locations with their parameters
    pub fn merge(
        locations: BTreeMap<String, Location>,
        mut parameters: LocationParameters,
    ) -> ParseResult {
        let points: ParseResult = locations
            .into_iter()
            .map(|(key, location)| {
                let values = parameters.remove(&key).unwrap_or_default();
                (key, Point::new(location, values))
            })
            .collect();

        if !parameters.is_empty() {
            warn!(
                "Dropping parameters for locations without coordinates: {:?}",
                parameters.keys().collect::<Vec<_>>()
            );
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DwmlError;
    use crate::models::Reading;

    fn time_layout(key: &str, starts: &[&str]) -> TreeNode {
        TreeNode::new("time-layout")
            .with_child(TreeNode::new("layout-key").with_content(key))
            .with_children(
                starts
                    .iter()
                    .map(|start| TreeNode::new("start-valid-time").with_content(*start)),
            )
    }

    fn location(key: &str, latitude: &str, longitude: &str) -> TreeNode {
        TreeNode::new("location")
            .with_child(TreeNode::new("location-key").with_content(key))
            .with_child(
                TreeNode::new("point")
                    .with_attribute("latitude", latitude)
                    .with_attribute("longitude", longitude),
            )
    }

    fn temperatures(location_key: &str, layout_key: &str, values: &[&str]) -> TreeNode {
        TreeNode::new("parameters")
            .with_attribute("applicable-location", location_key)
            .with_child(
                TreeNode::new("temperature")
                    .with_attribute("type", "hourly")
                    .with_attribute("units", "Fahrenheit")
                    .with_attribute("time-layout", layout_key)
                    .with_children(
                        values
                            .iter()
                            .map(|value| TreeNode::new("value").with_content(*value)),
                    ),
            )
    }

    const HOURS: [&str; 2] = ["2015-06-27T14:00:00-04:00", "2015-06-27T15:00:00-04:00"];

    #[test]
    fn test_parse_joins_on_location_key() {
        let data = TreeNode::new("data")
            .with_child(location("point1", "38.99", "-77.01"))
            .with_child(location("point2", "37.78", "-122.42"))
            .with_child(time_layout("k-p1h-n2-1", &HOURS))
            .with_child(temperatures("point1", "k-p1h-n2-1", &["71", "70"]))
            .with_child(temperatures("point3", "k-p1h-n2-1", &["60", "61"]));

        let result = DataSubtreeParser::default().parse(&data).unwrap();

        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["point1", "point2"]);

        let point1 = &result["point1"];
        assert_eq!(point1.location, Location::new("38.99", "-77.01"));
        let temperature = point1.parameter("temperature-hourly").unwrap();
        assert_eq!(temperature.values.len(), 2);
        assert_eq!(temperature.values[1].frame.end, "2015-06-27T16:00:00-04:00");
        assert_eq!(temperature.values[1].value, Reading::Text("70".to_string()));

        // a location with no parameters still gets a point
        assert!(result["point2"].values.is_empty());
    }

    #[test]
    fn test_later_duplicates_overwrite() {
        let data = TreeNode::new("data")
            .with_child(location("point1", "38.99", "-77.01"))
            .with_child(location("point1", "39.00", "-77.00"))
            .with_child(time_layout("k-1", &HOURS[..1]))
            .with_child(time_layout("k-1", &HOURS))
            .with_child(temperatures("point1", "k-1", &["71", "70"]));

        let result = DataSubtreeParser::default().parse(&data).unwrap();
        assert_eq!(result["point1"].location.latitude, "39.00");
        assert_eq!(result["point1"].values["temperature-hourly"].values.len(), 2);
    }

    #[test]
    fn test_errors_propagate() {
        let data = TreeNode::new("data")
            .with_child(location("point1", "38.99", "-77.01"))
            .with_child(time_layout("k-p1h-n2-1", &HOURS))
            .with_child(temperatures("point1", "k-p1h-n2-1", &["71"]));

        let result = DataSubtreeParser::default().parse(&data);
        assert!(matches!(
            result,
            Err(DwmlError::TimeFrameCountMismatch { expected: 2, actual: 1, .. })
        ));

        let skipping = DataSubtreeParser::new(
            ParserConfig::default().with_skip_non_matching_entry_count(true),
        );
        let result = skipping.parse(&data).unwrap();
        assert!(result["point1"].values.is_empty());
    }

    #[test]
    fn test_empty_data() {
        let result = DataSubtreeParser::default().parse(&TreeNode::new("data")).unwrap();
        assert!(result.is_empty());
    }
}
