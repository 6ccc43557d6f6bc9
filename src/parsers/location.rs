use crate::models::Location;
use crate::tree::TreeNode;
use crate::{DwmlError, Result};

/// Parser for `location` blocks
pub struct LocationParser;

impl LocationParser {
    /// Extract the location key and point coordinates of a `location` node
    pub fn parse(location: &TreeNode) -> Result<(String, Location)> {
        let key = location
            .child("location-key")
            .and_then(TreeNode::content)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DwmlError::missing_location_key(format!(
                    "Location is missing key: {}",
                    location.describe()
                ))
            })?;

        let point = location.child("point").ok_or_else(|| {
            DwmlError::missing_point(format!(
                "Location {key} is missing point: {}",
                location.describe()
            ))
        })?;

        let coordinate = |name: &str| {
            point.attribute(name).ok_or_else(|| {
                DwmlError::missing_point(format!("Point of location {key} has no {name}"))
            })
        };

        let coordinates = Location::new(coordinate("latitude")?, coordinate("longitude")?);
        Ok((key.to_string(), coordinates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        let node = TreeNode::new("location")
            .with_child(TreeNode::new("location-key").with_content("point1"))
            .with_child(
                TreeNode::new("point")
                    .with_attribute("latitude", "38.99")
                    .with_attribute("longitude", "-77.01"),
            );

        let (key, location) = LocationParser::parse(&node).unwrap();
        assert_eq!(key, "point1");
        assert_eq!(location, Location::new("38.99", "-77.01"));
    }

    #[test]
    fn test_missing_location_key() {
        let node = TreeNode::new("location").with_child(
            TreeNode::new("point")
                .with_attribute("latitude", "38.99")
                .with_attribute("longitude", "-77.01"),
        );
        let result = LocationParser::parse(&node);
        assert!(matches!(result, Err(DwmlError::MissingLocationKey { .. })));
    }

    #[test]
    fn test_missing_point() {
        let node = TreeNode::new("location")
            .with_child(TreeNode::new("location-key").with_content("point1"));
        let result = LocationParser::parse(&node);
        assert!(matches!(result, Err(DwmlError::MissingPoint { .. })));
    }

    #[test]
    fn test_point_without_longitude() {
        let node = TreeNode::new("location")
            .with_child(TreeNode::new("location-key").with_content("point1"))
            .with_child(TreeNode::new("point").with_attribute("latitude", "38.99"));
        let err = LocationParser::parse(&node).unwrap_err();
        assert!(matches!(err, DwmlError::MissingPoint { .. }));
        assert!(err.to_string().contains("longitude"));
    }
}
