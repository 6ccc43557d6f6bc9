use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::slugify;
use crate::config::{ParserConfig, WeatherConditionsMode};
use crate::models::{
    ParameterRecord, ParameterValue, Reading, TimeFrame, TimeLayouts, WeatherCondition,
    WeatherSubCondition,
};
use crate::tree::TreeNode;
use crate::{DwmlError, Result};

/// Parser for `parameters` blocks
pub struct ParameterParser;

impl ParameterParser {
    /// Align every series of a `parameters` node to its time layout
    ///
    /// Returns the `applicable-location` key and the records keyed by
    /// `<tag>` or `<tag>-<slug of type>`.
    pub fn parse(
        time_layouts: &TimeLayouts,
        parameters: &TreeNode,
        config: &ParserConfig,
    ) -> Result<(String, BTreeMap<String, ParameterRecord>)> {
        let location_key = parameters
            .non_empty_attribute("applicable-location")
            .ok_or_else(|| {
                DwmlError::missing_location_key(format!(
                    "parameters element has no applicable-location: {}",
                    parameters.describe()
                ))
            })?
            .to_string();

        let records = parameters.children().iter().try_fold(
            BTreeMap::new(),
            |mut records: BTreeMap<String, ParameterRecord>, data_set| {
                let key = Self::record_key(data_set);
                if let Some(record) = Self::parse_data_set(time_layouts, data_set, &key, config)? {
                    match records.get_mut(&key) {
                        Some(existing) => existing.merge(record),
                        None => {
                            records.insert(key, record);
                        }
                    }
                }
                Ok::<_, DwmlError>(records)
            },
        )?;

        debug!(
            "Aligned {} parameters for location {}",
            records.len(),
            location_key
        );
        Ok((location_key, records))
    }

    /// `temperature` + type `hourly` becomes `temperature-hourly`
    pub fn record_key(data_set: &TreeNode) -> String {
        match data_set
            .attribute("type")
            .map(slugify)
            .filter(|slug| !slug.is_empty())
        {
            Some(slug) => format!("{}-{slug}", data_set.name()),
            None => data_set.name().to_string(),
        }
    }

    /// `Ok(None)` when the series is skipped by configuration, has no time
    /// layout, or cannot be aligned while the skip option is set
    fn parse_data_set(
        time_layouts: &TimeLayouts,
        data_set: &TreeNode,
        key: &str,
        config: &ParserConfig,
    ) -> Result<Option<ParameterRecord>> {
        if config.is_skipped(key) {
            debug!("Skipping configured parameter {}", key);
            return Ok(None);
        }
        let Some(layout_key) = data_set.non_empty_attribute("time-layout") else {
            debug!("Parameter {} has no time layout, skipping", key);
            return Ok(None);
        };

        match Self::align(time_layouts, data_set, key, layout_key, config) {
            Ok(values) => {
                let attributes = data_set
                    .attributes()
                    .iter()
                    // `values` would collide with the series once flattened
                    .filter(|(name, _)| name.as_str() != "values" && !config.is_skipped(name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                Ok(Some(ParameterRecord { attributes, values }))
            }
            Err(e) if e.is_alignment_error() && config.skip_properties_with_non_matching_entry_count => {
                warn!("Omitting parameter {}: {}", key, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn align(
        time_layouts: &TimeLayouts,
        data_set: &TreeNode,
        key: &str,
        layout_key: &str,
        config: &ParserConfig,
    ) -> Result<Vec<ParameterValue>> {
        let frames = time_layouts
            .get(layout_key)
            .ok_or_else(|| DwmlError::UnknownTimeLayout {
                layout_key: layout_key.to_string(),
                parameter: key.to_string(),
            })?;

        // `name` children label the series and carry no data point
        let value_count = data_set
            .children()
            .iter()
            .filter(|child| !child.is("name"))
            .count();

        if value_count != frames.len() {
            return Err(DwmlError::TimeFrameCountMismatch {
                layout_key: layout_key.to_string(),
                expected: frames.len(),
                actual: value_count,
            });
        }

        Ok(Self::zip_values(data_set.children(), frames, config.weather_conditions))
    }

    /// Pair each `value` / `weather-conditions` child with the frame at the
    /// same position
    fn zip_values(
        children: &[TreeNode],
        frames: &[TimeFrame],
        mode: WeatherConditionsMode,
    ) -> Vec<ParameterValue> {
        children
            .iter()
            .filter(|child| child.is("value") || child.is("weather-conditions"))
            .zip(frames)
            .map(|(child, frame)| ParameterValue {
                frame: frame.clone(),
                value: Self::reading(child, mode),
            })
            .collect()
    }

    fn reading(child: &TreeNode, mode: WeatherConditionsMode) -> Reading {
        if child.is("weather-conditions") {
            return Reading::Weather(Self::weather_condition(child, mode));
        }
        match child.content() {
            Some(content) => Reading::Text(content.to_string()),
            None => Reading::Nil,
        }
    }

    fn weather_condition(node: &TreeNode, mode: WeatherConditionsMode) -> WeatherCondition {
        let summary = node.attribute("weather-summary").map(str::to_string);
        let mut sub_conditions = node.children().iter().map(Self::sub_condition);

        let Some(primary) = sub_conditions.next() else {
            return WeatherCondition::summary_only(summary);
        };

        let mut condition = WeatherCondition::with_primary(summary, primary);
        if mode == WeatherConditionsMode::All {
            condition.additional = sub_conditions.collect();
        }
        condition
    }

    fn sub_condition(node: &TreeNode) -> WeatherSubCondition {
        let attribute = |name: &str| node.attribute(name).map(str::to_string);
        WeatherSubCondition {
            coverage: attribute("coverage"),
            intensity: attribute("intensity"),
            weather_type: attribute("weather-type"),
            qualifier: attribute("qualifier"),
        }
    }
}
