//! Parser configuration
//!
//! Handles loading parser options from an optional TOML file and `DWML_`
//! environment variables, and provides validation for them.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::DwmlError;

/// How nested sub-conditions of a `weather-conditions` element are decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherConditionsMode {
    /// Decode the first nested sub-condition, drop the rest
    #[default]
    FirstOnly,
    /// Decode the first one as usual and keep the others in `additional`
    All,
}

/// Options for one parse run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Omit parameters whose value count disagrees with their time layout
    /// instead of failing the whole parse
    #[serde(default)]
    pub skip_properties_with_non_matching_entry_count: bool,
    /// Parameter keys and attribute names left out of the output
    #[serde(default)]
    pub skipped_attributes: BTreeSet<String>,
    #[serde(default)]
    pub weather_conditions: WeatherConditionsMode,
}

impl ParserConfig {
    #[must_use]
    pub fn with_skip_non_matching_entry_count(mut self, skip: bool) -> Self {
        self.skip_properties_with_non_matching_entry_count = skip;
        self
    }

    #[must_use]
    pub fn with_skipped_attribute<S: Into<String>>(mut self, name: S) -> Self {
        self.skipped_attributes.insert(name.into());
        self
    }

    #[must_use]
    pub fn with_skipped_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skipped_attributes
            .extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_weather_conditions(mut self, mode: WeatherConditionsMode) -> Self {
        self.weather_conditions = mode;
        self
    }

    /// Whether a parameter key or attribute name is excluded from output
    #[must_use]
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skipped_attributes.contains(name)
    }

    /// Load configuration from environment variables only
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from a TOML file (if it exists) overlaid with
    /// `DWML_` environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(config_file) = config_path.filter(|path| path.exists()) {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("DWML")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("skipped_attributes"),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build parser configuration")?;

        let config: ParserConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize parser configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), DwmlError> {
        if self
            .skipped_attributes
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(DwmlError::config(
                "Skipped attribute names cannot be empty",
            ));
        }

        Ok(())
    }
}
