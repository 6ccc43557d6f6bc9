//! Error types for DWML parsing

use thiserror::Error;

/// Main error type for the DWML parser
#[derive(Error, Debug)]
pub enum DwmlError {
    /// A `location` or `parameters` block has no location key
    #[error("Missing location key: {message}")]
    MissingLocationKey { message: String },

    /// A `location` block has no usable `point` child
    #[error("Missing point: {message}")]
    MissingPoint { message: String },

    /// A `time-layout` block has no `layout-key` child
    #[error("Time layout is missing key: {message}")]
    MissingLayoutKey { message: String },

    /// Parameter value count disagrees with the referenced layout
    #[error(
        "The number of time frames in the time layout {layout_key} ({expected}) does not match the number of dataSet children value entries ({actual})"
    )]
    TimeFrameCountMismatch {
        layout_key: String,
        expected: usize,
        actual: usize,
    },

    /// A parameter references a time layout that was never declared
    #[error("Parameter {parameter} references unknown time layout {layout_key}")]
    UnknownTimeLayout {
        layout_key: String,
        parameter: String,
    },

    /// A timestamp needed for interval arithmetic is not RFC 3339
    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The document root is not a DWML tree
    #[error("Invalid DWML document: {message}")]
    InvalidDocument { message: String },

    /// Malformed XML
    #[error("XML error: {message}")]
    Xml { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DwmlError {
    /// Create a new missing location key error
    pub fn missing_location_key<S: Into<String>>(message: S) -> Self {
        Self::MissingLocationKey {
            message: message.into(),
        }
    }

    /// Create a new missing point error
    pub fn missing_point<S: Into<String>>(message: S) -> Self {
        Self::MissingPoint {
            message: message.into(),
        }
    }

    /// Create a new missing layout key error
    pub fn missing_layout_key<S: Into<String>>(message: S) -> Self {
        Self::MissingLayoutKey {
            message: message.into(),
        }
    }

    /// Create a new invalid document error
    pub fn invalid_document<S: Into<String>>(message: S) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Create a new XML error
    pub fn xml<S: Into<String>>(message: S) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the skip option may turn this error into an omitted parameter
    #[must_use]
    pub fn is_alignment_error(&self) -> bool {
        matches!(
            self,
            DwmlError::TimeFrameCountMismatch { .. } | DwmlError::UnknownTimeLayout { .. }
        )
    }
}
