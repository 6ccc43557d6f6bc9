//! Parsers for the blocks of a DWML `data` subtree
//!
//! - Time layouts: start/end markers paired into ordered frames
//! - Locations: location key and point coordinates
//! - Parameters: value series aligned to their time layout

pub mod location;
pub mod parameter;
pub mod time_layout;
pub mod utils;

// Re-export commonly used types from submodules
pub use location::LocationParser;
pub use parameter::ParameterParser;
pub use time_layout::TimeLayoutParser;
pub use utils::slugify;
