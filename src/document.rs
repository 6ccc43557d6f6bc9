//! DWML document front end
//!
//! Reads XML text into a [`TreeNode`], checks that it is a DWML document and
//! hands its `data` element to [`DataSubtreeParser`].

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::ParserConfig;
use crate::data::DataSubtreeParser;
use crate::models::ParseResult;
use crate::tree::TreeNode;
use crate::{DwmlError, Result};

/// DWML document parser
#[derive(Debug, Clone, Default)]
pub struct DwmlParser {
    data_parser: DataSubtreeParser,
}

impl DwmlParser {
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self {
            data_parser: DataSubtreeParser::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        self.data_parser.config()
    }

    /// Load and parse a DWML file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParseResult> {
        let path = path.as_ref();
        info!("Loading DWML document from: {:?}", path);

        let xml = fs::read_to_string(path)?;
        self.parse_str(&xml)
    }

    /// Parse DWML document text
    #[tracing::instrument(name = "parse_dwml", level = "debug", skip_all, fields(bytes = xml.len()))]
    pub fn parse_str(&self, xml: &str) -> Result<ParseResult> {
        let root = TreeNode::from_xml(xml)?;
        let result = self.parse_tree(&root)?;
        info!("Parsed DWML document with {} locations", result.len());
        Ok(result)
    }

    /// Parse an already built document tree
    ///
    /// Only the first `data` element is read.
    pub fn parse_tree(&self, root: &TreeNode) -> Result<ParseResult> {
        let data = Self::data_subtree(root)?;
        self.data_parser.parse(data)
    }

    fn data_subtree(root: &TreeNode) -> Result<&TreeNode> {
        if !root.is("dwml") {
            return Err(DwmlError::invalid_document(
                "Root element is supposed to be named \"dwml\"",
            ));
        }

        root.child("data").ok_or_else(|| {
            DwmlError::invalid_document(
                "Cannot find DWML data [ie, the data element of the dwml tree]",
            )
        })
    }
}
