//! Generic attributed tree
//!
//! Every XML element becomes a [`TreeNode`] with the same shape: a tag name,
//! its attributes, its child elements in document order and its text
//! content. The DWML parsers only ever switch on [`TreeNode::name`].

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};

use crate::{DwmlError, Result};

const DESCRIBE_LIMIT: usize = 240;

/// One element of a parsed XML document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl TreeNode {
    /// Create an empty node with the given tag name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children<I: IntoIterator<Item = TreeNode>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this node's tag name is `name`
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute value, treating an empty value as absent
    pub fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key).filter(|value| !value.is_empty())
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// First child with the given tag name
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|child| child.is(name))
    }

    /// All children with the given tag name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TreeNode> + 'a {
        self.children.iter().filter(move |child| child.is(name))
    }

    /// Compact JSON rendering for error messages, cut to a readable length
    pub fn describe(&self) -> String {
        let rendered = serde_json::to_string(self).unwrap_or_else(|_| format!("<{}>", self.name));
        if rendered.chars().count() <= DESCRIBE_LIMIT {
            return rendered;
        }
        let mut short: String = rendered.chars().take(DESCRIBE_LIMIT).collect();
        short.push_str("...");
        short
    }

    /// Build a tree from XML text, returning the root element
    pub fn from_xml(xml: &str) -> Result<TreeNode> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut root: Option<TreeNode> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                DwmlError::xml(format!("at position {}: {e}", reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => stack.push(OpenElement::from_start(&start)?),
                Event::Empty(start) => {
                    let node = OpenElement::from_start(&start)?.close();
                    attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let open = stack
                        .pop()
                        .ok_or_else(|| DwmlError::xml("closing tag without an open element"))?;
                    attach(&mut stack, &mut root, open.close())?;
                }
                Event::Text(text) => {
                    if let Some(open) = stack.last_mut() {
                        let decoded = text.decode().map_err(|e| DwmlError::xml(e.to_string()))?;
                        open.text.push_str(&decoded);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(open) = stack.last_mut() {
                        let decoded = cdata.decode().map_err(|e| DwmlError::xml(e.to_string()))?;
                        open.text.push_str(&decoded);
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(open) = stack.last_mut() {
                        if let Some(ch) = reference
                            .resolve_char_ref()
                            .map_err(|e| DwmlError::xml(e.to_string()))?
                        {
                            open.text.push(ch);
                        } else {
                            let entity =
                                reference.decode().map_err(|e| DwmlError::xml(e.to_string()))?;
                            let resolved = resolve_predefined_entity(&entity).ok_or_else(|| {
                                DwmlError::xml(format!("unknown entity reference &{entity};"))
                            })?;
                            open.text.push_str(resolved);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(DwmlError::xml(format!(
                "unexpected end of document inside <{}>",
                open.node.name
            )));
        }

        root.ok_or_else(|| DwmlError::invalid_document("Cannot find document root"))
    }
}

/// Element whose end tag has not been read yet
struct OpenElement {
    node: TreeNode,
    text: String,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut node = TreeNode::new(String::from_utf8_lossy(start.name().as_ref()));

        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| DwmlError::xml(e.to_string()))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attribute.value);
            let value = unescape(&raw).map_err(|e| DwmlError::xml(e.to_string()))?;
            node.attributes.insert(key, value.into_owned());
        }

        Ok(Self {
            node,
            text: String::new(),
        })
    }

    fn close(mut self) -> TreeNode {
        let trimmed = self.text.trim();
        if !trimmed.is_empty() {
            self.node.content = Some(trimmed.to_string());
        }
        self.node
    }
}

fn attach(stack: &mut [OpenElement], root: &mut Option<TreeNode>, node: TreeNode) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.node.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(DwmlError::xml(format!(
            "document has more than one root element (second is <{}>)",
            node.name
        )));
    }
    *root = Some(node);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_accessors() {
        let node = TreeNode::new("location")
            .with_child(TreeNode::new("location-key").with_content("point1"))
            .with_child(
                TreeNode::new("point")
                    .with_attribute("latitude", "38.99")
                    .with_attribute("longitude", "-77.01"),
            );

        assert_eq!(node.name(), "location");
        assert_eq!(node.child("location-key").and_then(TreeNode::content), Some("point1"));
        assert_eq!(
            node.child("point").and_then(|p| p.attribute("latitude")),
            Some("38.99")
        );
        assert!(node.child("missing").is_none());
        assert_eq!(node.children_named("point").count(), 1);
    }

    #[test]
    fn test_non_empty_attribute() {
        let node = TreeNode::new("temperature")
            .with_attribute("type", "")
            .with_attribute("units", "Fahrenheit");
        assert_eq!(node.non_empty_attribute("type"), None);
        assert_eq!(node.non_empty_attribute("units"), Some("Fahrenheit"));
    }

    #[test]
    fn test_from_xml_builds_tree() {
        let xml = r#"<?xml version="1.0"?>
<dwml version="1.0">
  <data>
    <location>
      <location-key>point1</location-key>
      <point latitude="38.99" longitude="-77.01"/>
    </location>
  </data>
</dwml>"#;

        let root = TreeNode::from_xml(xml).unwrap();
        assert_eq!(root.name(), "dwml");
        assert_eq!(root.attribute("version"), Some("1.0"));
        assert_eq!(root.content(), None);

        let location = root.child("data").and_then(|d| d.child("location")).unwrap();
        assert_eq!(location.children().len(), 2);
        assert_eq!(
            location.child("location-key").and_then(TreeNode::content),
            Some("point1")
        );
        let point = location.child("point").unwrap();
        assert_eq!(point.attribute("longitude"), Some("-77.01"));
        assert!(point.children().is_empty());
    }

    #[test]
    fn test_from_xml_resolves_entities_and_cdata() {
        let xml = r#"<root label="a &amp; b"><name>Wind &amp; Gusts &#176;</name><note><![CDATA[<raw>]]></note></root>"#;
        let root = TreeNode::from_xml(xml).unwrap();
        assert_eq!(root.attribute("label"), Some("a & b"));
        assert_eq!(root.child("name").and_then(TreeNode::content), Some("Wind & Gusts °"));
        assert_eq!(root.child("note").and_then(TreeNode::content), Some("<raw>"));
    }

    #[test]
    fn test_from_xml_rejects_malformed_documents() {
        assert!(matches!(
            TreeNode::from_xml("<dwml><data></dwml>"),
            Err(DwmlError::Xml { .. })
        ));
        assert!(matches!(
            TreeNode::from_xml("<dwml><data>"),
            Err(DwmlError::Xml { .. })
        ));
        assert!(matches!(
            TreeNode::from_xml("   "),
            Err(DwmlError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_describe_is_truncated() {
        let node = TreeNode::new("name").with_content("x".repeat(1000));
        let described = node.describe();
        assert!(described.ends_with("..."));
        assert!(described.chars().count() <= DESCRIBE_LIMIT + 3);
    }
}
