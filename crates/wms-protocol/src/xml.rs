//! XML to element-tree parsing for capabilities documents.
//!
//! Every element becomes an [`Element`] holding its attributes, its children
//! grouped by tag name (document order preserved within a tag), and its
//! trimmed text content. Lookups go through explicit helpers that return
//! `Option`, so a missing path segment is visible at the call site.

use std::collections::BTreeMap;

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;
use wms_common::{WmsError, WmsResult};

/// The `<?xml ...?>` prolog of a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// One XML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified tag name as written in the document
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    /// Child elements keyed by tag name
    pub children: BTreeMap<String, Vec<Element>>,
    /// Concatenated text and CDATA content, trimmed; `None` when blank
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.entry(child.name.clone()).or_default().push(child);
    }

    /// Attribute value by name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.get(tag).and_then(|c| c.first())
    }

    /// All children with the given tag, in document order.
    pub fn children(&self, tag: &str) -> &[Element] {
        self.children.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Follow a chain of tags, taking the first match at each step.
    pub fn path(&self, tags: &[&str]) -> Option<&Element> {
        tags.iter().try_fold(self, |node, tag| node.child(tag))
    }

    /// Text of the first child with the given tag.
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(Element::text)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// An element without attributes or children collapses to its text.
    pub fn is_leaf(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    /// The collapsed value of a leaf element.
    pub fn as_text(&self) -> Option<&str> {
        if self.is_leaf() {
            self.text()
        } else {
            None
        }
    }

    fn from_start(start: &BytesStart<'_>, position: usize) -> WmsResult<Self> {
        let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
        for attr in start.attributes() {
            let attr = attr.map_err(|e| xml_error(position, e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| xml_error(position, e))?
                .into_owned();
            element.attributes.insert(key, value);
        }
        Ok(element)
    }

    fn append_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }
}

/// A parsed capabilities document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitiesDocument {
    pub declaration: Option<XmlDeclaration>,
    pub root: Element,
}

impl CapabilitiesDocument {
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The root element's `version` attribute (`1.3.0`, `1.1.1`, ...).
    pub fn version(&self) -> Option<&str> {
        self.root.attr("version")
    }
}

/// Parse capabilities XML text into an element tree.
pub fn parse_capabilities(xml: &str) -> WmsResult<CapabilitiesDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut declaration = None;
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut element_count = 0usize;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Decl(decl)) => {
                declaration = Some(parse_declaration(&decl, position)?);
            }
            Ok(Event::Start(start)) => {
                stack.push(Element::from_start(&start, position)?);
            }
            Ok(Event::Empty(start)) => {
                let element = Element::from_start(&start, position)?;
                element_count += 1;
                attach(&mut stack, &mut root, element, position)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| xml_error(position, "closing tag without an open element"))?;
                element_count += 1;
                attach(&mut stack, &mut root, element, position)?;
            }
            Ok(Event::Text(text)) => {
                if let Some(current) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| xml_error(position, e))?;
                    current.append_text(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(current) = stack.last_mut() {
                    current.append_text(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(reader.buffer_position(), e)),
            // comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(
            reader.buffer_position(),
            format!("unexpected end of document inside <{}>", open.name),
        ));
    }

    let root = root.ok_or_else(|| xml_error(0, "document has no root element"))?;
    debug!(root = %root.name, elements = element_count, "Parsed capabilities document");

    Ok(CapabilitiesDocument { declaration, root })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: usize,
) -> WmsResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None if root.is_some() => {
            return Err(xml_error(
                position,
                format!("second root element <{}>", element.name),
            ))
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn parse_declaration(decl: &BytesDecl<'_>, position: usize) -> WmsResult<XmlDeclaration> {
    let version = decl.version().map_err(|e| xml_error(position, e))?;
    let encoding = match decl.encoding() {
        Some(enc) => Some(enc.map_err(|e| xml_error(position, e))?),
        None => None,
    };
    let standalone = match decl.standalone() {
        Some(sa) => Some(sa.map_err(|e| xml_error(position, e))?),
        None => None,
    };

    Ok(XmlDeclaration {
        version: String::from_utf8_lossy(&version).into_owned(),
        encoding: encoding.map(|e| String::from_utf8_lossy(&e).into_owned()),
        standalone: standalone.map(|s| String::from_utf8_lossy(&s).into_owned()),
    })
}

fn xml_error(position: usize, err: impl std::fmt::Display) -> WmsError {
    WmsError::XmlParse {
        position,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms">
  <Service>
    <Name>WMS</Name>
    <Title>TerraBrasilis &amp; friends</Title>
  </Service>
  <Capability>
    <Layer>
      <Layer queryable="1"><Name>a</Name></Layer>
      <Layer queryable="0"><Name>b</Name></Layer>
      <Layer><Name><![CDATA[c]]></Name><Style/></Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

    #[test]
    fn test_declaration_and_root_version() {
        let doc = parse_capabilities(SMALL).unwrap();
        let decl = doc.declaration.as_ref().unwrap();
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(doc.root().name, "WMS_Capabilities");
        assert_eq!(doc.version(), Some("1.3.0"));
    }

    #[test]
    fn test_leaf_text_and_unescape() {
        let doc = parse_capabilities(SMALL).unwrap();
        let service = doc.root().child("Service").unwrap();
        assert_eq!(service.child_text("Name"), Some("WMS"));
        assert_eq!(service.child_text("Title"), Some("TerraBrasilis & friends"));
        assert!(service.child("Name").unwrap().is_leaf());
        assert_eq!(service.child("Name").unwrap().as_text(), Some("WMS"));
        assert_eq!(service.as_text(), None);
    }

    #[test]
    fn test_repeated_tags_keep_document_order() {
        let doc = parse_capabilities(SMALL).unwrap();
        let layers = doc
            .root()
            .path(&["Capability", "Layer"])
            .unwrap()
            .children("Layer");
        let names: Vec<_> = layers.iter().filter_map(|l| l.child_text("Name")).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(layers[0].attr("queryable"), Some("1"));
        assert!(layers[2].child("Style").is_some());
    }

    #[test]
    fn test_missing_path_is_none() {
        let doc = parse_capabilities(SMALL).unwrap();
        assert!(doc.root().path(&["Capability", "Request", "GetMap"]).is_none());
        assert!(doc.root().children("Nope").is_empty());
    }

    #[test]
    fn test_element_builder_matches_parsed_tree() {
        let parsed = parse_capabilities("<Layer a=\"1\"><Name>x</Name></Layer>").unwrap();
        let built = Element::new("Layer")
            .with_attribute("a", "1")
            .with_child(Element::new("Name").with_text("x"));
        assert_eq!(parsed.root, built);
        assert!(parsed.declaration.is_none());
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = parse_capabilities("<a><b></a></b>").unwrap_err();
        assert!(matches!(err, WmsError::XmlParse { .. }));
    }

    #[test]
    fn test_unclosed_root() {
        let err = parse_capabilities("<a><b>text</b>").unwrap_err();
        assert!(matches!(err, WmsError::XmlParse { .. }));
    }

    #[test]
    fn test_empty_and_multiple_roots() {
        assert!(matches!(
            parse_capabilities("   "),
            Err(WmsError::XmlParse { .. })
        ));
        assert!(matches!(
            parse_capabilities("<a/><b/>"),
            Err(WmsError::XmlParse { .. })
        ));
    }
}
