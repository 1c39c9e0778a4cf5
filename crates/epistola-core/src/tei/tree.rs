use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("Malformed markup: {0}")]
    Malformed(#[from] quick_xml::Error),
    #[error("Document has no root element")]
    NoRoot,
    #[error("Unclosed element: {0}")]
    Unclosed(String),
}

pub type XmlResult<T> = Result<T, XmlError>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

/// Owned element tree. Element names are stored without their namespace
/// prefix; attribute names keep theirs (`xml:id`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn parse(xml: &str) -> XmlResult<Self> {
        let mut reader = XmlReader::from_str(xml);
        let mut stack: Vec<Self> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }
        root.ok_or(XmlError::NoRoot)
    }

    fn from_start(start: &BytesStart<'_>) -> XmlResult<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();

        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text before the first child element.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self.children.first() {
            Some(Node::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// All text in the subtree, in document order.
    #[must_use]
    pub fn itertext(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.elements().find(|e| e.name == name)
    }

    /// Follows `a/b/c` through direct children.
    #[must_use]
    pub fn child_path(&self, path: &str) -> Option<&Self> {
        path.split('/')
            .try_fold(self, |element, segment| element.child(segment))
    }

    /// First match of `.//first/rest...`: the first segment may sit anywhere
    /// below this element, the remaining segments are direct children.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Self> {
        self.find_all(path).into_iter().next()
    }

    #[must_use]
    pub fn find_all(&self, path: &str) -> Vec<&Self> {
        let (first, rest) = match path.split_once('/') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };

        let mut anchors = Vec::new();
        self.collect_descendants(first, &mut anchors);

        let mut found = Vec::new();
        for anchor in anchors {
            match rest {
                None => found.push(anchor),
                Some(rest) => anchor.collect_children(rest, &mut found),
            }
        }
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, out: &mut Vec<&'a Self>) {
        for element in self.elements() {
            if element.name == name {
                out.push(element);
            }
            element.collect_descendants(name, out);
        }
    }

    fn collect_children<'a>(&'a self, path: &str, out: &mut Vec<&'a Self>) {
        let (first, rest) = match path.split_once('/') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };

        for element in self.elements().filter(|e| e.name == first) {
            match rest {
                None => out.push(element),
                Some(rest) => element.collect_children(rest, out),
            }
        }
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader>
    <listPerson>
      <person xml:id="p1"><persName key="v1">Mario</persName></person>
      <person xml:id="p2"><persName key="v2">Luigi</persName></person>
    </listPerson>
  </teiHeader>
  <text><body><p>Caro <hi>amico</hi>, ti scrivo &amp; saluto</p><![CDATA[fine]]></body></text>
</TEI>"#;

    #[test]
    fn test_parse_strips_element_prefix() {
        let root = Element::parse(r#"<tei:TEI xmlns:tei="x"><tei:title>T</tei:title></tei:TEI>"#)
            .unwrap();
        assert_eq!(root.name(), "TEI");
        assert_eq!(root.child("title").and_then(Element::text), Some("T"));
    }

    #[test]
    fn test_find_all_preserves_document_order() {
        let root = Element::parse(SAMPLE).unwrap();
        let persons = root.find_all("listPerson/person");

        let ids: Vec<_> = persons.iter().filter_map(|p| p.attr("xml:id")).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(
            persons[1].child("persName").and_then(|n| n.attr("key")),
            Some("v2")
        );
    }

    #[test]
    fn test_itertext_includes_tails_and_cdata() {
        let root = Element::parse(SAMPLE).unwrap();
        let body = root.find("text/body").unwrap();

        let fragments = body.itertext();
        assert_eq!(
            fragments,
            vec!["Caro ", "amico", ", ti scrivo & saluto", "fine"]
        );
    }

    #[test]
    fn test_text_is_leading_text_only() {
        let root = Element::parse("<a><b>lead<c>inner</c>tail</b></a>").unwrap();
        let b = root.find("b").unwrap();
        assert_eq!(b.text(), Some("lead"));

        let empty = Element::parse("<a><b><c/></b></a>").unwrap();
        assert_eq!(empty.find("b").unwrap().text(), None);
    }

    #[test]
    fn test_child_path() {
        let root = Element::parse(SAMPLE).unwrap();
        let person = root.find("listPerson/person").unwrap();
        assert!(person.child_path("persName").is_some());
        assert!(person.child_path("persName/forename").is_none());
    }

    #[test]
    fn test_find_missing_path() {
        let root = Element::parse(SAMPLE).unwrap();
        assert!(root.find("msItem/title").is_none());
        assert!(root.find_all("listPlace/place").is_empty());
    }

    #[test]
    fn test_malformed_markup() {
        assert!(Element::parse("<a><b></a>").is_err());
        assert!(Element::parse("<a><b>").is_err());
        assert!(matches!(Element::parse("just text"), Err(XmlError::NoRoot)));
    }
}
