/// A node in the emitted XML document.
///
/// Blank nodes render as empty lines; the emitter inserts them between
/// sibling groups. Comments are preserved verbatim.
#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(XmlElement),
    Comment(String),
    Blank,
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone)]
pub struct XmlElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    /// Line-width budget before attributes wrap, overriding the writer's
    /// default. Mapping elements use a tighter budget.
    pub wrap_budget: Option<usize>,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            wrap_budget: None,
        }
    }

    /// Builder-style attribute append.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder-style child append.
    pub fn child(mut self, element: XmlElement) -> Self {
        self.children.push(XmlNode::Element(element));
        self
    }

    /// Builder-style wrap-budget override.
    pub fn wrap_budget(mut self, budget: usize) -> Self {
        self.wrap_budget = Some(budget);
        self
    }

    pub fn push(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    /// Append a blank separator line.
    pub fn blank(&mut self) {
        self.children.push(XmlNode::Blank);
    }

    /// Drop a trailing blank separator, if any.
    pub fn trim_trailing_blank(&mut self) {
        if matches!(self.children.last(), Some(XmlNode::Blank)) {
            self.children.pop();
        }
    }
}
