use serde::Serialize;

use crate::core::Result;

/// One element of a response document. Names are local (namespace prefix dropped)
/// and case-sensitive; siblings may share a name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub name: String,
    /// Trimmed text directly inside the element, `None` when there is none
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn leaf(name: impl Into<String>, text: Option<&str>) -> Self {
        Node {
            name: name.into(),
            text: text.and_then(trimmed_text),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All nodes called `name` in document order. The search does not descend
    /// into a node once it matched.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Node> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.name == name {
                found.push(node);
                continue;
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    /// Text of this node and all descendants, space separated.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        collect_text(self, &mut parts);
        parts.join(" ")
    }
}

fn collect_text<'a>(node: &'a Node, parts: &mut Vec<&'a str>) {
    if let Some(text) = &node.text {
        parts.push(text);
    }
    for child in &node.children {
        collect_text(child, parts);
    }
}

/// Surrounding whitespace is dropped; whitespace inside the value is kept.
fn trimmed_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parsed response of a single remote call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Document { root }
    }

    pub fn parse(xml: &str) -> Result<Self> {
        let tree = roxmltree::Document::parse(xml)?;
        Ok(Document {
            root: convert(tree.root_element()),
        })
    }
}

fn convert(element: roxmltree::Node<'_, '_>) -> Node {
    let raw_text: String = element
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();

    Node {
        name: element.tag_name().name().to_string(),
        text: trimmed_text(&raw_text),
        children: element
            .children()
            .filter(|c| c.is_element())
            .map(convert)
            .collect(),
    }
}
