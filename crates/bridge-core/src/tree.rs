//! Minimal in-memory element tree.
//!
//! Enough of a DOM to drive the resolver from tests, the CLI and any host
//! that can snapshot its widget hierarchy: tag, attributes, own text and a
//! parent link per node.

use crate::resolver::ActionNode;
use std::collections::BTreeMap;

pub const IGNORE_ATTR: &str = "data-ignore-actions";
pub const ACTION_ATTR: &str = "data-action";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: Vec<Element>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    /// A tree holding a single `body` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Element {
                tag: "body".to_string(),
                attrs: BTreeMap::new(),
                text: String::new(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            text: String::new(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        self.nodes[id.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id.0].text = text.to_string();
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0].attrs.get(name).map(String::as_str)
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Own text followed by descendant text, space separated.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_text(id, &mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, id: NodeId, out: &mut Vec<&'a str>) {
        let el = &self.nodes[id.0];
        let own = el.text.trim();
        if !own.is_empty() {
            out.push(own);
        }
        for child in &el.children {
            self.collect_text(*child, out);
        }
    }
}

/// Borrowed handle used as the resolver's [`ActionNode`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a ElementTree,
    id: NodeId,
}

impl NodeRef<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl ActionNode for NodeRef<'_> {
    fn parent(&self) -> Option<Self> {
        self.tree.nodes[self.id.0].parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    fn ignores_actions(&self) -> bool {
        self.tree.attr(self.id, IGNORE_ATTR) == Some("true")
    }

    fn action_override(&self) -> Option<String> {
        self.tree.attr(self.id, ACTION_ATTR).map(str::to_string)
    }

    fn is_clickable(&self) -> bool {
        self.tree.tag(self.id) == "button" || self.tree.attr(self.id, "role") == Some("button")
    }

    fn text(&self) -> String {
        self.tree.text_content(self.id)
    }
}
