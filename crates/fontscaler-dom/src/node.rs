use crate::style::StyleDeclarations;
use serde::Serialize;

/// Arena handle of a node. Handles stay valid (and never get reused) after removal; lookups of a
/// removed node simply fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum NodeKind {
    Document,
    Element { tag: String },
    Text(String),
    Comment(String),
}

impl NodeKind {
    pub fn is_element(&self) -> bool {
        matches!(self, NodeKind::Element { .. })
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub style: StyleDeclarations,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            style: StyleDeclarations::default(),
        }
    }

    /// Copy without tree links.
    pub fn shallow_copy(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            parent: None,
            children: Vec::new(),
            style: self.style.clone(),
        }
    }
}
