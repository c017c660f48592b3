//! Labeled tree of tapset functions and their parameters.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Role of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Root or grouping node, never searchable
    Group,

    /// Searchable leaf, e.g. a tapset function
    Function,

    /// Definition node under a leaf, e.g. a function parameter
    Parameter,
}

/// A node with an ordered list of owned children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Display text
    pub label: String,

    /// Payload; for parameters the synthetic locator `"function <name>"`
    pub data: String,

    /// Provenance of a definition node (its parent's label)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Empty grouping node
    pub fn group(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            data: label.clone(),
            label,
            definition: None,
            kind: NodeKind::Group,
            children: Vec::new(),
        }
    }

    /// Searchable leaf whose data is its label
    pub fn function(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            data: name.clone(),
            label: name,
            definition: None,
            kind: NodeKind::Function,
            children: Vec::new(),
        }
    }

    /// Definition node carrying a locator and its parent's label
    pub fn parameter(
        label: impl Into<String>,
        data: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
            definition: Some(definition.into()),
            kind: NodeKind::Parameter,
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&TreeNode> {
        self.children.get(index)
    }

    /// First direct child with the given label
    pub fn find(&self, label: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.label == label)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Sort direct children by label, case-insensitively
    ///
    /// Ties fall back to the exact label so the order is total. The sort is
    /// stable and does not descend: parameter order stays declaration order.
    pub fn sort_children(&mut self) {
        self.children.sort_by(|a, b| compare_labels(&a.label, &b.label));
    }
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
