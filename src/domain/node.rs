//! Forest model: ordered trees of labels.

use serde::{Deserialize, Serialize};

/// Joins ancestor labels in a materialized branch path.
pub const BRANCH_SEPARATOR: &str = " :: ";

/// A label with its ordered children.
///
/// Each node owns its children; there is no sharing between trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    /// Full path from the root, set only when built in branch mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_path: Option<String>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            branch_path: None,
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_branch_path(mut self, branch_path: impl Into<String>) -> Self {
        self.branch_path = Some(branch_path.into());
        self
    }

    /// Value matched against resource data: the branch path when present,
    /// otherwise the label.
    pub fn match_key(&self) -> &str {
        self.branch_path.as_deref().unwrap_or(&self.label)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// One node of a flattened forest, in pre-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatNode {
    pub label: String,
    pub depth: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_path: Option<String>,
}

/// Ordered sequence of independent root trees.
///
/// Serializes as a plain array of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    roots: Vec<TreeNode>,
}

impl From<Vec<TreeNode>> for Forest {
    fn from(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of top-level labels.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of labels at every depth.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Number of levels; 0 for an empty forest.
    pub fn depth(&self) -> usize {
        self.iter().map(|(_, depth)| depth + 1).max().unwrap_or(0)
    }

    /// Whether nodes carry materialized branch paths.
    pub fn has_branch_paths(&self) -> bool {
        self.roots.iter().any(|root| root.branch_path.is_some())
    }

    /// Pre-order walk yielding each node with its depth.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(&self.roots)
    }

    /// Labels of nodes without children, in pre-order.
    pub fn leaves(&self) -> Vec<&str> {
        self.iter()
            .filter(|(node, _)| node.is_leaf())
            .map(|(node, _)| node.label.as_str())
            .collect()
    }

    /// Flatten into `(label, depth, branch_path)` rows, in pre-order.
    pub fn flatten(&self) -> Vec<FlatNode> {
        self.iter()
            .map(|(node, depth)| FlatNode {
                label: node.label.clone(),
                depth,
                branch_path: node.branch_path.clone(),
            })
            .collect()
    }
}

/// Iterative pre-order traversal over a forest.
pub struct PreOrder<'a> {
    stack: Vec<(&'a TreeNode, usize)>,
}

impl<'a> PreOrder<'a> {
    fn new(roots: &'a [TreeNode]) -> Self {
        // Push in reverse so the first root pops first
        let stack = roots.iter().rev().map(|node| (node, 0)).collect();
        Self { stack }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (&'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((node, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Europe
    // ├── France
    // │   └── Paris
    // └── United Kingdom
    // Asia
    fn sample() -> Forest {
        Forest::from(vec![
            TreeNode::new("Europe").with_children(vec![
                TreeNode::new("France").with_children(vec![TreeNode::new("Paris")]),
                TreeNode::new("United Kingdom"),
            ]),
            TreeNode::new("Asia"),
        ])
    }

    #[test]
    fn given_forest_when_iterating_then_pre_order_with_depth() {
        let forest = sample();

        let walked: Vec<(&str, usize)> = forest
            .iter()
            .map(|(node, depth)| (node.label.as_str(), depth))
            .collect();

        assert_eq!(
            walked,
            vec![
                ("Europe", 0),
                ("France", 1),
                ("Paris", 2),
                ("United Kingdom", 1),
                ("Asia", 0),
            ]
        );
    }

    #[test]
    fn given_forest_when_counting_then_roots_nodes_and_depth() {
        let forest = sample();

        assert_eq!(forest.root_count(), 2);
        assert_eq!(forest.node_count(), 5);
        assert_eq!(forest.depth(), 3);
        assert_eq!(forest.leaves(), vec!["Paris", "United Kingdom", "Asia"]);
    }

    #[test]
    fn given_empty_forest_when_counting_then_zero() {
        let forest = Forest::new();

        assert_eq!(forest.node_count(), 0);
        assert_eq!(forest.depth(), 0);
        assert!(forest.flatten().is_empty());
    }

    #[test]
    fn given_branch_path_when_matching_then_path_wins_over_label() {
        let plain = TreeNode::new("Paris");
        let branch = TreeNode::new("Paris").with_branch_path("Europe :: France :: Paris");

        assert_eq!(plain.match_key(), "Paris");
        assert_eq!(branch.match_key(), "Europe :: France :: Paris");
    }

    #[test]
    fn given_forest_when_serializing_json_then_plain_array_without_empty_fields() {
        let forest = Forest::from(vec![TreeNode::new("Asia").with_children(vec![TreeNode::new("Japan")])]);

        let json = serde_json::to_string(&forest).unwrap();

        assert_eq!(json, r#"[{"label":"Asia","children":[{"label":"Japan"}]}]"#);
        let back: Forest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, forest);
    }
}
