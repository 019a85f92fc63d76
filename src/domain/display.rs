use termtree::Tree;

use crate::domain::node::{Forest, TreeNode};

/// Conversion into printable `termtree` trees.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Vec<Tree<String>>;
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string(&self) -> Vec<Tree<String>> {
        // Children first, then wrap them under this node's label
        let leaves: Vec<_> = self
            .children
            .iter()
            .flat_map(|c| c.to_tree_string())
            .collect();

        vec![Tree::new(self.label.clone()).with_leaves(leaves)]
    }
}

impl TreeNodeConvert for Forest {
    fn to_tree_string(&self) -> Vec<Tree<String>> {
        self.roots()
            .iter()
            .flat_map(|root| root.to_tree_string())
            .collect()
    }
}
