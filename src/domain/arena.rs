use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::node::{Forest, TreeNode};

/// Data payload for nodes under construction.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub label: String,
    pub branch_path: Option<String>,
}

/// Node in the arena, linked to its parent and children by index.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
}

/// Arena-backed forest used while building.
///
/// Nodes are addressed by index so the builder can keep a stack of open
/// ancestors and still append to them. [`ForestArena::into_forest`] turns
/// it into the owned [`Forest`].
#[derive(Debug, Default)]
pub struct ForestArena {
    arena: Arena<ArenaNode>,
    roots: Vec<Index>,
}

impl ForestArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        match parent.and_then(|idx| self.arena.get_mut(idx)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Move all nodes into an owned forest, keeping sibling order.
    ///
    /// Children are assembled before their parents, so no recursion is needed.
    #[instrument(level = "debug", skip(self), fields(nodes = self.arena.len()))]
    pub fn into_forest(mut self) -> Forest {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        let mut built: HashMap<Index, TreeNode> = HashMap::with_capacity(order.len());

        for idx in order {
            let Some(node) = self.arena.remove(idx) else {
                continue;
            };
            let children = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(
                idx,
                TreeNode {
                    label: node.data.label,
                    children,
                    branch_path: node.data.branch_path,
                },
            );
        }

        let roots = self
            .roots
            .iter()
            .filter_map(|root| built.remove(root))
            .collect::<Vec<_>>();
        Forest::from(roots)
    }
}

/// Post-order walk over every tree of the arena, roots in order.
pub struct PostOrderIterator<'a> {
    arena: &'a ForestArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a ForestArena) -> Self {
        let stack = arena.roots.iter().rev().map(|&root| (root, false)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
