//! Tree builder: leveled entries to an ordered forest.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{ForestArena, NodeData};
use crate::domain::node::{Forest, BRANCH_SEPARATOR};
use crate::domain::outline::LeveledEntry;

/// Options resolved by the caller before building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Materialize the ` :: `-joined path from the root on every node.
    pub branch_mode: bool,
}

/// Assembles leveled entries into a forest.
///
/// Keeps a stack of open ancestors, one per depth. A line indented deeper
/// than the stack allows is attached to the deepest open node instead of
/// being rejected.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
}

impl TreeBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    #[instrument(level = "debug", skip(self, entries), fields(entries = entries.len(), branch_mode = self.options.branch_mode))]
    pub fn build(&self, entries: &[LeveledEntry]) -> Forest {
        let mut arena = ForestArena::new();
        let mut stack: Vec<Index> = Vec::new();

        for entry in entries {
            let effective = entry.level.min(stack.len());
            if effective < entry.level {
                debug!(
                    label = %entry.label,
                    level = entry.level,
                    effective,
                    "clamped over-indented entry"
                );
            }
            stack.truncate(effective);

            let parent = stack.last().copied();
            let branch_path = self.branch_path(&arena, parent, &entry.label);
            let idx = arena.insert_node(
                NodeData {
                    label: entry.label.clone(),
                    branch_path,
                },
                parent,
            );
            stack.push(idx);
        }

        arena.into_forest()
    }

    fn branch_path(&self, arena: &ForestArena, parent: Option<Index>, label: &str) -> Option<String> {
        if !self.options.branch_mode {
            return None;
        }
        let prefix = parent
            .and_then(|idx| arena.get_node(idx))
            .and_then(|node| node.data.branch_path.as_deref());
        Some(match prefix {
            Some(prefix) => format!("{prefix}{BRANCH_SEPARATOR}{label}"),
            None => label.to_string(),
        })
    }
}

/// Build a forest from leveled entries.
pub fn build(entries: &[LeveledEntry], options: BuildOptions) -> Forest {
    TreeBuilder::new(options).build(entries)
}
