//! Outline serializer: forest back to editable outline text.

use itertools::Itertools;
use tracing::instrument;

use crate::domain::node::Forest;
use crate::domain::outline::{format_line, LeveledEntry};

/// Writes forests and leveled entries as outline text.
///
/// Output is one line per node in pre-order, joined with `\n`, without a
/// trailing newline. Parsing and building the output yields the same forest.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineSerializer;

impl OutlineSerializer {
    pub fn new() -> Self {
        Self
    }

    #[instrument(level = "debug", skip_all, fields(roots = forest.root_count()))]
    pub fn serialize(&self, forest: &Forest) -> String {
        forest
            .iter()
            .map(|(node, depth)| format_line(depth, &node.label))
            .join("\n")
    }

    pub fn serialize_entries(&self, entries: &[LeveledEntry]) -> String {
        entries.iter().join("\n")
    }

    /// Leveled sequence of a forest, in pre-order.
    pub fn levels(&self, forest: &Forest) -> Vec<LeveledEntry> {
        forest
            .iter()
            .map(|(node, depth)| LeveledEntry {
                level: depth,
                label: node.label.clone(),
            })
            .collect()
    }
}

/// Serialize a forest as outline text.
pub fn serialize(forest: &Forest) -> String {
    OutlineSerializer::new().serialize(forest)
}
