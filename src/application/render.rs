//! Rendering support: forest rows with counts for the presentation layer.
//!
//! Counting belongs to the host's search layer; it is reached through
//! [`ReferenceCounter`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::error_ext::JsonResultExt;
use crate::application::ApplicationResult;
use crate::domain::Forest;

/// Resource counts per label (or per branch path in branch mode).
pub trait ReferenceCounter {
    fn count(&self, key: &str) -> Option<u64>;
}

/// Counter that knows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCounts;

impl ReferenceCounter for NoCounts {
    fn count(&self, _key: &str) -> Option<u64> {
        None
    }
}

/// Map-backed counter, e.g. loaded from a JSON object `{"Paris": 12}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCounts(BTreeMap<String, u64>);

impl StaticCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> ApplicationResult<Self> {
        serde_json::from_str(text).with_json_context("counts")
    }

    pub fn insert(&mut self, key: impl Into<String>, count: u64) {
        self.0.insert(key.into(), count);
    }
}

impl ReferenceCounter for StaticCounts {
    fn count(&self, key: &str) -> Option<u64> {
        self.0.get(key).copied()
    }
}

/// What the block total counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TotalPolicy {
    /// Top-level labels only
    #[default]
    Roots,
    /// Labels at every depth
    Nodes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub total: TotalPolicy,
    pub expanded: bool,
    pub with_counts: bool,
}

/// One displayed label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub label: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTree {
    pub total: usize,
    pub expanded: bool,
    pub rows: Vec<RenderedRow>,
}

/// Flatten a forest into display rows, looking up counts by match key.
#[instrument(level = "debug", skip(forest, counter))]
pub fn render(forest: &Forest, counter: &dyn ReferenceCounter, options: RenderOptions) -> RenderedTree {
    let rows: Vec<RenderedRow> = forest
        .iter()
        .map(|(node, depth)| RenderedRow {
            label: node.label.clone(),
            depth,
            branch_path: node.branch_path.clone(),
            count: if options.with_counts {
                counter.count(node.match_key())
            } else {
                None
            },
        })
        .collect();

    let total = match options.total {
        TotalPolicy::Roots => forest.root_count(),
        TotalPolicy::Nodes => rows.len(),
    };
    debug!(total, rows = rows.len(), "rendered tree");

    RenderedTree {
        total,
        expanded: options.expanded,
        rows,
    }
}
