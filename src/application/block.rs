//! Reference-tree block data: hydration on save, outline text on edit.
//!
//! A block is a JSON object owned by the host. Only `tree`, `branch` and
//! `expanded` are interpreted here; every other field is carried through
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::application::error_ext::JsonResultExt;
use crate::application::{json, ApplicationError, ApplicationResult};
use crate::domain::{
    build, outline_depth, serialize, BuildOptions, Forest, LeveledEntry, OutlineParser, OutlineWarning,
    ParsedOutline,
};

/// The `tree` field: raw outline text until hydrated, a forest afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeData {
    Outline(String),
    Forest(Forest),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<TreeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockData {
    pub fn from_json(text: &str) -> ApplicationResult<Self> {
        json::from_str(text, "block data")
    }

    pub fn to_json(&self) -> ApplicationResult<String> {
        serde_json::to_string_pretty(self).with_json_context("block data")
    }

    /// Block holding raw outline text, as submitted by the edit form.
    pub fn with_outline(text: impl Into<String>) -> Self {
        Self {
            tree: Some(TreeData::Outline(text.into())),
            ..Default::default()
        }
    }

    pub fn forest(&self) -> Option<&Forest> {
        match &self.tree {
            Some(TreeData::Forest(forest)) => Some(forest),
            _ => None,
        }
    }

    pub fn is_hydrated(&self) -> bool {
        !matches!(self.tree, Some(TreeData::Outline(_)))
    }
}

/// Defaults applied to blocks that leave options unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDefaults {
    pub branch: bool,
    pub expanded: bool,
    /// Largest outline accepted, counted in non-blank lines.
    pub max_lines: usize,
    /// Deepest outline accepted, in levels.
    pub max_depth: usize,
}

impl Default for BlockDefaults {
    fn default() -> Self {
        Self {
            branch: false,
            expanded: false,
            max_lines: 10_000,
            max_depth: 256,
        }
    }
}

/// Hydrated block plus the annotations to show next to the edited text.
#[derive(Debug, Clone, PartialEq)]
pub struct Hydrated {
    pub data: BlockData,
    pub warnings: Vec<OutlineWarning>,
}

/// Convert the outline text of a block into a forest.
///
/// Blocks without a tree, or whose tree is already a forest, come back
/// unchanged, so hydrating twice is harmless.
#[instrument(level = "debug", skip(data))]
pub fn hydrate(mut data: BlockData, defaults: &BlockDefaults) -> ApplicationResult<Hydrated> {
    let text = match data.tree.take() {
        Some(TreeData::Outline(text)) => text,
        other => {
            debug!("block already hydrated");
            data.tree = other;
            return Ok(Hydrated {
                data,
                warnings: Vec::new(),
            });
        }
    };

    let branch = data.branch.unwrap_or(defaults.branch);
    let expanded = data.expanded.unwrap_or(defaults.expanded);

    let parsed = parse_checked(&text, defaults)?;
    let forest = build(&parsed.entries, BuildOptions { branch_mode: branch });
    info!(
        roots = forest.root_count(),
        nodes = forest.node_count(),
        warnings = parsed.warnings.len(),
        "hydrated reference tree"
    );

    data.tree = Some(TreeData::Forest(forest));
    data.branch = Some(branch);
    data.expanded = Some(expanded);

    Ok(Hydrated {
        data,
        warnings: parsed.warnings,
    })
}

/// Outline text shown in the edit form for a block.
pub fn form_text(data: &BlockData) -> String {
    match &data.tree {
        None => String::new(),
        Some(TreeData::Outline(text)) => text.clone(),
        Some(TreeData::Forest(forest)) => serialize(forest),
    }
}

/// Parse outline text within the configured size and depth limits.
pub fn parse_checked(text: &str, defaults: &BlockDefaults) -> ApplicationResult<ParsedOutline> {
    check_size(text, defaults.max_lines)?;
    let parsed = OutlineParser::new().parse(text);
    check_depth(&parsed.entries, defaults.max_depth)?;
    Ok(parsed)
}

/// Reject outlines above the configured size before parsing them.
pub fn check_size(text: &str, max_lines: usize) -> ApplicationResult<()> {
    let lines = OutlineParser::new().line_count(text);
    if lines > max_lines {
        return Err(ApplicationError::OutlineTooLarge {
            lines,
            max: max_lines,
        });
    }
    Ok(())
}

/// Reject entries that would build a forest deeper than `max_depth`.
pub fn check_depth(entries: &[LeveledEntry], max_depth: usize) -> ApplicationResult<()> {
    let depth = outline_depth(entries);
    if depth > max_depth {
        return Err(ApplicationError::OutlineTooDeep {
            depth,
            max: max_depth,
        });
    }
    Ok(())
}
