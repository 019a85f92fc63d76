//! Block service
//!
//! Loads and stores block data files and runs the edit cycle: forest to
//! outline text in an editor, and back through hydration.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::block::{form_text, hydrate, parse_checked, BlockData, BlockDefaults, Hydrated, TreeData};
use crate::application::error_ext::IoResultExt;
use crate::application::{json, ApplicationResult};
use crate::domain::{build, BuildOptions, Forest, OutlineWarning};
use crate::infrastructure::traits::{Editor, FileSystem};

/// A forest read from user input together with parse annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestInput {
    pub forest: Forest,
    pub warnings: Vec<OutlineWarning>,
    /// Display mode stored in block input; `None` for forests and outlines.
    pub expanded: Option<bool>,
}

/// Service for block files and outline input.
pub struct BlockService {
    fs: Arc<dyn FileSystem>,
    editor: Arc<dyn Editor>,
    defaults: BlockDefaults,
}

impl BlockService {
    pub fn new(fs: Arc<dyn FileSystem>, editor: Arc<dyn Editor>, defaults: BlockDefaults) -> Self {
        Self { fs, editor, defaults }
    }

    /// Same service with branch mode forced on or off.
    pub fn with_branch(mut self, branch: bool) -> Self {
        self.defaults.branch = branch;
        self
    }

    pub fn defaults(&self) -> &BlockDefaults {
        &self.defaults
    }

    /// Load block data from a JSON file.
    pub fn load(&self, path: &Path) -> ApplicationResult<BlockData> {
        let content = self.fs.read_to_string(path).with_path_context("read block", path)?;
        BlockData::from_json(&content)
    }

    /// Write block data as pretty JSON.
    pub fn save(&self, path: &Path, data: &BlockData) -> ApplicationResult<()> {
        let json = data.to_json()?;
        self.fs
            .write(path, &format!("{json}\n"))
            .with_path_context("write block", path)
    }

    /// Hydrate a block file in place.
    #[instrument(level = "debug", skip(self))]
    pub fn hydrate_file(&self, path: &Path) -> ApplicationResult<Hydrated> {
        let data = self.load(path)?;
        if data.is_hydrated() {
            debug!("nothing to hydrate: {}", path.display());
            return Ok(Hydrated {
                data,
                warnings: Vec::new(),
            });
        }
        let hydrated = hydrate(data, &self.defaults)?;
        self.save(path, &hydrated.data)?;
        Ok(hydrated)
    }

    /// Read a forest from text that is either a forest JSON array, a block
    /// JSON object or plain outline text.
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn forest_from_text(&self, text: &str) -> ApplicationResult<ForestInput> {
        let trimmed = text.trim_start();
        if trimmed.starts_with('[') {
            match json::from_str::<Forest>(trimmed, "forest") {
                Ok(forest) => {
                    debug!("input is a forest");
                    return Ok(ForestInput {
                        forest,
                        warnings: Vec::new(),
                        expanded: None,
                    });
                }
                Err(e) => debug!(error = ?e, "not a forest, reading as outline"),
            }
        } else if trimmed.starts_with('{') {
            match BlockData::from_json(trimmed) {
                Ok(data) => {
                    debug!("input is a block");
                    let hydrated = hydrate(data, &self.defaults)?;
                    return Ok(ForestInput {
                        forest: hydrated.data.forest().cloned().unwrap_or_default(),
                        warnings: hydrated.warnings,
                        expanded: hydrated.data.expanded,
                    });
                }
                Err(e) => debug!(error = ?e, "not a block, reading as outline"),
            }
        }

        // Labels may start with brackets; anything that is not valid JSON is an outline
        let (forest, warnings) = self.build_outline(text)?;
        Ok(ForestInput {
            forest,
            warnings,
            expanded: None,
        })
    }

    /// Build outline text into a forest with the service defaults.
    pub fn build_outline(&self, text: &str) -> ApplicationResult<(Forest, Vec<OutlineWarning>)> {
        let parsed = parse_checked(text, &self.defaults)?;
        let forest = build(
            &parsed.entries,
            BuildOptions {
                branch_mode: self.defaults.branch,
            },
        );
        Ok((forest, parsed.warnings))
    }

    /// Edit the outline of a block file in the configured editor.
    ///
    /// A missing file starts a new block. The edited text is hydrated with
    /// the block's own options and written back.
    #[instrument(level = "debug", skip(self))]
    pub fn edit(&self, path: &Path) -> ApplicationResult<Hydrated> {
        let mut data = if self.fs.exists(path) {
            self.load(path)?
        } else {
            BlockData::default()
        };

        let scratch = tempfile::Builder::new()
            .prefix("reftree-")
            .suffix(".txt")
            .tempfile()
            .with_path_context("create scratch file", path)?;
        let scratch_path = scratch.path().to_path_buf();

        self.fs
            .write(&scratch_path, &form_text(&data))
            .with_path_context("write outline", &scratch_path)?;
        self.editor
            .open(&scratch_path)
            .with_path_context("run editor", &scratch_path)?;
        let edited = self
            .fs
            .read_to_string(&scratch_path)
            .with_path_context("read outline", &scratch_path)?;

        data.tree = Some(TreeData::Outline(edited));
        let hydrated = hydrate(data, &self.defaults)?;
        self.save(path, &hydrated.data)?;
        info!("saved {}", path.display());
        Ok(hydrated)
    }
}
