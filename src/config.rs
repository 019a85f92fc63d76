//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/reftree/reftree.toml`
//! 3. Local config: `./.reftree.toml` or the file given with `--config`
//! 4. Environment variables: `REFTREE_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, BlockDefaults, RenderOptions, TotalPolicy};

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".reftree.toml";

/// Defaults for reference-tree blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BlockSettings {
    /// Compute ` :: ` branch paths when building
    pub branch: bool,
    /// Show nested labels expanded
    pub expanded: bool,
    /// Block total policy; unset means `nodes` for expanded trees, else `roots`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalPolicy>,
    /// Largest outline accepted, in non-blank lines
    pub max_lines: usize,
    /// Deepest outline accepted, in levels
    pub max_depth: usize,
}

impl Default for BlockSettings {
    fn default() -> Self {
        let defaults = BlockDefaults::default();
        Self {
            branch: defaults.branch,
            expanded: defaults.expanded,
            total: None,
            max_lines: defaults.max_lines,
            max_depth: defaults.max_depth,
        }
    }
}

/// Raw block settings for intermediate parsing (`None` means not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawBlockSettings {
    pub branch: Option<bool>,
    pub expanded: Option<bool>,
    pub total: Option<TotalPolicy>,
    pub max_lines: Option<usize>,
    pub max_depth: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub editor: Option<String>,
    pub block: RawBlockSettings,
}

impl BlockSettings {
    /// Overlay values win where specified.
    pub fn merge(&self, overlay: &RawBlockSettings) -> Self {
        Self {
            branch: overlay.branch.unwrap_or(self.branch),
            expanded: overlay.expanded.unwrap_or(self.expanded),
            total: overlay.total.or(self.total),
            max_lines: overlay.max_lines.unwrap_or(self.max_lines),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
        }
    }
}

/// Unified configuration for reftree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Editor command (default: $EDITOR or "vi")
    pub editor: String,
    /// Block defaults
    pub block: BlockSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".into());

        Self {
            editor,
            block: BlockSettings::default(),
        }
    }
}

/// Get the XDG config directory for reftree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "reftree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("reftree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables are left as written.
fn expand_env_vars(value: &str) -> String {
    shellexpand::full(value)
        .map(|expanded| expanded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in the editor command.
    fn expand_paths(&mut self) {
        self.editor = expand_env_vars(&self.editor);
    }

    /// Overlay a config file onto self; scalars win where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            editor: overlay
                .editor
                .clone()
                .unwrap_or_else(|| self.editor.clone()),
            block: self.block.merge(&overlay.block),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Local config file; skipped when it does not exist
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(local_path) = local {
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply REFTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("REFTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("editor") {
            settings.editor = val;
        }
        if let Ok(val) = config.get_bool("block.branch") {
            settings.block.branch = val;
        }
        if let Ok(val) = config.get_bool("block.expanded") {
            settings.block.expanded = val;
        }
        if let Ok(val) = config.get_string("block.total") {
            settings.block.total = Some(parse_total(&val)?);
        }
        if let Ok(val) = config.get_int("block.max_lines") {
            settings.block.max_lines = non_negative("block.max_lines", val)?;
        }
        if let Ok(val) = config.get_int("block.max_depth") {
            settings.block.max_depth = non_negative("block.max_depth", val)?;
        }

        Ok(settings)
    }

    /// Block defaults handed to hydration.
    pub fn block_defaults(&self) -> BlockDefaults {
        BlockDefaults {
            branch: self.block.branch,
            expanded: self.block.expanded,
            max_lines: self.block.max_lines,
            max_depth: self.block.max_depth,
        }
    }

    /// Resolve render options; explicit arguments win over configuration.
    pub fn render_options(
        &self,
        with_counts: bool,
        expanded: Option<bool>,
        total: Option<TotalPolicy>,
    ) -> RenderOptions {
        let expanded = expanded.unwrap_or(self.block.expanded);
        let total = total.or(self.block.total).unwrap_or(if expanded {
            TotalPolicy::Nodes
        } else {
            TotalPolicy::Roots
        });
        RenderOptions {
            total,
            expanded,
            with_counts,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# reftree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/reftree/reftree.toml
#   Local:  ./.reftree.toml (or --config <file>)
#   Env:    REFTREE_* environment variables, e.g. REFTREE_BLOCK__BRANCH=true

# Editor for `reftree edit`
# editor = "vi"

[block]
# Store " :: " joined branch paths on every node
# branch = false

# Show nested labels expanded
# expanded = false

# What the block total counts: "roots" or "nodes"
# (unset: nodes when expanded, roots otherwise)
# total = "roots"

# Reject outlines with more non-blank lines than this
# max_lines = 10000

# Reject outlines nested deeper than this many levels
# max_depth = 256
"#
        .to_string()
    }
}

fn parse_total(value: &str) -> Result<TotalPolicy, ApplicationError> {
    match value.to_ascii_lowercase().as_str() {
        "roots" => Ok(TotalPolicy::Roots),
        "nodes" => Ok(TotalPolicy::Nodes),
        other => Err(ApplicationError::Config {
            message: format!("block.total must be 'roots' or 'nodes', got '{other}'"),
        }),
    }
}

fn non_negative(key: &str, value: i64) -> Result<usize, ApplicationError> {
    usize::try_from(value).map_err(|_| ApplicationError::Config {
        message: format!("{key} must not be negative: {value}"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert!(!settings.editor.is_empty());
        assert_eq!(settings.block.max_lines, 10_000);
    }

    #[test]
    fn given_tilde_in_editor_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            editor: "~/bin/myeditor".to_string(),
            block: BlockSettings::default(),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.editor.starts_with(&home), "{}", settings.editor);
        assert!(!settings.editor.contains('~'));
    }

    #[test]
    fn given_unknown_variable_when_expanding_then_left_as_written() {
        assert_eq!(
            expand_env_vars("$REFTREE_SURELY_UNSET_VAR/ed"),
            "$REFTREE_SURELY_UNSET_VAR/ed"
        );
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_kept() {
        let base = BlockSettings {
            branch: true,
            expanded: false,
            total: Some(TotalPolicy::Roots),
            max_lines: 50,
            max_depth: 40,
        };
        let overlay = RawBlockSettings {
            expanded: Some(true),
            max_lines: Some(5),
            ..Default::default()
        };

        let merged = base.merge(&overlay);

        assert!(merged.branch);
        assert!(merged.expanded);
        assert_eq!(merged.total, Some(TotalPolicy::Roots));
        assert_eq!(merged.max_lines, 5);
        assert_eq!(merged.max_depth, 40);
    }

    #[test]
    fn given_expanded_without_total_when_resolving_render_options_then_counts_nodes() {
        let settings = Settings::default();

        let options = settings.render_options(false, Some(true), None);

        assert_eq!(options.total, TotalPolicy::Nodes);
        assert!(options.expanded);
        assert_eq!(settings.render_options(false, None, None).total, TotalPolicy::Roots);
    }

    #[test]
    fn given_configured_total_when_resolving_then_argument_still_wins() {
        let mut settings = Settings::default();
        settings.block.total = Some(TotalPolicy::Roots);

        assert_eq!(settings.render_options(true, Some(true), None).total, TotalPolicy::Roots);
        assert_eq!(
            settings.render_options(true, None, Some(TotalPolicy::Nodes)).total,
            TotalPolicy::Nodes
        );
    }

    #[test]
    fn given_total_strings_when_parsing_then_case_insensitive() {
        assert_eq!(parse_total("Nodes").unwrap(), TotalPolicy::Nodes);
        assert!(parse_total("leaves").is_err());
    }

    #[test]
    fn given_template_when_parsed_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.editor.is_none());
        assert!(raw.block.branch.is_none());
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips() {
        let mut settings = Settings::default();
        settings.block.total = Some(TotalPolicy::Nodes);

        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();

        assert_eq!(back, settings);
    }
}
