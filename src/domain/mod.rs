//! Domain layer: the outline/tree conversion engine
//!
//! This layer is pure: no I/O, no config loading, no shared state.

pub mod arena;
pub mod builder;
pub mod display;
pub mod error;
pub mod node;
pub mod outline;
pub mod serializer;

pub use arena::{ForestArena, NodeData};
pub use builder::{build, BuildOptions, TreeBuilder};
pub use display::TreeNodeConvert;
pub use error::DomainError;
pub use node::{FlatNode, Forest, TreeNode, BRANCH_SEPARATOR};
pub use outline::{
    normalize_levels, outline_depth, parse, LeveledEntry, OutlineParser, OutlineWarning, ParsedOutline,
    WarningKind, MARKER,
};
pub use serializer::{serialize, OutlineSerializer};
