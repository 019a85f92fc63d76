//! Application layer: block hydration, rendering and services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod block;
pub mod error;
pub mod error_ext;
pub mod json;
pub mod render;
pub mod services;

pub use block::{form_text, hydrate, parse_checked, BlockData, BlockDefaults, Hydrated, TreeData};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{IoResultExt, JsonResultExt};
pub use render::{render, NoCounts, ReferenceCounter, RenderOptions, RenderedRow, RenderedTree, StaticCounts, TotalPolicy};
