//! Application services
//!
//! Concrete services that orchestrate domain logic over I/O boundary
//! traits (FileSystem, Editor).

mod block;

pub use block::{BlockService, ForestInput};
