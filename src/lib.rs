//! Reference trees: dash-indented label outlines to ordered forests and back.
//!
//! Layers:
//! - `domain`: outline parsing, tree building, serialization (pure)
//! - `application`: block hydration, rendering, services
//! - `infrastructure`: I/O boundary traits and service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
