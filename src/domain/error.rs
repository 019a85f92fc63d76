//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the outline data model.
///
/// Parsing and building never fail; these only surface when callers
/// construct model values by hand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("label must not be empty (level {level})")]
    EmptyLabel { level: usize },
}
