//! Error types for the descriptor contract.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A `type` tag that is not one of the known field kinds.
    #[error("Unknown field kind: {0}")]
    UnknownFieldKind(String),

    /// A `dtype` that is not one of `text`, `number`, `email`.
    #[error("Unknown input type: {0}")]
    UnknownInputType(String),
}
