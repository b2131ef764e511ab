use thiserror::Error;

use crate::utils::sql::SqlIdentError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlattenQueryGeneratorError {
    #[error("hierarchy depth {0} is too shallow to flatten (need at least 2 levels)")]
    DepthTooShallow(u32),
    #[error("invalid identifier in hierarchy definition: {0}")]
    Ident(#[from] SqlIdentError),
}
