use crate::core::LineItemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote rejected operation: {0}")]
    Rejected(String),

    #[error("Row has no product selected")]
    MissingProduct,

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(u32),

    #[error("Line item '{0}' is not part of this collection")]
    UnknownRow(LineItemId),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Editor is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, EditorError>;

impl From<reqwest::Error> for EditorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
