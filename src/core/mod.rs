mod error;
mod types;

pub use error::{EditorError, Result};
pub use types::{DEFAULT_QUANTITY, LineItem, LineItemId, ProductId, ProductOption};
