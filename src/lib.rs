// ============================================================================
// Orderline Library
// ============================================================================

pub mod catalog;
pub mod core;
pub mod editor;
pub mod gateway;

// Re-export main types for convenience
pub use crate::core::{
    DEFAULT_QUANTITY, EditorError, LineItem, LineItemId, ProductId, ProductOption, Result,
};

pub use crate::catalog::OptionCatalog;
pub use crate::editor::{
    DEFAULT_SETTLE_DELAY, EditorConfig, EditorRow, LineItemCollectionEditor, PendingRows, RowKey,
    resolve_rows,
};
pub use crate::gateway::{
    OrderItemCreate, OrderItemUpdate, RemoteMutationGateway,
    graphql::{GraphQlConfig, GraphQlGateway},
    memory::{MemoryGateway, MutationKind},
};
