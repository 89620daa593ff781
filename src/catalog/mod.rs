use crate::core::{LineItem, ProductOption, Result};
use async_trait::async_trait;

/// Read-only source of selectable entries for the editor.
///
/// The editor itself never refetches after a mutation; the caller re-reads
/// the catalog once a change callback fires.
#[async_trait]
pub trait OptionCatalog: Send + Sync {
    /// Selectable products, in server order.
    async fn product_options(&self) -> Result<Vec<ProductOption>>;

    /// Existing line-item records, in server order, with each item's
    /// connected product resolved into `product_id`/`label`.
    async fn line_items(&self) -> Result<Vec<LineItem>>;
}
