use super::{OrderItemCreate, OrderItemUpdate, RemoteMutationGateway};
use crate::catalog::OptionCatalog;
use crate::core::{EditorError, LineItem, LineItemId, ProductOption, Result};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Which remote mutation a scripted failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct MemoryState {
    products: Vec<ProductOption>,
    items: Vec<LineItem>,
    failures: HashMap<MutationKind, String>,
    calls: HashMap<MutationKind, u64>,
    latency: Duration,
}

impl MemoryState {
    fn record_call(&mut self, kind: MutationKind) -> Result<()> {
        *self.calls.entry(kind).or_insert(0) += 1;
        if let Some(message) = self.failures.remove(&kind) {
            return Err(EditorError::Rejected(message));
        }
        Ok(())
    }
}

/// In-memory stand-in for the remote store.
///
/// Implements both the mutation gateway and the option catalog over the same
/// rows, so a caller refreshing the catalog after a change sees the effect of
/// its own mutations. Failures and latency are injectable per operation,
/// which is what the integration tests drive.
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the catalog.
    pub async fn seed_product(&self, product: ProductOption) {
        self.state.lock().await.products.push(product);
    }

    /// Add an existing line-item row.
    pub async fn seed_line_item(&self, item: LineItem) {
        self.state.lock().await.items.push(item);
    }

    /// Make the next call of the given kind fail with an application-level
    /// error. The failure is consumed by that one call.
    pub async fn fail_next(&self, kind: MutationKind, message: impl Into<String>) {
        self.state.lock().await.failures.insert(kind, message.into());
    }

    /// Delay applied before each mutation settles.
    pub async fn set_latency(&self, latency: Duration) {
        self.state.lock().await.latency = latency;
    }

    /// How many calls of the given kind reached this gateway.
    pub async fn calls(&self, kind: MutationKind) -> u64 {
        self.state
            .lock()
            .await
            .calls
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    /// Look up a stored row by id.
    pub async fn line_item(&self, id: &LineItemId) -> Option<LineItem> {
        self.state
            .lock()
            .await
            .items
            .iter()
            .find(|item| item.id == *id)
            .cloned()
    }

    async fn pause(&self) {
        let latency = self.state.lock().await.latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl RemoteMutationGateway for MemoryGateway {
    async fn create_line_item(&self, input: OrderItemCreate) -> Result<LineItemId> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.record_call(MutationKind::Create)?;

        let product_id = input.product.connect.id;
        let label = state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.label.clone())
            .unwrap_or_default();

        let id = LineItemId::new(Uuid::new_v4().to_string());
        debug!("memory gateway: created line item {}", id);
        state.items.push(LineItem {
            id: id.clone(),
            product_id: Some(product_id),
            quantity: input.quantity,
            label,
        });
        Ok(id)
    }

    async fn update_line_item(&self, input: OrderItemUpdate) -> Result<()> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.record_call(MutationKind::Update)?;

        let product_id = input.product.reconnect.id;
        let label = state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.label.clone())
            .unwrap_or_default();

        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == input.id)
            .ok_or_else(|| {
                EditorError::Rejected(format!("line item '{}' not found", input.id))
            })?;
        item.quantity = input.quantity;
        item.product_id = Some(product_id);
        item.label = label;
        Ok(())
    }

    async fn delete_line_item(&self, id: &LineItemId) -> Result<()> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.record_call(MutationKind::Delete)?;

        let index = state
            .items
            .iter()
            .position(|item| item.id == *id)
            .ok_or_else(|| EditorError::Rejected(format!("line item '{}' not found", id)))?;
        state.items.remove(index);
        debug!("memory gateway: deleted line item {}", id);
        Ok(())
    }
}

#[async_trait]
impl OptionCatalog for MemoryGateway {
    async fn product_options(&self) -> Result<Vec<ProductOption>> {
        Ok(self.state.lock().await.products.clone())
    }

    async fn line_items(&self) -> Result<Vec<LineItem>> {
        Ok(self.state.lock().await.items.clone())
    }
}
