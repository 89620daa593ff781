use super::pending::{PendingRows, RowKey};
use crate::core::{EditorError, LineItemId, ProductId, Result};
use crate::gateway::{OrderItemCreate, OrderItemUpdate, RemoteMutationGateway};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};

/// Callback fired with the updated value after each successful
/// create/delete.
pub type OnChange = Arc<dyn Fn(&[LineItemId]) + Send + Sync>;

/// One queued editor command; the reply travels back over a oneshot.
pub(super) enum Command {
    Create {
        product_id: ProductId,
        quantity: u32,
        reply: oneshot::Sender<Result<LineItemId>>,
    },
    Update {
        id: LineItemId,
        product_id: ProductId,
        quantity: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    Delete {
        id: LineItemId,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Owns the authoritative value and processes commands one at a time, in
/// submission order. Serializing here is what eliminates the lost-update
/// race between two concurrent appends reading the same stale value.
pub(super) struct Worker {
    gateway: Arc<dyn RemoteMutationGateway>,
    value: Vec<LineItemId>,
    value_tx: watch::Sender<Vec<LineItemId>>,
    pending: PendingRows,
    on_change: Option<OnChange>,
    settle_delay: Duration,
}

impl Worker {
    pub(super) fn spawn(
        gateway: Arc<dyn RemoteMutationGateway>,
        value: Vec<LineItemId>,
        value_tx: watch::Sender<Vec<LineItemId>>,
        pending: PendingRows,
        on_change: Option<OnChange>,
        settle_delay: Duration,
        queue_capacity: usize,
    ) -> mpsc::Sender<Command> {
        let (tx, rx) = mpsc::channel(queue_capacity);
        let worker = Self {
            gateway,
            value,
            value_tx,
            pending,
            on_change,
            settle_delay,
        };
        tokio::spawn(worker.run(rx));
        tx
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Create {
                    product_id,
                    quantity,
                    reply,
                } => {
                    let _ = reply.send(self.create(product_id, quantity).await);
                }
                Command::Update {
                    id,
                    product_id,
                    quantity,
                    reply,
                } => {
                    let _ = reply.send(self.update(id, product_id, quantity).await);
                }
                Command::Delete { id, reply } => {
                    let _ = reply.send(self.delete(id).await);
                }
            }
        }
        debug!("editor worker stopped");
    }

    async fn create(&mut self, product_id: ProductId, quantity: u32) -> Result<LineItemId> {
        let key = RowKey::Sentinel;
        self.pending.mark(key.clone());
        let result = self
            .gateway
            .create_line_item(OrderItemCreate::new(product_id, quantity))
            .await;
        self.settle(key);

        let id = result.map_err(|err| {
            warn!("line item create failed: {}", err);
            err
        })?;
        debug!("line item {} created, value length {}", id, self.value.len() + 1);
        self.value.push(id.clone());
        self.publish();
        Ok(id)
    }

    async fn update(&mut self, id: LineItemId, product_id: ProductId, quantity: u32) -> Result<()> {
        if !self.value.contains(&id) {
            return Err(EditorError::UnknownRow(id));
        }

        let key = RowKey::Persisted(id.clone());
        self.pending.mark(key.clone());
        let result = self
            .gateway
            .update_line_item(OrderItemUpdate::new(id, product_id, quantity))
            .await;
        self.settle(key);

        // The id is already part of the value: no mutation, no callback.
        result.map_err(|err| {
            warn!("line item update failed: {}", err);
            err
        })
    }

    async fn delete(&mut self, id: LineItemId) -> Result<()> {
        let index = self
            .value
            .iter()
            .position(|existing| *existing == id)
            .ok_or_else(|| EditorError::UnknownRow(id.clone()))?;

        let key = RowKey::Persisted(id.clone());
        self.pending.mark(key.clone());
        let result = self.gateway.delete_line_item(&id).await;
        self.settle(key);

        result.map_err(|err| {
            warn!("line item delete failed: {}", err);
            err
        })?;
        self.value.remove(index);
        debug!("line item {} deleted, value length {}", id, self.value.len());
        self.publish();
        Ok(())
    }

    /// Push the updated value to watchers and fire the change callback.
    fn publish(&self) {
        let _ = self.value_tx.send(self.value.clone());
        if let Some(on_change) = &self.on_change {
            on_change(&self.value);
        }
    }

    /// Clear the row's pending mark once the settle window elapses. The
    /// window is cosmetic (it keeps the row's busy indicator from
    /// flickering on fast responses) and applies on success and failure
    /// alike.
    fn settle(&self, key: RowKey) {
        if self.settle_delay.is_zero() {
            self.pending.clear(&key);
            return;
        }
        let pending = self.pending.clone();
        let delay = self.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pending.clear(&key);
        });
    }
}
