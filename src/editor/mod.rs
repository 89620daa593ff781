mod pending;
mod rows;
mod worker;

pub use pending::{PendingRows, RowKey};
pub use rows::{EditorRow, resolve_rows};
pub use worker::OnChange;

use crate::core::{EditorError, LineItem, LineItemId, ProductId, Result};
use crate::gateway::RemoteMutationGateway;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use worker::{Command, Worker};

/// Default settle window after a row's operation completes.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Tunables for a collection editor instance.
#[derive(Clone)]
pub struct EditorConfig {
    /// How long a row stays marked pending after its operation settles.
    pub settle_delay: Duration,

    /// Capacity of the command queue feeding the worker.
    pub queue_capacity: usize,

    on_change: Option<OnChange>,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            queue_capacity: 32,
            on_change: None,
        }
    }

    /// Set the settle window
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the command queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Register the change callback, fired with the updated value after
    /// each successful create/delete
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[LineItemId]) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EditorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorConfig")
            .field("settle_delay", &self.settle_delay)
            .field("queue_capacity", &self.queue_capacity)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// Handle to a running line-item collection editor.
///
/// The editor owns the authoritative ordered value (the persisted line-item
/// ids) and synchronizes every row operation against the remote gateway the
/// moment it is requested, independent of any enclosing form lifecycle.
/// Operations are queued to a dedicated worker and processed one at a time
/// in submission order; each returns the explicit result of its remote call.
///
/// The handle is cheap to clone; all clones drive the same worker.
#[derive(Clone)]
pub struct LineItemCollectionEditor {
    commands: mpsc::Sender<Command>,
    value_rx: watch::Receiver<Vec<LineItemId>>,
    pending: PendingRows,
}

impl LineItemCollectionEditor {
    /// Start an editor over the given gateway with the default config.
    pub fn new(gateway: Arc<dyn RemoteMutationGateway>, value: Vec<LineItemId>) -> Self {
        Self::with_config(gateway, value, EditorConfig::new())
    }

    pub fn with_config(
        gateway: Arc<dyn RemoteMutationGateway>,
        value: Vec<LineItemId>,
        config: EditorConfig,
    ) -> Self {
        let pending = PendingRows::new();
        let (value_tx, value_rx) = watch::channel(value.clone());
        let commands = Worker::spawn(
            gateway,
            value,
            value_tx,
            pending.clone(),
            config.on_change,
            config.settle_delay,
            config.queue_capacity,
        );
        Self {
            commands,
            value_rx,
            pending,
        }
    }

    /// Current ordered value.
    pub fn value(&self) -> Vec<LineItemId> {
        self.value_rx.borrow().clone()
    }

    /// Watch-side subscription to value updates.
    pub fn subscribe(&self) -> watch::Receiver<Vec<LineItemId>> {
        self.value_rx.clone()
    }

    /// Rows to render: the value resolved against the fetched records, plus
    /// the trailing sentinel. Ids missing from `options` are dropped.
    pub fn rows(&self, options: &[LineItem]) -> Vec<EditorRow> {
        resolve_rows(&self.value_rx.borrow(), options)
    }

    /// Per-row pending markers, for busy indicators scoped to the row an
    /// operation actually touches.
    pub fn pending(&self) -> &PendingRows {
        &self.pending
    }

    /// Persist the sentinel row.
    ///
    /// Guarded locally: an unset product or a zero quantity is rejected
    /// without issuing a remote call. On success the server-assigned id is
    /// appended to the value and the change callback fires exactly once.
    pub async fn create_row(
        &self,
        product_id: Option<ProductId>,
        quantity: u32,
    ) -> Result<LineItemId> {
        let product_id = product_id.ok_or(EditorError::MissingProduct)?;
        check_quantity(quantity)?;
        let (reply, response) = oneshot::channel();
        self.submit(Command::Create {
            product_id,
            quantity,
            reply,
        })
        .await?;
        response.await.map_err(|_| EditorError::Closed)?
    }

    /// Update an existing row's product and quantity.
    ///
    /// Never alters the value and never fires the change callback; the row's
    /// id is already part of the sequence.
    pub async fn update_row(
        &self,
        id: LineItemId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<()> {
        check_quantity(quantity)?;
        let (reply, response) = oneshot::channel();
        self.submit(Command::Update {
            id,
            product_id,
            quantity,
            reply,
        })
        .await?;
        response.await.map_err(|_| EditorError::Closed)?
    }

    /// Delete an existing row.
    ///
    /// On success its id is spliced out of the value (order of the remainder
    /// unchanged) and the change callback fires exactly once.
    pub async fn delete_row(&self, id: LineItemId) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.submit(Command::Delete { id, reply }).await?;
        response.await.map_err(|_| EditorError::Closed)?
    }

    async fn submit(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| EditorError::Closed)
    }
}

fn check_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(EditorError::InvalidQuantity(quantity));
    }
    Ok(())
}
