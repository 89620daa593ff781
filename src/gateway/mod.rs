pub mod graphql;
pub mod memory;

use crate::core::{LineItemId, ProductId, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payload of a line-item create: `{ quantity, product: { connect: { id } } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemCreate {
    pub quantity: u32,
    pub product: ProductConnect,
}

impl OrderItemCreate {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            quantity,
            product: ProductConnect {
                connect: IdRef { id: product_id },
            },
        }
    }
}

/// Payload of a line-item update: `{ id, quantity, product: { reconnect: { id } } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemUpdate {
    pub id: LineItemId,
    pub quantity: u32,
    pub product: ProductReconnect,
}

impl OrderItemUpdate {
    pub fn new(id: LineItemId, product_id: ProductId, quantity: u32) -> Self {
        Self {
            id,
            quantity,
            product: ProductReconnect {
                reconnect: IdRef { id: product_id },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductConnect {
    pub connect: IdRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductReconnect {
    pub reconnect: IdRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdRef {
    pub id: ProductId,
}

/// Response of a successful create: the server-assigned id.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedId {
    pub id: LineItemId,
}

/// Ack returned by update/delete mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationAck {
    pub success: bool,
}

/// The remote service boundary performing create/update/delete of a single
/// line-item association row.
///
/// Implementations must not retry; the editor reports each failure to its
/// caller and leaves retry policy to the application.
#[async_trait]
pub trait RemoteMutationGateway: Send + Sync {
    /// Create one association row; returns the server-assigned id.
    async fn create_line_item(&self, input: OrderItemCreate) -> Result<LineItemId>;

    /// Update quantity and/or connected product of an existing row.
    async fn update_line_item(&self, input: OrderItemUpdate) -> Result<()>;

    /// Delete the row with the given id.
    async fn delete_line_item(&self, id: &LineItemId) -> Result<()>;
}
