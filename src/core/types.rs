use serde::{Deserialize, Serialize};
use std::fmt;

/// Default quantity for a row whose quantity was never set.
pub const DEFAULT_QUANTITY: u32 = 1;

/// Server-assigned identifier of a persisted line item.
///
/// A row without one is the pending sentinel row; it only gains an id once
/// the remote create succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(pub String);

impl LineItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a product catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A persisted product/quantity association, as fetched from the remote
/// store.
///
/// `product_id` can be absent when the remote record has no product
/// connected; such rows still render, with an empty label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    pub label: String,
}

impl LineItem {
    pub fn new(
        id: impl Into<LineItemId>,
        product_id: Option<ProductId>,
        quantity: u32,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            product_id,
            quantity,
            label: label.into(),
        }
    }
}

/// Immutable catalog entry used to populate the product picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: ProductId,
    pub label: String,
    pub price: f64,
}

impl ProductOption {
    pub fn new(id: impl Into<ProductId>, label: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            price,
        }
    }
}
