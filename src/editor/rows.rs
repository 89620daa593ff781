use crate::core::{DEFAULT_QUANTITY, LineItem, LineItemId, ProductId};

/// One rendered row: a persisted line item, or the trailing sentinel used to
/// append a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorRow {
    /// Absent for the sentinel row only.
    pub id: Option<LineItemId>,
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    pub label: String,
}

impl EditorRow {
    /// The always-present trailing row with no persisted identity.
    pub fn sentinel() -> Self {
        Self {
            id: None,
            product_id: None,
            quantity: DEFAULT_QUANTITY,
            label: String::new(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id.is_none()
    }

    fn persisted(item: &LineItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            label: item.label.clone(),
        }
    }
}

/// Resolve the ordered id sequence against the fetched line-item records.
///
/// Ids with no matching record are silently dropped; the order of the
/// remainder is preserved; the sentinel row is appended last.
pub fn resolve_rows(value: &[LineItemId], options: &[LineItem]) -> Vec<EditorRow> {
    let mut rows: Vec<EditorRow> = value
        .iter()
        .filter_map(|id| options.iter().find(|item| item.id == *id))
        .map(EditorRow::persisted)
        .collect();
    rows.push(EditorRow::sentinel());
    rows
}
