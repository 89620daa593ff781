/// Concurrency tests
///
/// The editor worker processes commands one at a time in submission order.
/// Two creates dispatched before either resolves must therefore both land,
/// instead of the second overwriting the first's append. Pending marks are
/// scoped to the row an operation touches.
/// Run with: cargo test --test concurrency_tests
use orderline::{
    EditorConfig, LineItem, LineItemCollectionEditor, LineItemId, MemoryGateway, ProductId,
    ProductOption, RowKey,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Changes = Arc<Mutex<Vec<Vec<LineItemId>>>>;

fn config_with_capture(changes: &Changes) -> EditorConfig {
    let sink = Arc::clone(changes);
    EditorConfig::new()
        .settle_delay(Duration::ZERO)
        .on_change(move |value| sink.lock().unwrap().push(value.to_vec()))
}

fn item(id: &str, product: &str, quantity: u32) -> LineItem {
    LineItem::new(id, Some(ProductId::from(product)), quantity, product)
}

fn ids(raw: &[&str]) -> Vec<LineItemId> {
    raw.iter().map(|s| (*s).into()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_creates_both_append() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway
        .seed_product(ProductOption::new("P1", "Mug", 9.5))
        .await;
    gateway
        .seed_product(ProductOption::new("P2", "Shirt", 19.0))
        .await;
    gateway.set_latency(Duration::from_millis(20)).await;

    let changes: Changes = Default::default();
    let editor = LineItemCollectionEditor::with_config(
        gateway.clone(),
        ids(&["A"]),
        config_with_capture(&changes),
    );

    let (first, second) = tokio::join!(
        editor.create_row(Some("P1".into()), 1),
        editor.create_row(Some("P2".into()), 2),
    );
    let first = first.unwrap();
    let second = second.unwrap();

    let expected = vec![LineItemId::from("A"), first.clone(), second.clone()];
    assert_eq!(editor.value(), expected);

    let captured = changes.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0], vec![LineItemId::from("A"), first]);
    assert_eq!(captured[1], expected);
}

#[tokio::test(start_paused = true)]
async fn test_queue_drains_in_submission_order() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway
        .seed_product(ProductOption::new("P1", "Mug", 9.5))
        .await;
    gateway.seed_line_item(item("A", "P1", 1)).await;
    gateway.set_latency(Duration::from_millis(20)).await;

    let changes: Changes = Default::default();
    let editor = LineItemCollectionEditor::with_config(
        gateway.clone(),
        ids(&["A"]),
        config_with_capture(&changes),
    );

    let (created, deleted) = tokio::join!(
        editor.create_row(Some("P1".into()), 1),
        editor.delete_row("A".into()),
    );
    let created = created.unwrap();
    deleted.unwrap();

    assert_eq!(editor.value(), vec![created.clone()]);

    let captured = changes.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0], vec![LineItemId::from("A"), created.clone()]);
    assert_eq!(captured[1], vec![created]);
}

#[tokio::test(start_paused = true)]
async fn test_pending_is_scoped_to_the_touched_row() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.seed_line_item(item("X", "P1", 1)).await;
    gateway.seed_line_item(item("Y", "P1", 2)).await;
    gateway.set_latency(Duration::from_millis(100)).await;

    let editor = LineItemCollectionEditor::with_config(
        gateway.clone(),
        ids(&["X", "Y"]),
        EditorConfig::new().settle_delay(Duration::ZERO),
    );

    let handle = editor.clone();
    let task = tokio::spawn(async move { handle.delete_row("X".into()).await });

    // Give the worker a chance to pick the command up, well inside the
    // gateway latency.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(editor.pending().is_pending(&RowKey::Persisted("X".into())));
    assert!(!editor.pending().is_pending(&RowKey::Persisted("Y".into())));
    assert!(!editor.pending().is_pending(&RowKey::Sentinel));

    task.await.unwrap().unwrap();
    assert!(editor.pending().is_idle());
    assert_eq!(editor.value(), ids(&["Y"]));
}

#[tokio::test(start_paused = true)]
async fn test_interleaved_update_never_fires_callback() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway
        .seed_product(ProductOption::new("P1", "Mug", 9.5))
        .await;
    gateway.seed_line_item(item("A", "P1", 1)).await;
    gateway.set_latency(Duration::from_millis(20)).await;

    let changes: Changes = Default::default();
    let editor = LineItemCollectionEditor::with_config(
        gateway.clone(),
        ids(&["A"]),
        config_with_capture(&changes),
    );

    let (updated, created) = tokio::join!(
        editor.update_row("A".into(), "P1".into(), 4),
        editor.create_row(Some("P1".into()), 1),
    );
    updated.unwrap();
    let created = created.unwrap();

    // Only the create reported a change.
    let captured = changes.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0], vec![LineItemId::from("A"), created]);
}
