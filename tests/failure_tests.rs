/// Failure-path tests
///
/// A failed remote operation must leave the value untouched, fire no change
/// callback, and still clear the row's pending mark after the settle window.
/// Run with: cargo test --test failure_tests
use orderline::{
    EditorConfig, EditorError, LineItem, LineItemCollectionEditor, LineItemId, MemoryGateway,
    MutationKind, ProductId, ProductOption, RowKey,
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

#[tokio::test]
async fn test_failed_create_leaves_no_new_row() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway
        .seed_product(ProductOption::new("P1", "Mug", 9.5))
        .await;
    gateway
        .fail_next(MutationKind::Create, "The record contains invalid data")
        .await;

    let changes: Changes = Default::default();
    let editor = LineItemCollectionEditor::with_config(
        gateway.clone(),
        ids(&["A"]),
        config_with_capture(&changes),
    );

    let err = editor.create_row(Some("P1".into()), 2).await.unwrap_err();

    assert!(matches!(err, EditorError::Rejected(_)));
    assert_eq!(editor.value(), ids(&["A"]));
    assert!(changes.lock().unwrap().is_empty());
    use orderline::OptionCatalog;
    assert!(gateway.line_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_delete_leaves_the_row_present() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.seed_line_item(item("A", "P1", 1)).await;
    gateway.fail_next(MutationKind::Delete, "denied").await;

    let changes: Changes = Default::default();
    let editor = LineItemCollectionEditor::with_config(
        gateway.clone(),
        ids(&["A"]),
        config_with_capture(&changes),
    );

    let err = editor.delete_row("A".into()).await.unwrap_err();

    assert!(matches!(err, EditorError::Rejected(_)));
    assert_eq!(editor.value(), ids(&["A"]));
    assert!(changes.lock().unwrap().is_empty());
    assert!(gateway.line_item(&"A".into()).await.is_some());
}

#[tokio::test]
async fn test_failed_update_surfaces_the_error() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.seed_line_item(item("A", "P1", 3)).await;
    gateway.fail_next(MutationKind::Update, "denied").await;

    let editor = LineItemCollectionEditor::with_config(
        gateway.clone(),
        ids(&["A"]),
        EditorConfig::new().settle_delay(Duration::ZERO),
    );

    let err = editor.update_row("A".into(), "P1".into(), 9).await.unwrap_err();

    assert!(matches!(err, EditorError::Rejected(_)));
    assert_eq!(editor.value(), ids(&["A"]));
    assert_eq!(gateway.line_item(&"A".into()).await.unwrap().quantity, 3);
}

#[tokio::test(start_paused = true)]
async fn test_pending_clears_after_settle_window_on_failure() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.fail_next(MutationKind::Create, "denied").await;

    let editor = LineItemCollectionEditor::with_config(
        gateway.clone(),
        Vec::new(),
        EditorConfig::new().settle_delay(Duration::from_millis(50)),
    );

    let _ = editor.create_row(Some("P1".into()), 1).await;

    // Inside the settle window the sentinel is still marked.
    assert!(editor.pending().is_pending(&RowKey::Sentinel));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(editor.pending().is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_pending_clears_after_settle_window_on_success() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.seed_line_item(item("A", "P1", 1)).await;

    let editor = LineItemCollectionEditor::with_config(
        gateway.clone(),
        ids(&["A"]),
        EditorConfig::new().settle_delay(Duration::from_millis(50)),
    );

    editor.delete_row("A".into()).await.unwrap();

    let key = RowKey::Persisted("A".into());
    assert!(editor.pending().is_pending(&key));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(editor.pending().is_idle());
}
