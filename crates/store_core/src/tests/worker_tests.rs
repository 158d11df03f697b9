use super::*;
use crate::store::StoreConfig;
use catalog::StaticCatalog;
use shared::domain::{CatalogRecord, Money};

const PHONE: ProductId = ProductId(1);
const CASE: ProductId = ProductId(2);

fn spawn_fixture() -> (StorefrontClient, JoinHandle<()>) {
    let catalog = StaticCatalog::new(vec![
        CatalogRecord {
            id: PHONE,
            title: "phone".into(),
            img: String::new(),
            price: Money::from_cents(1000),
            company: "ACME".into(),
            info: String::new(),
        },
        CatalogRecord {
            id: CASE,
            title: "case".into(),
            img: String::new(),
            price: Money::from_cents(500),
            company: "ACME".into(),
            info: String::new(),
        },
    ])
    .expect("catalog");
    spawn_store(StateStore::new(Arc::new(catalog), StoreConfig::default()))
}

#[tokio::test]
async fn handle_calls_return_post_action_snapshot() {
    let (client, worker) = spawn_fixture();

    let snapshot = client.add_to_cart(PHONE).await.expect("add phone");
    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.totals.total.cents(), 1150);

    let snapshot = client.increment(PHONE).await.expect("increment phone");
    assert_eq!(snapshot.cart_line(PHONE).map(|line| line.count), Some(2));
    assert_eq!(snapshot.totals.total.cents(), 2300);
    assert_eq!(client.snapshot().version, 2);

    drop(client);
    worker.await.expect("worker exits cleanly");
}

#[tokio::test]
async fn clones_share_one_store() {
    let (client, worker) = spawn_fixture();
    let other = client.clone();

    client.add_to_cart(PHONE).await.expect("add phone");
    other.add_to_cart(CASE).await.expect("add case");
    let snapshot = other.clear_cart().await.expect("clear");

    assert!(snapshot.cart.is_empty());
    assert_eq!(snapshot.totals.total, Money::ZERO);
    assert_eq!(snapshot.version, 3);

    drop(client);
    drop(other);
    worker.await.expect("worker exits cleanly");
}

#[tokio::test]
async fn rejected_actions_surface_as_errors_and_events() {
    let (client, worker) = spawn_fixture();
    let mut events = client.subscribe_events();

    let err = client.decrement(CASE).await.expect_err("not in cart");
    assert_eq!(err, StoreError::NotInCart(CASE));

    match events.recv().await.expect("event") {
        StoreEvent::ActionRejected { action, error } => {
            assert_eq!(action, StoreAction::Decrement { id: CASE });
            assert_eq!(error.product_id, Some(CASE));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(client.snapshot().version, 0);

    drop(client);
    worker.await.expect("worker exits cleanly");
}

#[tokio::test]
async fn subscribers_observe_every_commit_in_order() {
    let (client, worker) = spawn_fixture();
    let mut events = client.subscribe_events();
    let mut watcher = client.watch_snapshots();

    client.select_detail(CASE).await.expect("detail");
    client.open_modal(CASE).await.expect("modal");
    client.close_modal().await.expect("close");

    let mut versions = Vec::new();
    for _ in 0..3 {
        match events.recv().await.expect("event") {
            StoreEvent::SnapshotPublished(snapshot) => versions.push(snapshot.version),
            other => panic!("unexpected event: {other:?}"),
        }
    }
    assert_eq!(versions, vec![1, 2, 3]);

    assert!(watcher.has_changed().expect("sender alive"));
    let latest = watcher.borrow_and_update().clone();
    assert!(!latest.modal_open);
    assert_eq!(latest.modal_product.as_ref().map(|p| p.id()), Some(CASE));
    assert_eq!(latest.detail_product.as_ref().map(|p| p.id()), Some(CASE));

    drop(client);
    worker.await.expect("worker exits cleanly");
}

#[tokio::test]
async fn dispatch_after_worker_exit_reports_stopped() {
    let (client, worker) = spawn_fixture();
    worker.abort();
    let _ = worker.await;

    let err = client.remove_item(PHONE).await.expect_err("worker gone");
    assert_eq!(err, StoreError::WorkerStopped);
}
