use std::sync::Arc;

use catalog::{CatalogSource, StaticCatalog};
use shared::{
    domain::{Money, ProductId},
    protocol::{StoreAction, Totals},
};
use store_core::{spawn_store, StateStore, StoreConfig, StoreEvent, StorefrontHandle};

#[test]
fn builtin_catalog_round_trips_before_any_mutation() {
    let catalog = Arc::new(StaticCatalog::builtin().expect("builtin catalog"));
    let store = StateStore::new(catalog.clone(), StoreConfig::default());

    let snapshot = store.snapshot();
    assert_eq!(snapshot.products.len(), catalog.len());
    for (product, record) in snapshot.products.iter().zip(catalog.records()) {
        assert_eq!(&product.record, record);
    }
}

#[test]
fn two_products_then_clear() {
    let raw = r#"[
        {"id": 10, "title": "A", "price": 10.00},
        {"id": 20, "title": "B", "price": 5.00}
    ]"#;
    let catalog = Arc::new(StaticCatalog::from_json_str(raw).expect("catalog"));
    let mut store = StateStore::new(catalog.clone(), StoreConfig::default());

    store.apply(StoreAction::AddToCart { id: ProductId(10) }).expect("add a");
    store.apply(StoreAction::AddToCart { id: ProductId(20) }).expect("add b");
    assert_eq!(store.totals().sub_total, Money::from_cents(1500));
    assert_eq!(store.totals().tax, Money::from_cents(225));

    store.apply(StoreAction::ClearCart).expect("clear");

    let snapshot = store.snapshot();
    assert!(snapshot.cart.is_empty());
    assert_eq!(snapshot.totals, Totals::default());
    assert!(snapshot
        .products
        .iter()
        .all(|product| !product.in_cart && product.count == 0 && product.total == Money::ZERO));
    // the external source never sees session mutations
    let pristine = StaticCatalog::from_json_str(raw).expect("reparse");
    assert_eq!(catalog.records(), pristine.records());
    for (product, record) in snapshot.products.iter().zip(pristine.records()) {
        assert_eq!(&product.record, record);
    }
}

#[tokio::test]
async fn late_subscriber_renders_from_current_snapshot() {
    let catalog = Arc::new(StaticCatalog::builtin().expect("builtin catalog"));
    let first_id = catalog.records()[0].id;
    let (client, worker) = spawn_store(StateStore::new(catalog, StoreConfig::default()));

    client.add_to_cart(first_id).await.expect("add");
    client.increment(first_id).await.expect("increment");

    let late = client.watch_snapshots();
    let current = late.borrow().clone();
    assert_eq!(current.version, 2);
    assert_eq!(current.item_count(), 2);

    let mut events = client.subscribe_events();
    client.remove_item(first_id).await.expect("remove");
    match events.recv().await.expect("event") {
        StoreEvent::SnapshotPublished(snapshot) => {
            assert!(snapshot.cart.is_empty());
            assert_eq!(snapshot.totals, Totals::default());
        }
        other => panic!("unexpected event: {other:?}"),
    }

    drop(client);
    worker.await.expect("worker exits cleanly");
}
