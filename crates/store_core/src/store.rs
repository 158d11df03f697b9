use std::sync::Arc;

use catalog::{load_catalog, CatalogSource};
use shared::{
    domain::{CartMembership, Product, ProductId},
    error::StoreError,
    protocol::{CartLine, StoreAction, StoreSnapshot, Totals},
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::{
    channel::{SnapshotChannel, StoreEvent, DEFAULT_EVENT_CAPACITY},
    totals::{compute_totals, DEFAULT_TAX_RATE_BASIS_POINTS},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub tax_rate_basis_points: u32,
    pub event_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tax_rate_basis_points: DEFAULT_TAX_RATE_BASIS_POINTS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyInCart,
}

struct SessionState {
    products: Vec<Product>,
    cart: Vec<ProductId>,
    detail_product: Option<ProductId>,
    modal_product: Option<ProductId>,
    modal_open: bool,
    totals: Totals,
}

impl SessionState {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id() == id)
    }

    fn product_mut(&mut self, id: ProductId) -> Result<&mut Product, StoreError> {
        self.products
            .iter_mut()
            .find(|product| product.id() == id)
            .ok_or_else(|| not_found(id))
    }

    fn cart_product_mut(&mut self, id: ProductId) -> Result<&mut Product, StoreError> {
        let product = self.product_mut(id)?;
        match product.membership() {
            CartMembership::InCart => Ok(product),
            CartMembership::NotInCart => Err(StoreError::NotInCart(id)),
        }
    }

    fn cart_products(&self) -> impl Iterator<Item = &Product> + '_ {
        self.cart.iter().filter_map(move |id| self.product(*id))
    }

    fn snapshot(&self, version: u64) -> StoreSnapshot {
        StoreSnapshot {
            version,
            products: self.products.clone(),
            cart: self.cart_products().map(CartLine::from).collect(),
            detail_product: self.detail_product.and_then(|id| self.product(id)).cloned(),
            modal_product: self.modal_product.and_then(|id| self.product(id)).cloned(),
            modal_open: self.modal_open,
            totals: self.totals,
        }
    }
}

fn not_found(id: ProductId) -> StoreError {
    error!(product_id = %id, "product id is not in the catalog");
    StoreError::NotFound(id)
}

/// Authoritative session state for the storefront.
///
/// Every mutation takes `&mut self`, finishes by recomputing totals, and then
/// publishes exactly one snapshot. Failed mutations leave the state and the
/// version untouched.
pub struct StateStore {
    source: Arc<dyn CatalogSource>,
    config: StoreConfig,
    state: SessionState,
    version: u64,
    channel: SnapshotChannel,
}

impl StateStore {
    pub fn new(source: Arc<dyn CatalogSource>, config: StoreConfig) -> Self {
        let products = load_catalog(source.as_ref());
        let default_selection = products.first().map(Product::id);
        let state = SessionState {
            products,
            cart: Vec::new(),
            detail_product: default_selection,
            modal_product: default_selection,
            modal_open: false,
            totals: Totals::default(),
        };
        let channel = SnapshotChannel::new(state.snapshot(0), config.event_capacity);
        info!(
            products = state.products.len(),
            tax_rate_basis_points = config.tax_rate_basis_points,
            "state store ready"
        );

        Self {
            source,
            config,
            state,
            version: 0,
            channel,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn products(&self) -> &[Product] {
        &self.state.products
    }

    pub fn cart(&self) -> &[ProductId] {
        &self.state.cart
    }

    pub fn totals(&self) -> Totals {
        self.state.totals
    }

    pub fn get_by_id(&self, id: ProductId) -> Result<&Product, StoreError> {
        self.state.product(id).ok_or_else(|| not_found(id))
    }

    pub fn select_detail(&mut self, id: ProductId) -> Result<(), StoreError> {
        self.get_by_id(id)?;
        self.state.detail_product = Some(id);
        self.commit("select_detail");
        Ok(())
    }

    pub fn open_modal(&mut self, id: ProductId) -> Result<(), StoreError> {
        self.get_by_id(id)?;
        self.state.modal_product = Some(id);
        self.state.modal_open = true;
        self.commit("open_modal");
        Ok(())
    }

    /// Hides the quick-view overlay. The last modal product stays selected.
    pub fn close_modal(&mut self) {
        self.state.modal_open = false;
        self.commit("close_modal");
    }

    pub fn add_to_cart(&mut self, id: ProductId) -> Result<AddOutcome, StoreError> {
        let product = self.state.product_mut(id)?;
        if product.membership() == CartMembership::InCart {
            debug!(product_id = %id, "product already in cart; add ignored");
            return Ok(AddOutcome::AlreadyInCart);
        }
        product.set_count(1);
        self.state.cart.push(id);
        self.commit("add_to_cart");
        Ok(AddOutcome::Added)
    }

    pub fn increment(&mut self, id: ProductId) -> Result<(), StoreError> {
        let product = self.state.cart_product_mut(id)?;
        product.set_count(product.count.saturating_add(1));
        self.commit("increment");
        Ok(())
    }

    /// Lowers the quantity by one; the last unit removes the line.
    pub fn decrement(&mut self, id: ProductId) -> Result<(), StoreError> {
        let product = self.state.cart_product_mut(id)?;
        if product.count <= 1 {
            return self.remove_item(id);
        }
        product.set_count(product.count - 1);
        self.commit("decrement");
        Ok(())
    }

    pub fn remove_item(&mut self, id: ProductId) -> Result<(), StoreError> {
        self.state.cart_product_mut(id)?.reset();
        self.state.cart.retain(|cart_id| *cart_id != id);
        self.commit("remove_item");
        Ok(())
    }

    pub fn clear_cart(&mut self) {
        self.state.cart.clear();
        self.load_catalog();
        self.commit("clear_cart");
    }

    /// Applies one consumer action. Rejections are reported to event
    /// subscribers as well as returned.
    pub fn apply(&mut self, action: StoreAction) -> Result<(), StoreError> {
        debug!(action = action.name(), product_id = ?action.product_id(), "applying action");
        let result = match action {
            StoreAction::SelectDetail { id } => self.select_detail(id),
            StoreAction::OpenModal { id } => self.open_modal(id),
            StoreAction::CloseModal => {
                self.close_modal();
                Ok(())
            }
            StoreAction::AddToCart { id } => self.add_to_cart(id).map(|_| ()),
            StoreAction::Increment { id } => self.increment(id),
            StoreAction::Decrement { id } => self.decrement(id),
            StoreAction::RemoveItem { id } => self.remove_item(id),
            StoreAction::ClearCart => {
                self.clear_cart();
                Ok(())
            }
        };

        if let Err(err) = &result {
            warn!(action = action.name(), error = %err, "action rejected");
            self.channel.reject(action, err);
        }
        result
    }

    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.channel.current()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.channel.subscribe_events()
    }

    pub fn watch_snapshots(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.channel.watch()
    }

    pub(crate) fn channel(&self) -> &SnapshotChannel {
        &self.channel
    }

    fn load_catalog(&mut self) {
        self.state.products = load_catalog(self.source.as_ref());
    }

    fn recompute_totals(&mut self) {
        let line_totals = self.state.cart_products().map(|product| product.total);
        let totals = compute_totals(line_totals, self.config.tax_rate_basis_points);
        self.state.totals = totals;
    }

    fn commit(&mut self, reason: &'static str) {
        self.recompute_totals();
        self.version += 1;
        let snapshot = self.channel.publish(self.state.snapshot(self.version));
        debug!(
            reason,
            version = snapshot.version,
            cart_lines = snapshot.cart.len(),
            sub_total = %snapshot.totals.sub_total,
            total = %snapshot.totals.total,
            "state committed"
        );
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
