use serde::{Deserialize, Serialize};

use crate::domain::{Money, Product, ProductId};

/// One mutation a consumer can request from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreAction {
    SelectDetail { id: ProductId },
    OpenModal { id: ProductId },
    CloseModal,
    AddToCart { id: ProductId },
    Increment { id: ProductId },
    Decrement { id: ProductId },
    RemoveItem { id: ProductId },
    ClearCart,
}

impl StoreAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectDetail { .. } => "select_detail",
            Self::OpenModal { .. } => "open_modal",
            Self::CloseModal => "close_modal",
            Self::AddToCart { .. } => "add_to_cart",
            Self::Increment { .. } => "increment",
            Self::Decrement { .. } => "decrement",
            Self::RemoveItem { .. } => "remove_item",
            Self::ClearCart => "clear_cart",
        }
    }

    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::SelectDetail { id }
            | Self::OpenModal { id }
            | Self::AddToCart { id }
            | Self::Increment { id }
            | Self::Decrement { id }
            | Self::RemoveItem { id } => Some(*id),
            Self::CloseModal | Self::ClearCart => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub sub_total: Money,
    pub tax: Money,
    pub total: Money,
}

/// A cart row resolved against the catalog at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    pub price: Money,
    pub count: u32,
    pub total: Money,
}

impl From<&Product> for CartLine {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            title: product.title().to_string(),
            price: product.price(),
            count: product.count,
            total: product.total,
        }
    }
}

/// Everything a consumer needs to render the storefront at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u64,
    pub products: Vec<Product>,
    pub cart: Vec<CartLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_product: Option<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_product: Option<Product>,
    pub modal_open: bool,
    pub totals: Totals,
}

impl StoreSnapshot {
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id() == id)
    }

    pub fn cart_line(&self, id: ProductId) -> Option<&CartLine> {
        self.cart.iter().find(|line| line.id == id)
    }

    pub fn item_count(&self) -> u32 {
        self.cart.iter().map(|line| line.count).sum()
    }
}
