use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    NotInCart,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("product {0} not found in catalog")]
    NotFound(ProductId),
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
    #[error("store worker is no longer running")]
    WorkerStopped,
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::NotInCart(_) => ErrorCode::NotInCart,
            Self::WorkerStopped => ErrorCode::Unavailable,
        }
    }

    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::NotFound(id) | Self::NotInCart(id) => Some(*id),
            Self::WorkerStopped => None,
        }
    }
}

/// Serializable form of a [`StoreError`] handed to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
}

impl From<&StoreError> for ErrorReport {
    fn from(value: &StoreError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
            product_id: value.product_id(),
        }
    }
}
