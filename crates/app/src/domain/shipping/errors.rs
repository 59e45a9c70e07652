//! Shipping address service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShippingAddressesServiceError {
    #[error("storage error")]
    Sql(#[from] Error),
}
