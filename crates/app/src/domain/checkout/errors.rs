//! Checkout service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{carts::errors::CartViewError, products::records::ProductUuid},
    notifications::NotificationError,
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("cart belongs to another user")]
    Unauthorized,

    #[error("cart is empty")]
    EmptyCart,

    #[error("product {product} is no longer available")]
    ProductGone { product: ProductUuid },

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        requested: u64,
        available: u64,
    },

    #[error("no default shipping address")]
    MissingShippingAddress,

    #[error("order confirmation could not be sent")]
    Notification(#[source] NotificationError),

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<CartViewError> for CheckoutServiceError {
    fn from(error: CartViewError) -> Self {
        match error {
            CartViewError::Sql(error) => error.into(),
            CartViewError::TotalOverflow(_) => Self::InvalidData,
        }
    }
}
