//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{carts::records::TotalOverflow, products::records::ProductUuid};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart already exists")]
    AlreadyExists,

    #[error("cart not found")]
    NotFound,

    #[error("cart belongs to another user")]
    Unauthorized,

    #[error("cart item not found")]
    ItemNotFound,

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        requested: u64,
        available: u64,
    },

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
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

/// Failure while reading a cart's lines and computing its total.
#[derive(Debug, Error)]
pub enum CartViewError {
    #[error(transparent)]
    Sql(#[from] Error),

    #[error(transparent)]
    TotalOverflow(#[from] TotalOverflow),
}

impl From<CartViewError> for CartsServiceError {
    fn from(error: CartViewError) -> Self {
        match error {
            CartViewError::Sql(error) => error.into(),
            CartViewError::TotalOverflow(_) => Self::InvalidData,
        }
    }
}
