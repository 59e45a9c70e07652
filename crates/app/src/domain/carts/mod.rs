//! Carts

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub(crate) use repositories::{PgCartItemsRepository, PgCartsRepository};
pub use service::*;
pub(crate) use service::load_cart_view;
