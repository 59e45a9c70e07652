//! Wishlists
//!
//! Only the move into the cart lives here; wishlist CRUD is handled elsewhere.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::WishlistsServiceError;
pub use service::*;
