//! Wishlist Records

use jiff::Timestamp;

use crate::{
    domain::{carts::records::CartUuid, products::records::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Wishlist UUID
pub type WishlistUuid = TypedUuid<WishlistRecord>;

/// Wishlist Record
#[derive(Debug, Clone)]
pub struct WishlistRecord {
    pub uuid: WishlistUuid,
    pub user_uuid: UserUuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wishlist Item UUID
pub type WishlistItemUuid = TypedUuid<WishlistItemRecord>;

/// Wishlist Item Record
#[derive(Debug, Clone)]
pub struct WishlistItemRecord {
    pub uuid: WishlistItemUuid,
    pub wishlist_uuid: WishlistUuid,
    pub product_uuid: ProductUuid,
    pub created_at: Timestamp,
}

/// Outcome of moving wishlist items into a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSummary {
    pub cart_uuid: CartUuid,
    pub moved: u64,
}
