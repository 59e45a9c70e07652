//! Storefront Domain Concerns

pub mod carts;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod shipping;
pub mod stock;
pub mod users;
pub mod wishlists;
