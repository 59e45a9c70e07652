//! Storefront order processing: carts, wishlist moves, and stock-consistent checkout.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod notifications;
pub mod observability;
pub mod uuids;

#[cfg(test)]
mod test;
