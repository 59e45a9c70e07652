//! Shipping Addresses
//!
//! Read-only lookup; the address book itself is maintained elsewhere.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::ShippingAddressesServiceError;
pub(crate) use repository::PgShippingAddressesRepository;
pub use service::*;
