//! Checkout
//!
//! Turns a cart into an order. Everything from the cart snapshot to the emptied cart runs
//! in one transaction, so an attempt either commits in full or leaves no trace.

pub mod errors;
pub mod records;
pub mod service;
pub mod validation;

pub use errors::CheckoutServiceError;
pub use records::NotificationPolicy;
pub use service::*;
