//! Checkout Records

use clap::ValueEnum;

use crate::domain::{
    carts::records::CartView, orders::records::OrderRecord, shipping::records::ShippingAddress,
};

/// Read-only preview of what confirming the cart would purchase.
#[derive(Debug, Clone)]
pub struct Summary {
    pub cart: CartView,
    pub shipping_address: Option<ShippingAddress>,
}

/// Result of a committed purchase.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub order: OrderRecord,
    pub summary: Summary,
}

/// What a failed confirmation message does to the purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NotificationPolicy {
    /// Notify inside the transaction; a failed send rolls the purchase back.
    #[default]
    Required,

    /// Notify after commit; a failed send is logged and the order stands.
    BestEffort,
}
