//! Order Data

use crate::domain::{
    carts::records::CartUuid,
    orders::records::OrderUuid,
    products::records::ProductUuid,
    users::UserUuid,
};

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub cart_uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub total_price: u64,
}

/// New Order Item Data
///
/// `unit_price` is the discounted price at the moment of purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub unit_price: u64,
}
