//! Cart Records

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{
        products::records::{ProductUuid, unit_price},
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// CartItem Record
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart item joined with the live attributes of its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item_uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub discount: Option<u64>,
    pub quantity: u32,
}

impl CartLine {
    pub fn unit_price(&self) -> u64 {
        unit_price(self.price, self.discount)
    }

    /// `None` when the line total does not fit in a `u64`.
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price().checked_mul(u64::from(self.quantity))
    }
}

/// Materialized cart with its computed total.
///
/// The total is derived from current product prices every time the view is read.
#[derive(Debug, Clone)]
pub struct CartView {
    pub cart: CartRecord,
    pub lines: Vec<CartLine>,
    pub total: u64,
}

impl CartView {
    pub fn new(cart: CartRecord, lines: Vec<CartLine>) -> Result<Self, TotalOverflow> {
        let total = cart_total(&lines)?;

        Ok(Self { cart, lines, total })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A line or cart total exceeded the representable amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cart total overflows")]
pub struct TotalOverflow;

/// Sum of `(price - discount) * quantity` over every line.
pub fn cart_total(lines: &[CartLine]) -> Result<u64, TotalOverflow> {
    lines.iter().try_fold(0, |total: u64, line| {
        line.line_total()
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or(TotalOverflow)
    })
}
