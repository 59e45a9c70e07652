//! Products Data

use crate::domain::products::records::{ProductUuid, VendorUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub vendor_uuid: VendorUuid,
    pub name: String,
    pub price: u64,
    pub discount: Option<u64>,
    pub stock: u64,
    pub is_active: bool,
}

/// Partial product update.
///
/// Absent fields are left untouched. `discount: Some(None)` clears the discount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub discount: Option<Option<u64>>,
    pub stock: Option<u64>,
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.discount.is_none()
            && self.stock.is_none()
            && self.is_active.is_none()
    }
}
