//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Owning vendor marker.
#[derive(Debug)]
pub struct Vendor;

/// Vendor UUID
pub type VendorUuid = TypedUuid<Vendor>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub vendor_uuid: VendorUuid,
    pub name: String,
    pub price: u64,
    pub discount: Option<u64>,
    pub stock: u64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// Price after discount.
    pub fn unit_price(&self) -> u64 {
        unit_price(self.price, self.discount)
    }
}

/// Price after an optional discount; a missing discount counts as zero.
pub fn unit_price(price: u64, discount: Option<u64>) -> u64 {
    price.saturating_sub(discount.unwrap_or(0))
}
