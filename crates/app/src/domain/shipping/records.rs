//! Shipping Address Records

use std::fmt;

use crate::{domain::users::UserUuid, uuids::TypedUuid};

/// Shipping Address UUID
pub type ShippingAddressUuid = TypedUuid<ShippingAddress>;

/// Shipping Address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    pub uuid: ShippingAddressUuid,
    pub user_uuid: UserUuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_line1)?;

        if let Some(line2) = &self.address_line2 {
            write!(f, ", {line2}")?;
        }

        write!(
            f,
            ", {}, {} {}, {}",
            self.city, self.state, self.postal_code, self.country
        )
    }
}
