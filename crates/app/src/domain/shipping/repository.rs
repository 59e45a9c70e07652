//! Shipping Addresses Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    shipping::records::{ShippingAddress, ShippingAddressUuid},
    users::UserUuid,
};

const GET_DEFAULT_ADDRESS_SQL: &str = include_str!("sql/get_default_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgShippingAddressesRepository;

impl PgShippingAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_default_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<ShippingAddress>, sqlx::Error> {
        query_as::<Postgres, ShippingAddress>(GET_DEFAULT_ADDRESS_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ShippingAddress {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ShippingAddressUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            address_line1: row.try_get("address_line1")?,
            address_line2: row.try_get("address_line2")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            postal_code: row.try_get("postal_code")?,
            country: row.try_get("country")?,
        })
    }
}
