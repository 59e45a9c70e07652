//! Shipping addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        shipping::{
            errors::ShippingAddressesServiceError, records::ShippingAddress,
            repository::PgShippingAddressesRepository,
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgShippingAddressesService {
    db: Db,
    repository: PgShippingAddressesRepository,
}

impl PgShippingAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgShippingAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl ShippingAddressesService for PgShippingAddressesService {
    #[tracing::instrument(
        name = "shipping.service.default_address",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn default_address(
        &self,
        user: UserUuid,
    ) -> Result<Option<ShippingAddress>, ShippingAddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self.repository.get_default_address(&mut tx, user).await?;

        tx.commit().await?;

        Ok(address)
    }
}

#[automock]
#[async_trait]
pub trait ShippingAddressesService: Send + Sync {
    /// The user's default shipping address, if one is set.
    async fn default_address(
        &self,
        user: UserUuid,
    ) -> Result<Option<ShippingAddress>, ShippingAddressesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::create_default_address};

    use super::*;

    #[tokio::test]
    async fn default_address_is_none_without_one() -> TestResult {
        let ctx = TestContext::new().await;

        assert!(ctx.shipping.default_address(UserUuid::new()).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn default_address_ignores_non_default_rows() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        sqlx::query(
            "INSERT INTO shipping_addresses \
               (uuid, user_uuid, address_line1, city, state, postal_code, country, is_default) \
             VALUES ($1, $2, '9 Side St', 'Shelbyville', 'IL', '62565', 'US', FALSE)",
        )
        .bind(uuid::Uuid::now_v7())
        .bind(user.into_uuid())
        .execute(ctx.db.pool())
        .await?;

        assert!(ctx.shipping.default_address(user).await?.is_none());

        let created = create_default_address(&ctx, user).await?;

        assert_eq!(ctx.shipping.default_address(user).await?, Some(created));

        Ok(())
    }
}
