//! Orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            records::{OrderRecord, OrderStatus, OrderUuid},
            repository::PgOrdersRepository,
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.list_orders",
        skip(self),
        fields(user_uuid = %user, order_count = tracing::field::Empty),
        err
    )]
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_orders(&mut tx, user).await?;

        tx.commit().await?;

        tracing::Span::current().record("order_count", orders.len());

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        if order.user_uuid != user {
            return Err(OrdersServiceError::Unauthorized);
        }

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.track_order",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order, status = tracing::field::Empty),
        err
    )]
    async fn track_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderStatus, OrdersServiceError> {
        let status = self.get_order(user, order).await?.status;

        tracing::Span::current().record("status", status.as_str());

        Ok(status)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// All of the user's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// A single order with its items.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Current fulfilment status of an order.
    async fn track_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderStatus, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{
        TestContext,
        helpers::{create_product, place_order},
    };

    use super::*;

    #[tokio::test]
    async fn list_orders_returns_newest_first_with_items() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let a = create_product(&ctx, 4_00, None, 10).await?;
        let b = create_product(&ctx, 6_00, Some(1_00), 10).await?;

        let first = place_order(&ctx, user, &[(a.uuid, 1)]).await?;
        let second = place_order(&ctx, user, &[(a.uuid, 2), (b.uuid, 1)]).await?;

        let orders = ctx.orders.list_orders(user).await?;

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].uuid, second.uuid);
        assert_eq!(orders[1].uuid, first.uuid);
        assert_eq!(orders[0].items.len(), 2);
        assert_eq!(orders[0].total_price, 13_00);
        assert_eq!(orders[1].items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_of_other_users_is_empty() -> TestResult {
        let ctx = TestContext::new().await;
        let a = create_product(&ctx, 4_00, None, 10).await?;

        place_order(&ctx, UserUuid::new(), &[(a.uuid, 1)]).await?;

        assert!(ctx.orders.list_orders(UserUuid::new()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn get_order_freezes_unit_prices() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let a = create_product(&ctx, 10_00, Some(2_50), 10).await?;

        let order = place_order(&ctx, user, &[(a.uuid, 2)]).await?;

        let fetched = ctx.orders.get_order(user, order.uuid).await?;

        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].unit_price, 7_50);
        assert_eq!(fetched.items[0].quantity, 2);
        assert_eq!(fetched.total_price, 15_00);

        Ok(())
    }

    #[tokio::test]
    async fn get_order_of_another_user_is_unauthorized() -> TestResult {
        let ctx = TestContext::new().await;
        let a = create_product(&ctx, 4_00, None, 10).await?;

        let order = place_order(&ctx, UserUuid::new(), &[(a.uuid, 1)]).await?;

        let result = ctx.orders.get_order(UserUuid::new(), order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn new_orders_track_as_processing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let a = create_product(&ctx, 4_00, None, 10).await?;

        let order = place_order(&ctx, user, &[(a.uuid, 1)]).await?;

        assert_eq!(
            ctx.orders.track_order(user, order.uuid).await?,
            OrderStatus::Processing
        );

        Ok(())
    }

    #[tokio::test]
    async fn track_unknown_order_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .track_order(UserUuid::new(), OrderUuid::new())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
