//! Test context for service-level integration tests.

use std::sync::Arc;

use crate::{
    database::Db,
    domain::{
        carts::PgCartsService,
        checkout::{NotificationPolicy, PgCheckoutService},
        orders::PgOrdersService,
        products::PgProductsService,
        shipping::PgShippingAddressesService,
        wishlists::PgWishlistsService,
    },
    notifications::{LogOrderNotifier, OrderNotifier},
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub products: PgProductsService,
    pub carts: PgCartsService,
    pub wishlists: PgWishlistsService,
    pub orders: PgOrdersService,
    pub shipping: PgShippingAddressesService,
    pub checkout: PgCheckoutService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            products: PgProductsService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            wishlists: PgWishlistsService::new(db.clone()),
            orders: PgOrdersService::new(db.clone()),
            shipping: PgShippingAddressesService::new(db.clone()),
            checkout: PgCheckoutService::new(
                db,
                Arc::new(LogOrderNotifier::new()),
                NotificationPolicy::Required,
            ),
            db: test_db,
        }
    }

    /// A checkout service against the same database with its own notifier and policy.
    pub fn checkout_with<N>(&self, notifier: N, policy: NotificationPolicy) -> PgCheckoutService
    where
        N: OrderNotifier + 'static,
    {
        PgCheckoutService::new(Db::new(self.db.pool().clone()), Arc::new(notifier), policy)
    }
}
