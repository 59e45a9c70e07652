//! App Context

use std::sync::Arc;

use lettre::transport::smtp::Error as SmtpError;
use thiserror::Error;
use tracing::info;

use crate::{
    config::{AppConfig, NotificationConfig},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        checkout::{CheckoutService, PgCheckoutService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        shipping::{PgShippingAddressesService, ShippingAddressesService},
        wishlists::{PgWishlistsService, WishlistsService},
    },
    notifications::{LogOrderNotifier, OrderNotifier, SmtpOrderNotifier},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to configure SMTP transport")]
    Smtp(#[source] SmtpError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub wishlists: Arc<dyn WishlistsService>,
    pub orders: Arc<dyn OrdersService>,
    pub shipping: Arc<dyn ShippingAddressesService>,
    pub checkout: Arc<dyn CheckoutService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or configuring the SMTP
    /// relay fails.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(
            &config.database.database_url,
            config.database.max_connections,
        )
        .await
        .map_err(AppInitError::Database)?;

        let db = Db::new(pool);
        let notifier = build_notifier(&config.notifications).map_err(AppInitError::Smtp)?;

        Ok(Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            wishlists: Arc::new(PgWishlistsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            shipping: Arc::new(PgShippingAddressesService::new(db.clone())),
            checkout: Arc::new(PgCheckoutService::new(
                db,
                notifier,
                config.notifications.policy,
            )),
        })
    }
}

/// SMTP when a relay host is configured, the log otherwise.
fn build_notifier(config: &NotificationConfig) -> Result<Arc<dyn OrderNotifier>, SmtpError> {
    match &config.smtp_host {
        Some(host) => {
            info!(smtp_host = %host, "order confirmations will be mailed");

            Ok(Arc::new(SmtpOrderNotifier::new(host, config)?))
        }
        None => Ok(Arc::new(LogOrderNotifier::new())),
    }
}
