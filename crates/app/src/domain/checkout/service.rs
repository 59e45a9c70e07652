//! Checkout service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use smallvec::SmallVec;
use sqlx::{Postgres, Transaction};
use tracing::{Span, error, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{PgCartItemsRepository, PgCartsRepository, load_cart_view, records::CartUuid},
        checkout::{
            errors::CheckoutServiceError,
            records::{Confirmation, NotificationPolicy, Summary},
            validation::validate_lines,
        },
        orders::{
            PgOrdersRepository,
            data::{NewOrder, NewOrderItem},
            records::{OrderRecord, OrderUuid},
        },
        shipping::PgShippingAddressesRepository,
        stock::{PgStockLedger, StockLedgerError},
        users::UserUuid,
    },
    notifications::{NotificationError, OrderConfirmation, OrderNotifier},
};

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    orders_repository: PgOrdersRepository,
    shipping_repository: PgShippingAddressesRepository,
    stock_ledger: PgStockLedger,
    notifier: Arc<dyn OrderNotifier>,
    policy: NotificationPolicy,
}

impl fmt::Debug for PgCheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgCheckoutService")
            .field("db", &self.db)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, notifier: Arc<dyn OrderNotifier>, policy: NotificationPolicy) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            shipping_repository: PgShippingAddressesRepository::new(),
            stock_ledger: PgStockLedger::new(),
            notifier,
            policy,
        }
    }

    /// The commit protocol. Runs entirely inside `tx`; the caller decides commit or rollback.
    async fn place_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        cart: CartUuid,
        email: &str,
    ) -> Result<Confirmation, CheckoutServiceError> {
        // Snapshot
        let cart = self.carts_repository.lock_cart(tx, cart).await?;

        if cart.user_uuid != user {
            return Err(CheckoutServiceError::Unauthorized);
        }

        let view = load_cart_view(&self.items_repository, tx, cart).await?;

        if view.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        let shipping_address = self
            .shipping_repository
            .get_default_address(tx, user)
            .await?
            .ok_or(CheckoutServiceError::MissingShippingAddress)?;

        Span::current().record("line_count", view.lines.len());

        // Order shell
        let mut order = self
            .orders_repository
            .create_order(
                tx,
                &NewOrder {
                    uuid: OrderUuid::new(),
                    cart_uuid: view.cart.uuid,
                    user_uuid: user,
                    total_price: view.total,
                },
            )
            .await?;

        Span::current().record("order_uuid", tracing::field::display(order.uuid));

        // Lock and validate
        let levels = self
            .stock_ledger
            .lock_stock(tx, view.lines.iter().map(|line| line.product_uuid))
            .await?;

        validate_lines(&view.lines, &levels)?;

        // Decrement
        for line in &view.lines {
            self.stock_ledger
                .decrement(tx, line.product_uuid, line.quantity)
                .await
                .map_err(|e| match e {
                    StockLedgerError::InsufficientStock { product, requested } => {
                        CheckoutServiceError::InsufficientStock {
                            product,
                            requested: u64::from(requested),
                            available: levels.get(product).unwrap_or_default(),
                        }
                    }
                    StockLedgerError::Sql(e) => e.into(),
                })?;
        }

        // Order lines
        let items: SmallVec<[NewOrderItem; 8]> = view
            .lines
            .iter()
            .map(|line| NewOrderItem {
                product_uuid: line.product_uuid,
                quantity: line.quantity,
                unit_price: line.unit_price(),
            })
            .collect();

        order.items = self
            .orders_repository
            .create_order_items(tx, order.uuid, &items)
            .await?;

        // Empty the cart
        self.items_repository
            .delete_cart_items(tx, view.cart.uuid)
            .await?;

        if self.policy == NotificationPolicy::Required {
            self.notify(&order, email)
                .await
                .map_err(CheckoutServiceError::Notification)?;
        }

        Ok(Confirmation {
            order,
            summary: Summary {
                cart: view,
                shipping_address: Some(shipping_address),
            },
        })
    }

    async fn notify(
        &self,
        order: &OrderRecord,
        email: &str,
    ) -> Result<(), NotificationError> {
        self.notifier
            .send_order_confirmation(&OrderConfirmation {
                email: email.to_string(),
                order_uuid: order.uuid,
                ordered_at: order.ordered_at,
                total_price: order.total_price,
            })
            .await
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.get_summary",
        skip(self),
        fields(user_uuid = %user, cart_uuid = %cart),
        err
    )]
    async fn get_summary(
        &self,
        user: UserUuid,
        cart: CartUuid,
    ) -> Result<Summary, CheckoutServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.get_cart(&mut tx, cart).await?;

        if cart.user_uuid != user {
            return Err(CheckoutServiceError::Unauthorized);
        }

        let view = load_cart_view(&self.items_repository, &mut tx, cart).await?;

        let shipping_address = self
            .shipping_repository
            .get_default_address(&mut tx, user)
            .await?;

        tx.commit().await?;

        Ok(Summary {
            cart: view,
            shipping_address,
        })
    }

    #[tracing::instrument(
        name = "checkout.service.confirm_purchase",
        skip(self, email),
        fields(
            user_uuid = %user,
            cart_uuid = %cart,
            line_count = tracing::field::Empty,
            order_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn confirm_purchase(
        &self,
        user: UserUuid,
        cart: CartUuid,
        email: String,
    ) -> Result<Confirmation, CheckoutServiceError> {
        let mut tx = self.db.begin().await?;

        let confirmation = match self.place_order(&mut tx, user, cart, &email).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    error!(error = %rollback_error, "failed to roll back checkout");
                }

                warn!(error = %e, "checkout aborted");

                return Err(e);
            }
        };

        tx.commit().await?;

        info!(
            order_uuid = %confirmation.order.uuid,
            total_price = confirmation.order.total_price,
            "order committed"
        );

        if self.policy == NotificationPolicy::BestEffort
            && let Err(e) = self.notify(&confirmation.order, &email).await
        {
            warn!(
                order_uuid = %confirmation.order.uuid,
                error = %e,
                "order confirmation not sent"
            );
        }

        Ok(confirmation)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Preview the cart with its current total and the default shipping address.
    async fn get_summary(
        &self,
        user: UserUuid,
        cart: CartUuid,
    ) -> Result<Summary, CheckoutServiceError>;

    /// Purchase the cart: decrement stock, record the order, empty the cart and notify.
    ///
    /// Any failure rolls the whole attempt back.
    async fn confirm_purchase(
        &self,
        user: UserUuid,
        cart: CartUuid,
        email: String,
    ) -> Result<Confirmation, CheckoutServiceError>;
}
