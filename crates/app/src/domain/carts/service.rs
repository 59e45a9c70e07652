//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{CartItemUpdate, NewCart, NewCartItem},
            errors::{CartViewError, CartsServiceError},
            records::{CartItemRecord, CartItemUuid, CartRecord, CartUuid, CartView},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        stock::PgStockLedger,
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    stock_ledger: PgStockLedger,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            stock_ledger: PgStockLedger::new(),
        }
    }

    async fn owned_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        cart: CartUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let cart = self.carts_repository.get_cart(tx, cart).await?;

        if cart.user_uuid != user {
            return Err(CartsServiceError::Unauthorized);
        }

        Ok(cart)
    }
}

/// Read the cart's lines and compute its total inside `tx`.
pub(crate) async fn load_cart_view(
    items: &PgCartItemsRepository,
    tx: &mut Transaction<'_, Postgres>,
    cart: CartRecord,
) -> Result<CartView, CartViewError> {
    let lines = items.get_cart_lines(tx, cart.uuid).await?;

    Ok(CartView::new(cart, lines)?)
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.create_cart",
        skip(self, cart),
        fields(user_uuid = %user, cart_uuid = %cart.uuid),
        err
    )]
    async fn create_cart(
        &self,
        user: UserUuid,
        cart: NewCart,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if self
            .carts_repository
            .find_cart_for_user(&mut tx, user)
            .await?
            .is_some()
        {
            return Err(CartsServiceError::AlreadyExists);
        }

        let created = self
            .carts_repository
            .create_cart(&mut tx, cart.uuid, user)
            .await?;

        tx.commit().await?;

        info!(cart_uuid = %created.uuid, "created cart");

        Ok(created)
    }

    #[tracing::instrument(
        name = "carts.service.find_cart_for_user",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn find_cart_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Option<CartRecord>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .find_cart_for_user(&mut tx, user)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self),
        fields(user_uuid = %user, cart_uuid = %cart, line_count = tracing::field::Empty),
        err
    )]
    async fn get_cart(&self, user: UserUuid, cart: CartUuid) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.owned_cart(&mut tx, user, cart).await?;
        let view = load_cart_view(&self.items_repository, &mut tx, cart).await?;

        tx.commit().await?;

        tracing::Span::current().record("line_count", view.lines.len());

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            cart_uuid = %cart,
            product_uuid = %item.product_uuid,
            quantity = item.quantity
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartView, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let cart = self.owned_cart(&mut tx, user, cart).await?;

        let available = self
            .stock_ledger
            .available_stock(&mut tx, item.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductNotFound(item.product_uuid))?;

        let existing = self
            .items_repository
            .get_item_quantity(&mut tx, cart.uuid, item.product_uuid)
            .await?;

        let requested = u64::from(item.quantity) + u64::from(existing);

        // Advisory only: nothing is reserved until the order commits.
        if requested > available {
            return Err(CartsServiceError::InsufficientStock {
                product: item.product_uuid,
                requested,
                available,
            });
        }

        let line = self
            .items_repository
            .upsert_cart_item(&mut tx, cart.uuid, item.product_uuid, item.quantity)
            .await?;

        debug!(item_uuid = %line.uuid, quantity = line.quantity, "upserted cart item");

        let view = load_cart_view(&self.items_repository, &mut tx, cart).await?;

        tx.commit().await?;

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.edit_item",
        skip(self, update),
        fields(
            user_uuid = %user,
            cart_uuid = %cart,
            item_uuid = %item,
            quantity = update.quantity
        ),
        err
    )]
    async fn edit_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: CartItemUuid,
        update: CartItemUpdate,
    ) -> Result<CartItemRecord, CartsServiceError> {
        if update.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let cart = self.owned_cart(&mut tx, user, cart).await?;

        let existing = self
            .items_repository
            .get_cart_item(&mut tx, cart.uuid, item)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        let available = self
            .stock_ledger
            .available_stock(&mut tx, existing.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductNotFound(existing.product_uuid))?;

        if u64::from(update.quantity) > available {
            return Err(CartsServiceError::InsufficientStock {
                product: existing.product_uuid,
                requested: u64::from(update.quantity),
                available,
            });
        }

        let updated = self
            .items_repository
            .update_cart_item(&mut tx, cart.uuid, item, update.quantity)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %user, cart_uuid = %cart, item_uuid = %item),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.owned_cart(&mut tx, user, cart).await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, cart.uuid, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.empty_cart",
        skip(self),
        fields(user_uuid = %user, cart_uuid = %cart, removed = tracing::field::Empty),
        err
    )]
    async fn empty_cart(&self, user: UserUuid, cart: CartUuid) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.owned_cart(&mut tx, user, cart).await?;

        let removed = self
            .items_repository
            .delete_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        tracing::Span::current().record("removed", removed);

        Ok(removed)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Creates the user's cart. Each user has at most one.
    async fn create_cart(
        &self,
        user: UserUuid,
        cart: NewCart,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Looks up the user's cart, if they have one.
    async fn find_cart_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Option<CartRecord>, CartsServiceError>;

    /// Retrieve a cart with its lines and current total.
    async fn get_cart(&self, user: UserUuid, cart: CartUuid) -> Result<CartView, CartsServiceError>;

    /// Add a product to the cart, merging with an existing line for the same product.
    async fn add_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartView, CartsServiceError>;

    /// Replace the quantity of a single line.
    async fn edit_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: CartItemUuid,
        update: CartItemUpdate,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Remove a single line.
    async fn remove_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError>;

    /// Remove every line, returning how many were removed. The cart itself is kept.
    async fn empty_cart(&self, user: UserUuid, cart: CartUuid) -> Result<u64, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::records::ProductUuid,
        test::{
            TestContext,
            helpers::{add_item, create_cart, create_product},
        },
    };

    use super::*;

    #[tokio::test]
    async fn create_cart_returns_owned_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let uuid = CartUuid::new();

        let cart = ctx.carts.create_cart(user, NewCart { uuid }).await?;

        assert_eq!(cart.uuid, uuid);
        assert_eq!(cart.user_uuid, user);

        Ok(())
    }

    #[tokio::test]
    async fn second_cart_for_same_user_conflicts() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        create_cart(&ctx, user).await?;

        let result = ctx
            .carts
            .create_cart(
                user,
                NewCart {
                    uuid: CartUuid::new(),
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_cart_for_user_without_cart_is_none() -> TestResult {
        let ctx = TestContext::new().await;

        assert!(ctx.carts.find_cart_for_user(UserUuid::new()).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.get_cart(UserUuid::new(), CartUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn other_users_cart_is_unauthorized() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx, UserUuid::new()).await?;

        let result = ctx.carts.get_cart(UserUuid::new(), cart.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn repeated_adds_merge_into_one_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;
        let product = create_product(&ctx, 3_00, None, 10).await?;

        add_item(&ctx, user, cart.uuid, product.uuid, 2).await?;
        let view = add_item(&ctx, user, cart.uuid, product.uuid, 3).await?;

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 5);
        assert_eq!(view.total, 15_00);

        Ok(())
    }

    #[tokio::test]
    async fn add_beyond_stock_is_rejected_and_line_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;
        let product = create_product(&ctx, 3_00, None, 4).await?;

        add_item(&ctx, user, cart.uuid, product.uuid, 2).await?;

        let result = add_item(&ctx, user, cart.uuid, product.uuid, 3).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock {
                    requested: 5,
                    available: 4,
                    ..
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let view = ctx.carts.get_cart(user, cart.uuid).await?;

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn overflowing_total_is_invalid_data_and_nothing_is_added() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;
        let price = u64::try_from(i64::MAX)?;
        let product = create_product(&ctx, price, None, 3).await?;

        let result = add_item(&ctx, user, cart.uuid, product.uuid, 3).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE cart_uuid = $1")
            .bind(cart.uuid.into_uuid())
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(lines, 0);

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;
        let product = create_product(&ctx, 1_00, None, 4).await?;

        let result = add_item(&ctx, user, cart.uuid, product.uuid, 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adding_unknown_product_returns_product_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;
        let missing = ProductUuid::new();

        let result = add_item(&ctx, user, cart.uuid, missing, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound(product)) if product == missing),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn view_total_uses_discounted_prices() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;
        let a = create_product(&ctx, 10, Some(2), 10).await?;
        let b = create_product(&ctx, 5, None, 10).await?;

        add_item(&ctx, user, cart.uuid, a.uuid, 3).await?;
        add_item(&ctx, user, cart.uuid, b.uuid, 1).await?;

        let view = ctx.carts.get_cart(user, cart.uuid).await?;

        assert_eq!(view.total, 29);

        Ok(())
    }

    #[tokio::test]
    async fn edit_item_replaces_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;
        let product = create_product(&ctx, 1_00, None, 10).await?;

        let view = add_item(&ctx, user, cart.uuid, product.uuid, 2).await?;
        let item = view.lines[0].item_uuid;

        let updated = ctx
            .carts
            .edit_item(user, cart.uuid, item, CartItemUpdate { quantity: 7 })
            .await?;

        assert_eq!(updated.uuid, item);
        assert_eq!(updated.quantity, 7);

        let result = ctx
            .carts
            .edit_item(user, cart.uuid, item, CartItemUpdate { quantity: 11 })
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn edit_unknown_item_returns_item_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;

        let result = ctx
            .carts
            .edit_item(user, cart.uuid, CartItemUuid::new(), CartItemUpdate { quantity: 1 })
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_deletes_single_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;
        let a = create_product(&ctx, 1_00, None, 10).await?;
        let b = create_product(&ctx, 2_00, None, 10).await?;

        add_item(&ctx, user, cart.uuid, a.uuid, 1).await?;
        let view = add_item(&ctx, user, cart.uuid, b.uuid, 1).await?;

        let removed = view
            .lines
            .iter()
            .find(|line| line.product_uuid == a.uuid)
            .map(|line| line.item_uuid)
            .ok_or("line for product a")?;

        ctx.carts.remove_item(user, cart.uuid, removed).await?;

        let view = ctx.carts.get_cart(user, cart.uuid).await?;

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].product_uuid, b.uuid);

        let result = ctx.carts.remove_item(user, cart.uuid, removed).await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_keeps_cart_row() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = create_cart(&ctx, user).await?;
        let a = create_product(&ctx, 1_00, None, 10).await?;
        let b = create_product(&ctx, 2_00, None, 10).await?;

        add_item(&ctx, user, cart.uuid, a.uuid, 1).await?;
        add_item(&ctx, user, cart.uuid, b.uuid, 4).await?;

        let removed = ctx.carts.empty_cart(user, cart.uuid).await?;

        assert_eq!(removed, 2);

        let view = ctx.carts.get_cart(user, cart.uuid).await?;

        assert!(view.is_empty());
        assert_eq!(view.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn empty_other_users_cart_is_unauthorized() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx, UserUuid::new()).await?;

        let result = ctx.carts.empty_cart(UserUuid::new(), cart.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }
}
