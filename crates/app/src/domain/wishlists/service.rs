//! Wishlists service.

use async_trait::async_trait;
use mockall::automock;
use smallvec::SmallVec;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::{PgCartItemsRepository, PgCartsRepository},
        products::records::ProductUuid,
        users::UserUuid,
        wishlists::{
            errors::WishlistsServiceError,
            records::{MoveSummary, WishlistItemRecord, WishlistItemUuid, WishlistUuid},
            repository::PgWishlistsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgWishlistsService {
    db: Db,
    repository: PgWishlistsRepository,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgWishlistsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgWishlistsRepository::new(),
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }

    /// Upsert each item's product into the user's cart, then delete the items.
    ///
    /// Both statements run in `tx`, so a failure in either leaves the wishlist and the
    /// cart as they were.
    async fn move_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        wishlist: WishlistUuid,
        items: &[WishlistItemRecord],
    ) -> Result<MoveSummary, WishlistsServiceError> {
        let cart = self
            .carts_repository
            .find_cart_for_user(tx, user)
            .await?
            .ok_or(WishlistsServiceError::CartNotFound)?;

        let products: SmallVec<[ProductUuid; 8]> =
            items.iter().map(|item| item.product_uuid).collect();
        let item_uuids: SmallVec<[WishlistItemUuid; 8]> =
            items.iter().map(|item| item.uuid).collect();

        self.items_repository
            .merge_cart_items(tx, cart.uuid, &products)
            .await?;

        let moved = self
            .repository
            .delete_wishlist_items(tx, wishlist, &item_uuids)
            .await?;

        Ok(MoveSummary {
            cart_uuid: cart.uuid,
            moved,
        })
    }

    async fn check_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        wishlist: WishlistUuid,
    ) -> Result<(), WishlistsServiceError> {
        let wishlist = self.repository.get_wishlist(tx, wishlist).await?;

        if wishlist.user_uuid != user {
            return Err(WishlistsServiceError::Unauthorized);
        }

        Ok(())
    }
}

#[async_trait]
impl WishlistsService for PgWishlistsService {
    #[tracing::instrument(
        name = "wishlists.service.move_all",
        skip(self),
        fields(user_uuid = %user, wishlist_uuid = %wishlist, moved = tracing::field::Empty),
        err
    )]
    async fn move_all(
        &self,
        user: UserUuid,
        wishlist: WishlistUuid,
    ) -> Result<MoveSummary, WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        self.check_owner(&mut tx, user, wishlist).await?;

        let items = self.repository.lock_wishlist_items(&mut tx, wishlist).await?;
        let summary = self.move_items(&mut tx, user, wishlist, &items).await?;

        tx.commit().await?;

        tracing::Span::current().record("moved", summary.moved);

        info!(
            cart_uuid = %summary.cart_uuid,
            moved = summary.moved,
            "moved wishlist into cart"
        );

        Ok(summary)
    }

    #[tracing::instrument(
        name = "wishlists.service.move_item",
        skip(self),
        fields(user_uuid = %user, wishlist_uuid = %wishlist, item_uuid = %item),
        err
    )]
    async fn move_item(
        &self,
        user: UserUuid,
        wishlist: WishlistUuid,
        item: WishlistItemUuid,
    ) -> Result<MoveSummary, WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        self.check_owner(&mut tx, user, wishlist).await?;

        let item = self
            .repository
            .lock_wishlist_item(&mut tx, wishlist, item)
            .await?
            .ok_or(WishlistsServiceError::ItemNotFound)?;

        let summary = self
            .move_items(&mut tx, user, wishlist, std::slice::from_ref(&item))
            .await?;

        tx.commit().await?;

        info!(
            cart_uuid = %summary.cart_uuid,
            product_uuid = %item.product_uuid,
            "moved wishlist item into cart"
        );

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait WishlistsService: Send + Sync {
    /// Move every item of the wishlist into the user's cart, one unit each.
    async fn move_all(
        &self,
        user: UserUuid,
        wishlist: WishlistUuid,
    ) -> Result<MoveSummary, WishlistsServiceError>;

    /// Move a single wishlist item into the user's cart.
    async fn move_item(
        &self,
        user: UserUuid,
        wishlist: WishlistUuid,
        item: WishlistItemUuid,
    ) -> Result<MoveSummary, WishlistsServiceError>;
}
