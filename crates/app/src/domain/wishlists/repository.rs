//! Wishlists Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    products::records::ProductUuid,
    users::UserUuid,
    wishlists::records::{WishlistItemRecord, WishlistItemUuid, WishlistRecord, WishlistUuid},
};

const GET_WISHLIST_SQL: &str = include_str!("sql/get_wishlist.sql");
const GET_WISHLIST_ITEMS_SQL: &str = include_str!("sql/get_wishlist_items.sql");
const GET_WISHLIST_ITEM_SQL: &str = include_str!("sql/get_wishlist_item.sql");
const DELETE_WISHLIST_ITEMS_SQL: &str = include_str!("sql/delete_wishlist_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWishlistsRepository;

impl PgWishlistsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_wishlist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
    ) -> Result<WishlistRecord, sqlx::Error> {
        query_as::<Postgres, WishlistRecord>(GET_WISHLIST_SQL)
            .bind(wishlist.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Items of the wishlist, locked until the transaction ends.
    pub(crate) async fn lock_wishlist_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
    ) -> Result<Vec<WishlistItemRecord>, sqlx::Error> {
        query_as::<Postgres, WishlistItemRecord>(GET_WISHLIST_ITEMS_SQL)
            .bind(wishlist.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn lock_wishlist_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
        item: WishlistItemUuid,
    ) -> Result<Option<WishlistItemRecord>, sqlx::Error> {
        query_as::<Postgres, WishlistItemRecord>(GET_WISHLIST_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(wishlist.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_wishlist_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wishlist: WishlistUuid,
        items: &[WishlistItemUuid],
    ) -> Result<u64, sqlx::Error> {
        let item_uuids: Vec<Uuid> = items.iter().copied().map(Into::into).collect();

        let rows_affected = query(DELETE_WISHLIST_ITEMS_SQL)
            .bind(wishlist.into_uuid())
            .bind(&item_uuids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for WishlistRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WishlistUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for WishlistItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WishlistItemUuid::from_uuid(row.try_get("uuid")?),
            wishlist_uuid: WishlistUuid::from_uuid(row.try_get("wishlist_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
