//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use tracing::debug;
use uuid::Uuid;

use crate::{
    database::{try_get_amount, try_get_quantity, try_i32_from_u32, try_i64_from_u64},
    domain::{
        carts::records::CartUuid,
        orders::{
            data::{NewOrder, NewOrderItem},
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus, OrderUuid},
        },
        products::records::ProductUuid,
        users::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEMS_SQL: &str = include_str!("sql/create_order_items.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the order row with status `processing` and no items yet.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.cart_uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(try_i64_from_u64(order.total_price, "total_price")?)
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "orders.repository.create_order_items",
        skip(self, tx, items),
        fields(order_uuid = %order, item_count = items.len()),
        err
    )]
    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let item_uuids: Vec<Uuid> = items
            .iter()
            .map(|_| OrderItemUuid::new().into_uuid())
            .collect();

        let product_uuids: Vec<Uuid> = items
            .iter()
            .map(|item| item.product_uuid.into_uuid())
            .collect();

        let quantities = items
            .iter()
            .map(|item| try_i32_from_u32(item.quantity, "quantity"))
            .collect::<Result<Vec<i32>, _>>()?;

        let unit_prices = items
            .iter()
            .map(|item| try_i64_from_u64(item.unit_price, "unit_price"))
            .collect::<Result<Vec<i64>, _>>()?;

        let created = query_as::<Postgres, OrderItemRecord>(CREATE_ORDER_ITEMS_SQL)
            .bind(&item_uuids)
            .bind(order.into_uuid())
            .bind(&product_uuids)
            .bind(&quantities)
            .bind(&unit_prices)
            .fetch_all(&mut **tx)
            .await?;

        debug!(item_count = created.len(), "created order items");

        Ok(created)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        order.items = self.get_order_items(tx, &[order.uuid]).await?;

        Ok(order)
    }

    /// The user's orders, newest first, each with its items.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        let order_uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut items_by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> =
            FxHashMap::default();

        for item in self.get_order_items(tx, &order_uuids).await? {
            items_by_order.entry(item.order_uuid).or_default().push(item);
        }

        for order in &mut orders {
            order.items = items_by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_uuids: Vec<Uuid> = orders.iter().copied().map(Into::into).collect();

        query_as::<Postgres, OrderItemRecord>(GET_ORDER_ITEMS_SQL)
            .bind(&order_uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            status,
            total_price: try_get_amount(row, "total_price")?,
            ordered_at: row.try_get::<SqlxTimestamp, _>("ordered_at")?.to_jiff(),
            items: Vec::new(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
        })
    }
}
