//! Stock Ledger Repository

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use sqlx::{Postgres, Transaction, query, query_as, query_scalar};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    database::try_i64_from_u64,
    domain::products::records::ProductUuid,
};

const LOCK_STOCK_SQL: &str = include_str!("sql/lock_stock.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const GET_STOCK_SQL: &str = include_str!("sql/get_stock.sql");

/// Stock ledger errors.
#[derive(Debug, Error)]
pub enum StockLedgerError {
    /// The conditional decrement matched no row.
    #[error("insufficient stock for product {product}: requested {requested}")]
    InsufficientStock { product: ProductUuid, requested: u32 },

    /// Underlying SQL/storage error.
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

/// Stock counts read under lock, keyed by product.
///
/// Products that no longer exist are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockLevels(FxHashMap<ProductUuid, u64>);

impl StockLevels {
    pub fn get(&self, product: ProductUuid) -> Option<u64> {
        self.0.get(&product).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ProductUuid, u64)> for StockLevels {
    fn from_iter<I: IntoIterator<Item = (ProductUuid, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Deduplicate and sort product ids into the order locks are taken in.
///
/// Every caller locks in ascending uuid order, so two commits over overlapping products
/// cannot wait on each other in a cycle.
pub(crate) fn lock_order<I>(products: I) -> SmallVec<[ProductUuid; 8]>
where
    I: IntoIterator<Item = ProductUuid>,
{
    let mut ids: SmallVec<[ProductUuid; 8]> = products.into_iter().collect();

    ids.sort_unstable();
    ids.dedup();

    ids
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStockLedger;

impl PgStockLedger {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the stock rows of every given product in a single statement.
    ///
    /// Blocks while another transaction holds any of the rows.
    #[tracing::instrument(
        name = "stock.ledger.lock_stock",
        skip(self, tx, products),
        fields(
            product_count = tracing::field::Empty,
            locked_count = tracing::field::Empty
        ),
        err
    )]
    pub(crate) async fn lock_stock<I>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: I,
    ) -> Result<StockLevels, sqlx::Error>
    where
        I: IntoIterator<Item = ProductUuid>,
    {
        let ids: Vec<Uuid> = lock_order(products)
            .into_iter()
            .map(ProductUuid::into_uuid)
            .collect();

        tracing::Span::current().record("product_count", ids.len());

        if ids.is_empty() {
            return Ok(StockLevels::default());
        }

        let rows: Vec<(Uuid, i64)> = query_as(LOCK_STOCK_SQL)
            .bind(&ids)
            .fetch_all(&mut **tx)
            .await?;

        let levels = rows
            .into_iter()
            .map(|(uuid, stock)| {
                u64::try_from(stock)
                    .map(|stock| (ProductUuid::from_uuid(uuid), stock))
                    .map_err(|e| sqlx::Error::ColumnDecode {
                        index: "stock".to_string(),
                        source: Box::new(e),
                    })
            })
            .collect::<Result<StockLevels, _>>()?;

        tracing::Span::current().record("locked_count", levels.len());

        debug!(locked_count = levels.len(), "locked stock rows");

        Ok(levels)
    }

    /// Subtract `quantity` only when enough stock remains.
    pub(crate) async fn decrement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), StockLedgerError> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(try_i64_from_u64(u64::from(quantity), "stock")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StockLedgerError::InsufficientStock {
                product,
                requested: quantity,
            });
        }

        debug!(product_uuid = %product, quantity, "decremented stock");

        Ok(())
    }

    /// Unlocked read of the current stock; `None` when the product does not exist.
    pub(crate) async fn available_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<u64>, sqlx::Error> {
        let stock: Option<i64> = query_scalar(GET_STOCK_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        stock
            .map(|stock| {
                u64::try_from(stock).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "stock".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()
    }
}
