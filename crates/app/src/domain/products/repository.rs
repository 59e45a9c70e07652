//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, QueryBuilder, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{try_get_amount, try_get_optional_amount, try_i64_from_u64},
    domain::products::{
        data::{NewProduct, ProductUpdate},
        records::{ProductRecord, ProductUuid, VendorUuid},
    },
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");

const PRODUCT_COLUMNS: &str =
    "uuid, vendor_uuid, name, price, discount, stock, is_active, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        let price = try_i64_from_u64(product.price, "price")?;
        let stock = try_i64_from_u64(product.stock, "stock")?;
        let discount = product
            .discount
            .map(|discount| try_i64_from_u64(discount, "discount"))
            .transpose()?;

        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.vendor_uuid.into_uuid())
            .bind(product.name)
            .bind(price)
            .bind(discount)
            .bind(stock)
            .bind(product.is_active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        let mut builder = build_update_query(product, update)?;

        builder
            .build_query_as::<ProductRecord>()
            .fetch_one(&mut **tx)
            .await
    }
}

/// Translate a partial update into a parameterised `UPDATE`.
///
/// Only present fields produce a `SET` clause and every value is bound, never spliced
/// into the SQL text.
pub(crate) fn build_update_query(
    product: ProductUuid,
    update: &ProductUpdate,
) -> Result<QueryBuilder<'static, Postgres>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE products SET ");

    {
        let mut set = builder.separated(", ");

        if let Some(name) = &update.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }

        if let Some(price) = update.price {
            set.push("price = ")
                .push_bind_unseparated(try_i64_from_u64(price, "price")?);
        }

        if let Some(discount) = update.discount {
            let discount = discount
                .map(|discount| try_i64_from_u64(discount, "discount"))
                .transpose()?;

            set.push("discount = ").push_bind_unseparated(discount);
        }

        if let Some(stock) = update.stock {
            set.push("stock = ")
                .push_bind_unseparated(try_i64_from_u64(stock, "stock")?);
        }

        if let Some(is_active) = update.is_active {
            set.push("is_active = ").push_bind_unseparated(is_active);
        }

        set.push("updated_at = now()");
    }

    builder
        .push(" WHERE uuid = ")
        .push_bind(product.into_uuid())
        .push(" RETURNING ")
        .push(PRODUCT_COLUMNS);

    Ok(builder)
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            vendor_uuid: VendorUuid::from_uuid(row.try_get("vendor_uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            discount: try_get_optional_amount(row, "discount")?,
            stock: try_get_amount(row, "stock")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn update_query_only_sets_present_fields() -> TestResult {
        let update = ProductUpdate {
            price: Some(20_00),
            ..ProductUpdate::default()
        };

        let builder = build_update_query(ProductUuid::new(), &update)?;

        assert_eq!(
            builder.sql(),
            format!(
                "UPDATE products SET price = $1, updated_at = now() WHERE uuid = $2 RETURNING {PRODUCT_COLUMNS}"
            )
        );

        Ok(())
    }

    #[test]
    fn update_query_binds_caller_values() -> TestResult {
        let update = ProductUpdate {
            name: Some("'; DROP TABLE products; --".to_string()),
            discount: Some(None),
            is_active: Some(false),
            ..ProductUpdate::default()
        };

        let builder = build_update_query(ProductUuid::new(), &update)?;
        let sql = builder.sql();

        assert!(!sql.contains("DROP TABLE"), "values must be bound: {sql}");
        assert!(sql.starts_with("UPDATE products SET name = $1, discount = $2, is_active = $3,"));

        Ok(())
    }

    #[test]
    fn update_query_rejects_out_of_range_price() {
        let update = ProductUpdate {
            price: Some(u64::MAX),
            ..ProductUpdate::default()
        };

        assert!(build_update_query(ProductUuid::new(), &update).is_err());
    }
}
