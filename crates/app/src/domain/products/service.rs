//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[tracing::instrument(
        name = "products.service.get_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, vendor_uuid = %product.vendor_uuid),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, stock = created.stock, "created product");

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, update),
        fields(product_uuid = %product),
        err
    )]
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if update.is_empty() {
            return Err(ProductsServiceError::NothingToUpdate);
        }

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Applies a partial update to a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::records::VendorUuid,
        test::{TestContext, helpers::create_product},
    };

    use super::*;

    #[tokio::test]
    async fn create_product_returns_persisted_values() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(NewProduct {
                uuid,
                vendor_uuid: VendorUuid::new(),
                name: "Espresso Beans".to_string(),
                price: 12_50,
                discount: Some(1_50),
                stock: 40,
                is_active: true,
            })
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.price, 12_50);
        assert_eq!(product.discount, Some(1_50));
        assert_eq!(product.unit_price(), 11_00);
        assert_eq!(product.stock, 40);

        Ok(())
    }

    #[tokio::test]
    async fn create_product_with_discount_above_price_is_invalid() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                vendor_uuid: VendorUuid::new(),
                name: "Broken".to_string(),
                price: 5_00,
                discount: Some(6_00),
                stock: 1,
                is_active: true,
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_product_changes_only_given_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 10_00, Some(2_00), 7).await?;

        let updated = ctx
            .products
            .update_product(
                product.uuid,
                ProductUpdate {
                    price: Some(20_00),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.price, 20_00);
        assert_eq!(updated.discount, Some(2_00));
        assert_eq!(updated.stock, 7);
        assert_eq!(updated.name, product.name);

        Ok(())
    }

    #[tokio::test]
    async fn update_product_can_clear_discount() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 10_00, Some(2_00), 7).await?;

        let updated = ctx
            .products
            .update_product(
                product.uuid,
                ProductUpdate {
                    discount: Some(None),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.discount, None);

        Ok(())
    }

    #[tokio::test]
    async fn empty_update_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 10_00, None, 1).await?;

        let result = ctx
            .products
            .update_product(product.uuid, ProductUpdate::default())
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NothingToUpdate)),
            "expected NothingToUpdate, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .update_product(
                ProductUuid::new(),
                ProductUpdate {
                    stock: Some(3),
                    ..ProductUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn negative_stock_is_impossible() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 1_00, None, 1).await?;

        let result = sqlx::query("UPDATE products SET stock = -1 WHERE uuid = $1")
            .bind(product.uuid.into_uuid())
            .execute(ctx.db.pool())
            .await;

        assert!(result.is_err(), "stock check constraint should reject -1");

        Ok(())
    }
}
