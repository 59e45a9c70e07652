//! Test Helpers

use sqlx::{query, query_as, query_scalar};
use testresult::TestResult;

use crate::{
    domain::{
        carts::{
            CartsService, CartsServiceError,
            data::{NewCart, NewCartItem},
            records::{CartRecord, CartUuid, CartView},
        },
        checkout::CheckoutService,
        orders::records::OrderRecord,
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid, VendorUuid},
        },
        shipping::records::{ShippingAddress, ShippingAddressUuid},
        users::UserUuid,
        wishlists::records::{WishlistItemUuid, WishlistUuid},
    },
    test::TestContext,
};

pub(crate) async fn create_product(
    ctx: &TestContext,
    price: u64,
    discount: Option<u64>,
    stock: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    let uuid = ProductUuid::new();

    ctx.products
        .create_product(NewProduct {
            uuid,
            vendor_uuid: VendorUuid::new(),
            name: format!("Product {uuid}"),
            price,
            discount,
            stock,
            is_active: true,
        })
        .await
}

pub(crate) async fn create_cart(
    ctx: &TestContext,
    user: UserUuid,
) -> Result<CartRecord, CartsServiceError> {
    ctx.carts
        .create_cart(
            user,
            NewCart {
                uuid: CartUuid::new(),
            },
        )
        .await
}

pub(crate) async fn add_item(
    ctx: &TestContext,
    user: UserUuid,
    cart: CartUuid,
    product: ProductUuid,
    quantity: u32,
) -> Result<CartView, CartsServiceError> {
    ctx.carts
        .add_item(
            user,
            cart,
            NewCartItem {
                product_uuid: product,
                quantity,
            },
        )
        .await
}

/// Insert a wishlist holding one item per product.
pub(crate) async fn create_wishlist(
    ctx: &TestContext,
    user: UserUuid,
    products: &[ProductUuid],
) -> Result<(WishlistUuid, Vec<WishlistItemUuid>), sqlx::Error> {
    let wishlist = WishlistUuid::new();

    query("INSERT INTO wishlists (uuid, user_uuid, name) VALUES ($1, $2, 'Saved')")
        .bind(wishlist.into_uuid())
        .bind(user.into_uuid())
        .execute(ctx.db.pool())
        .await?;

    let mut items = Vec::with_capacity(products.len());

    for product in products {
        let item = WishlistItemUuid::new();

        query(
            "INSERT INTO wishlist_items (uuid, wishlist_uuid, product_uuid) VALUES ($1, $2, $3)",
        )
        .bind(item.into_uuid())
        .bind(wishlist.into_uuid())
        .bind(product.into_uuid())
        .execute(ctx.db.pool())
        .await?;

        items.push(item);
    }

    Ok((wishlist, items))
}

pub(crate) async fn create_default_address(
    ctx: &TestContext,
    user: UserUuid,
) -> Result<ShippingAddress, sqlx::Error> {
    let address = ShippingAddress {
        uuid: ShippingAddressUuid::new(),
        user_uuid: user,
        address_line1: "1 Main St".to_string(),
        address_line2: Some("Apt 2".to_string()),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "US".to_string(),
    };

    query(
        "INSERT INTO shipping_addresses \
           (uuid, user_uuid, address_line1, address_line2, city, state, postal_code, country, is_default) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)",
    )
    .bind(address.uuid.into_uuid())
    .bind(user.into_uuid())
    .bind(&address.address_line1)
    .bind(&address.address_line2)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.postal_code)
    .bind(&address.country)
    .execute(ctx.db.pool())
    .await?;

    Ok(address)
}

/// Check out a fresh cart holding `lines` for `user`, creating the cart and address if needed.
pub(crate) async fn place_order(
    ctx: &TestContext,
    user: UserUuid,
    lines: &[(ProductUuid, u32)],
) -> TestResult<OrderRecord> {
    let cart = match ctx.carts.find_cart_for_user(user).await? {
        Some(cart) => cart,
        None => {
            create_default_address(ctx, user).await?;
            create_cart(ctx, user).await?
        }
    };

    for (product, quantity) in lines {
        add_item(ctx, user, cart.uuid, *product, *quantity).await?;
    }

    let confirmation = ctx
        .checkout
        .confirm_purchase(user, cart.uuid, "buyer@example.com".to_string())
        .await?;

    Ok(confirmation.order)
}

pub(crate) async fn stock_of(ctx: &TestContext, product: ProductUuid) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT stock FROM products WHERE uuid = $1")
        .bind(product.into_uuid())
        .fetch_one(ctx.db.pool())
        .await
}

pub(crate) async fn count_rows(ctx: &TestContext, table: &str) -> Result<i64, sqlx::Error> {
    query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(ctx.db.pool())
        .await
}

/// Row counts and sums across every table a checkout touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TableState {
    pub orders: i64,
    pub order_items: i64,
    pub cart_items: i64,
    pub cart_quantity: i64,
    pub stock: i64,
}

pub(crate) async fn table_state(ctx: &TestContext) -> Result<TableState, sqlx::Error> {
    let (orders, order_items, cart_items, cart_quantity, stock): (i64, i64, i64, i64, i64) =
        query_as(
            "SELECT \
               (SELECT COUNT(*) FROM orders), \
               (SELECT COUNT(*) FROM order_items), \
               (SELECT COUNT(*) FROM cart_items), \
               (SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM cart_items), \
               (SELECT COALESCE(SUM(stock), 0)::BIGINT FROM products)",
        )
        .fetch_one(ctx.db.pool())
        .await?;

    Ok(TableState {
        orders,
        order_items,
        cart_items,
        cart_quantity,
        stock,
    })
}

/// Make every `event` (`INSERT`, `UPDATE` or `DELETE`) on `table` raise an error.
pub(crate) async fn install_failing_trigger(
    ctx: &TestContext,
    table: &str,
    event: &str,
) -> Result<(), sqlx::Error> {
    query(
        "CREATE OR REPLACE FUNCTION fail_injected() RETURNS trigger \
         LANGUAGE plpgsql AS $$ BEGIN RAISE EXCEPTION 'injected failure'; END $$",
    )
    .execute(ctx.db.pool())
    .await?;

    let trigger = format!("fail_{}_{}", table, event.to_lowercase());

    query(&format!(
        "CREATE TRIGGER {trigger} BEFORE {event} ON {table} \
         FOR EACH ROW EXECUTE FUNCTION fail_injected()"
    ))
    .execute(ctx.db.pool())
    .await?;

    Ok(())
}
