//! Errors
//!
//! Stable, user-facing messages for every service error. Storage failures are logged and
//! reported generically.

use tracing::error;

use storefront_app::domain::{
    carts::CartsServiceError, checkout::CheckoutServiceError, orders::OrdersServiceError,
    products::ProductsServiceError, wishlists::WishlistsServiceError,
};

const INTERNAL_ERROR: &str = "internal error: the operation could not be completed";

pub(crate) fn product_error(error: ProductsServiceError) -> String {
    match error {
        ProductsServiceError::AlreadyExists => "conflict: product already exists".to_string(),
        ProductsServiceError::NotFound => "not found: product".to_string(),
        ProductsServiceError::NothingToUpdate => "invalid request: nothing to update".to_string(),
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData => "invalid request: product data".to_string(),
        ProductsServiceError::Sql(source) => {
            error!("product operation failed: {source}");

            INTERNAL_ERROR.to_string()
        }
    }
}

pub(crate) fn cart_error(error: CartsServiceError) -> String {
    match error {
        CartsServiceError::AlreadyExists => "conflict: user already has a cart".to_string(),
        CartsServiceError::NotFound => "not found: cart".to_string(),
        CartsServiceError::Unauthorized => "forbidden: cart belongs to another user".to_string(),
        CartsServiceError::ItemNotFound => "not found: cart item".to_string(),
        CartsServiceError::ProductNotFound(product) => format!("not found: product {product}"),
        CartsServiceError::InvalidQuantity => {
            "invalid request: quantity must be greater than zero".to_string()
        }
        CartsServiceError::InsufficientStock {
            product,
            requested,
            available,
        } => insufficient_stock(&product.to_string(), requested, available),
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => "invalid request: cart data".to_string(),
        CartsServiceError::Sql(source) => {
            error!("cart operation failed: {source}");

            INTERNAL_ERROR.to_string()
        }
    }
}

pub(crate) fn wishlist_error(error: WishlistsServiceError) -> String {
    match error {
        WishlistsServiceError::NotFound => "not found: wishlist".to_string(),
        WishlistsServiceError::Unauthorized => {
            "forbidden: wishlist belongs to another user".to_string()
        }
        WishlistsServiceError::CartNotFound => "not found: user has no cart".to_string(),
        WishlistsServiceError::ItemNotFound => "not found: wishlist item".to_string(),
        WishlistsServiceError::AlreadyExists
        | WishlistsServiceError::InvalidReference
        | WishlistsServiceError::MissingRequiredData
        | WishlistsServiceError::InvalidData => "invalid request: wishlist data".to_string(),
        WishlistsServiceError::Sql(source) => {
            error!("wishlist move failed: {source}");

            INTERNAL_ERROR.to_string()
        }
    }
}

pub(crate) fn checkout_error(error: CheckoutServiceError) -> String {
    match error {
        CheckoutServiceError::NotFound => "not found: cart".to_string(),
        CheckoutServiceError::Unauthorized => {
            "forbidden: cart belongs to another user".to_string()
        }
        CheckoutServiceError::EmptyCart => "invalid request: cart is empty".to_string(),
        CheckoutServiceError::ProductGone { product } => {
            format!("unavailable: product {product} no longer exists")
        }
        CheckoutServiceError::InsufficientStock {
            product,
            requested,
            available,
        } => insufficient_stock(&product.to_string(), requested, available),
        CheckoutServiceError::MissingShippingAddress => {
            "invalid request: no default shipping address".to_string()
        }
        CheckoutServiceError::Notification(source) => {
            error!("order confirmation failed: {source}");

            "unavailable: order confirmation could not be sent, nothing was purchased".to_string()
        }
        CheckoutServiceError::AlreadyExists
        | CheckoutServiceError::InvalidReference
        | CheckoutServiceError::MissingRequiredData
        | CheckoutServiceError::InvalidData => "invalid request: checkout data".to_string(),
        CheckoutServiceError::Sql(source) => {
            error!("checkout failed: {source}");

            INTERNAL_ERROR.to_string()
        }
    }
}

pub(crate) fn order_error(error: OrdersServiceError) -> String {
    match error {
        OrdersServiceError::NotFound => "not found: order".to_string(),
        OrdersServiceError::Unauthorized => "forbidden: order belongs to another user".to_string(),
        OrdersServiceError::AlreadyExists
        | OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => "invalid request: order data".to_string(),
        OrdersServiceError::Sql(source) => {
            error!("order lookup failed: {source}");

            INTERNAL_ERROR.to_string()
        }
    }
}

fn insufficient_stock(product: &str, requested: u64, available: u64) -> String {
    format!("insufficient stock: product {product} (requested {requested}, available {available})")
}
