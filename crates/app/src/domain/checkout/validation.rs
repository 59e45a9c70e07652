//! Stock validation for a cart snapshot.

use rustc_hash::FxHashMap;

use crate::domain::{
    carts::records::CartLine,
    checkout::errors::CheckoutServiceError,
    products::records::ProductUuid,
    stock::StockLevels,
};

/// Check every line against the locked stock levels.
///
/// Quantities are summed per product before comparing, and the first offending line (in
/// cart order) is reported.
///
/// # Errors
///
/// - [`CheckoutServiceError::ProductGone`] when a product has no locked stock row.
/// - [`CheckoutServiceError::InsufficientStock`] when the requested total exceeds stock.
pub fn validate_lines(lines: &[CartLine], levels: &StockLevels) -> Result<(), CheckoutServiceError> {
    let mut requested: FxHashMap<ProductUuid, u64> = FxHashMap::default();

    for line in lines {
        *requested.entry(line.product_uuid).or_default() += u64::from(line.quantity);
    }

    for line in lines {
        let product = line.product_uuid;

        let available = levels
            .get(product)
            .ok_or(CheckoutServiceError::ProductGone { product })?;

        let requested = requested.get(&product).copied().unwrap_or_default();

        if requested > available {
            return Err(CheckoutServiceError::InsufficientStock {
                product,
                requested,
                available,
            });
        }
    }

    Ok(())
}
