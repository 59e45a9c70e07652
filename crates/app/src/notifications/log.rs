//! Log-only delivery, used when no SMTP relay is configured.

use async_trait::async_trait;
use tracing::info;

use crate::notifications::{NotificationError, OrderConfirmation, OrderNotifier, format_amount};

#[derive(Debug, Clone, Default)]
pub struct LogOrderNotifier;

impl LogOrderNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrderNotifier for LogOrderNotifier {
    async fn send_order_confirmation(
        &self,
        confirmation: &OrderConfirmation,
    ) -> Result<(), NotificationError> {
        info!(
            email = %confirmation.email,
            order_uuid = %confirmation.order_uuid,
            total = %format_amount(confirmation.total_price),
            "order confirmation"
        );

        Ok(())
    }
}
