//! Order Notifications
//!
//! Confirmation messages sent once an order has been placed. Delivery happens through an
//! [`OrderNotifier`]; which implementation runs is decided at startup.

use async_trait::async_trait;
use jiff::Timestamp;
use lettre::transport::smtp::Error as SmtpError;
use mockall::automock;
use thiserror::Error;

use crate::domain::orders::records::OrderUuid;

mod log;
mod smtp;

pub use log::LogOrderNotifier;
pub use smtp::SmtpOrderNotifier;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build the message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
}

/// Everything a confirmation message needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub email: String,
    pub order_uuid: OrderUuid,
    pub ordered_at: Timestamp,
    pub total_price: u64,
}

impl OrderConfirmation {
    pub fn subject(&self) -> String {
        format!("Order confirmation {}", self.order_uuid)
    }

    pub fn body(&self) -> String {
        format!(
            "Thank you for your purchase.\n\n\
             Order: {}\n\
             Placed: {}\n\
             Total: {}\n",
            self.order_uuid,
            self.ordered_at.strftime("%Y-%m-%d %H:%M:%S UTC"),
            format_amount(self.total_price),
        )
    }
}

/// Render minor units as a decimal amount, e.g. `2999` as `29.99`.
pub fn format_amount(minor_units: u64) -> String {
    format!("{}.{:02}", minor_units / 100, minor_units % 100)
}

#[automock]
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Deliver a confirmation for a placed order.
    async fn send_order_confirmation(
        &self,
        confirmation: &OrderConfirmation,
    ) -> Result<(), NotificationError>;
}
