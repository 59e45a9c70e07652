//! SMTP delivery via lettre.

use std::fmt;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use tracing::info;

use crate::{
    config::NotificationConfig,
    notifications::{NotificationError, OrderConfirmation, OrderNotifier},
};

#[derive(Clone)]
pub struct SmtpOrderNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl fmt::Debug for SmtpOrderNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpOrderNotifier")
            .field("from_address", &self.from_address)
            .finish_non_exhaustive()
    }
}

impl SmtpOrderNotifier {
    /// Build a STARTTLS transport for `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay cannot be configured.
    pub fn new(host: &str, config: &NotificationConfig) -> Result<Self, SmtpError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            from_address: config.mail_from.clone(),
        })
    }

    fn build_message(&self, confirmation: &OrderConfirmation) -> Result<Message, NotificationError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotificationError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(confirmation
                .email
                .parse()
                .map_err(|_| NotificationError::InvalidAddress(confirmation.email.clone()))?)
            .subject(confirmation.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(confirmation.body())?;

        Ok(message)
    }
}

#[async_trait]
impl OrderNotifier for SmtpOrderNotifier {
    #[tracing::instrument(
        name = "notifications.smtp.send_order_confirmation",
        skip(self, confirmation),
        fields(order_uuid = %confirmation.order_uuid),
        err
    )]
    async fn send_order_confirmation(
        &self,
        confirmation: &OrderConfirmation,
    ) -> Result<(), NotificationError> {
        let message = self.build_message(confirmation)?;

        self.mailer.send(message).await?;

        info!(order_uuid = %confirmation.order_uuid, "sent order confirmation");

        Ok(())
    }
}
