//! Notification Config

use std::fmt;

use clap::Args;

use crate::domain::checkout::NotificationPolicy;

/// Order confirmation settings.
///
/// Without `SMTP_HOST`, confirmations are written to the log instead of mailed.
#[derive(Clone, Args)]
pub struct NotificationConfig {
    /// SMTP relay host
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// SMTP relay port
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// SMTP username
    #[arg(long, env = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Sender address for confirmations
    #[arg(long, env = "MAIL_FROM", default_value = "orders@localhost")]
    pub mail_from: String,

    /// Whether a failed confirmation aborts the purchase (required, best-effort)
    #[arg(
        long = "notification-policy",
        env = "NOTIFICATION_POLICY",
        value_enum,
        default_value_t = NotificationPolicy::Required
    )]
    pub policy: NotificationPolicy,
}

impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &self.smtp_password.as_ref().map(|_| "[REDACTED]"))
            .field("mail_from", &self.mail_from)
            .field("policy", &self.policy)
            .finish()
    }
}
