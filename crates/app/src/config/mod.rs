//! Application configuration, read from CLI flags and the environment.

use clap::Args;

mod db;
mod notifications;
mod observability;

pub use db::DatabaseConfig;
pub use notifications::NotificationConfig;
pub use observability::{LogFormat, LoggingConfig};

/// Storefront configuration
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Order confirmation delivery settings.
    #[command(flatten)]
    pub notifications: NotificationConfig,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::domain::checkout::NotificationPolicy;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: AppConfig,
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_given() -> Result<(), clap::Error> {
        let cli = TestCli::try_parse_from(["storefront", "--database-url", "postgres://db/shop"])?;

        assert_eq!(cli.config.database.database_url, "postgres://db/shop");
        assert_eq!(cli.config.database.max_connections, 10);
        assert_eq!(cli.config.notifications.smtp_port, 587);
        assert_eq!(cli.config.notifications.policy, NotificationPolicy::Required);

        Ok(())
    }

    #[test]
    fn notification_policy_parses_kebab_case() -> Result<(), clap::Error> {
        let cli = TestCli::try_parse_from([
            "storefront",
            "--database-url",
            "postgres://db/shop",
            "--notification-policy",
            "best-effort",
        ])?;

        assert_eq!(cli.config.notifications.policy, NotificationPolicy::BestEffort);

        Ok(())
    }

    #[test]
    fn debug_output_redacts_smtp_password() -> Result<(), clap::Error> {
        let cli = TestCli::try_parse_from([
            "storefront",
            "--database-url",
            "postgres://db/shop",
            "--smtp-password",
            "hunter2",
        ])?;

        assert!(!format!("{:?}", cli.config).contains("hunter2"));

        Ok(())
    }
}
