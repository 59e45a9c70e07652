use clap::{Parser, Subcommand};
use storefront_app::{config::AppConfig, context::AppContext, observability};

mod cart;
mod checkout;
mod db;
mod errors;
mod orders;
mod product;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront order processing", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Product(product::ProductCommand),
    Cart(cart::CartCommand),
    Wishlist(wishlist::WishlistCommand),
    Checkout(checkout::CheckoutCommand),
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_logging(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        match self.command {
            Commands::Db(command) => db::run(command, &self.config).await,
            Commands::Product(command) => {
                product::run(command, &context(&self.config).await?).await
            }
            Commands::Cart(command) => {
                cart::run(command, &context(&self.config).await?).await
            }
            Commands::Wishlist(command) => {
                wishlist::run(command, &context(&self.config).await?).await
            }
            Commands::Checkout(command) => {
                checkout::run(command, &context(&self.config).await?).await
            }
            Commands::Orders(command) => {
                orders::run(command, &context(&self.config).await?).await
            }
        }
    }
}

async fn context(config: &AppConfig) -> Result<AppContext, String> {
    AppContext::from_config(config)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))
}
