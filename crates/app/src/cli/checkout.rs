use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::{
        carts::records::CartUuid,
        checkout::{CheckoutService, records::Summary},
        users::UserUuid,
    },
    notifications::format_amount,
};

use super::{cart::print_cart, errors::checkout_error};

#[derive(Debug, Args)]
pub(crate) struct CheckoutCommand {
    #[command(subcommand)]
    command: CheckoutSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckoutSubcommand {
    /// Preview the cart total and shipping address
    Summary(SummaryArgs),

    /// Purchase the cart
    Confirm(ConfirmArgs),
}

#[derive(Debug, Args)]
struct SummaryArgs {
    /// Acting user
    #[arg(long)]
    user: UserUuid,

    #[arg(long)]
    cart: CartUuid,
}

#[derive(Debug, Args)]
struct ConfirmArgs {
    /// Acting user
    #[arg(long)]
    user: UserUuid,

    #[arg(long)]
    cart: CartUuid,

    /// Address the order confirmation is sent to
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(command: CheckoutCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        CheckoutSubcommand::Summary(args) => summary(args, ctx.checkout.as_ref()).await,
        CheckoutSubcommand::Confirm(args) => confirm(args, ctx.checkout.as_ref()).await,
    }
}

async fn summary(args: SummaryArgs, checkout: &dyn CheckoutService) -> Result<(), String> {
    let summary = checkout
        .get_summary(args.user, args.cart)
        .await
        .map_err(checkout_error)?;

    print_summary(&summary);

    Ok(())
}

async fn confirm(args: ConfirmArgs, checkout: &dyn CheckoutService) -> Result<(), String> {
    let confirmation = checkout
        .confirm_purchase(args.user, args.cart, args.email)
        .await
        .map_err(checkout_error)?;

    print_summary(&confirmation.summary);

    println!("order_uuid: {}", confirmation.order.uuid);
    println!("status: {}", confirmation.order.status);
    println!("order_total: {}", format_amount(confirmation.order.total_price));

    Ok(())
}

fn print_summary(summary: &Summary) {
    print_cart(&summary.cart);

    match &summary.shipping_address {
        Some(address) => println!("ship_to: {address}"),
        None => println!("ship_to: none"),
    }
}
