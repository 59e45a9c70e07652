use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::{
        orders::records::{OrderRecord, OrderUuid},
        users::UserUuid,
    },
    notifications::format_amount,
};

use super::errors::order_error;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List the user's orders, newest first
    List(ListArgs),

    /// Show an order with its items
    Show(OrderArgs),

    /// Show the current status of an order
    Track(OrderArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Acting user
    #[arg(long)]
    user: UserUuid,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Acting user
    #[arg(long)]
    user: UserUuid,

    #[arg(long)]
    order: OrderUuid,
}

pub(crate) async fn run(command: OrdersCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List(args) => {
            let orders = ctx
                .orders
                .list_orders(args.user)
                .await
                .map_err(order_error)?;

            for order in &orders {
                println!(
                    "order: {} {} {} {}",
                    order.uuid,
                    order.ordered_at,
                    order.status,
                    format_amount(order.total_price),
                );
            }
        }
        OrdersSubcommand::Show(args) => {
            let order = ctx
                .orders
                .get_order(args.user, args.order)
                .await
                .map_err(order_error)?;

            print_order(&order);
        }
        OrdersSubcommand::Track(args) => {
            let status = ctx
                .orders
                .track_order(args.user, args.order)
                .await
                .map_err(order_error)?;

            println!("order_uuid: {}", args.order);
            println!("status: {status}");
        }
    }

    Ok(())
}

fn print_order(order: &OrderRecord) {
    println!("order_uuid: {}", order.uuid);
    println!("ordered_at: {}", order.ordered_at);
    println!("status: {}", order.status);

    for item in &order.items {
        println!(
            "item: {} x{} @ {}",
            item.product_uuid,
            item.quantity,
            format_amount(item.unit_price),
        );
    }

    println!("total: {}", format_amount(order.total_price));
}
