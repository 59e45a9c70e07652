use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::{
        carts::{
            data::{CartItemUpdate, NewCart, NewCartItem},
            records::{CartItemUuid, CartUuid, CartView},
        },
        products::records::ProductUuid,
        users::UserUuid,
    },
    notifications::format_amount,
};

use super::errors::cart_error;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    /// Acting user
    #[arg(long, global = true)]
    user: Option<UserUuid>,

    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Create the user's cart
    Create,

    /// Add a product, merging with an existing line
    Add(AddItemArgs),

    /// Set the quantity of a line
    Edit(EditItemArgs),

    /// Remove a line
    Remove(ItemArgs),

    /// Show the cart with its current total
    View(CartArgs),

    /// Remove every line
    Empty(CartArgs),
}

#[derive(Debug, Args)]
struct CartArgs {
    #[arg(long)]
    cart: CartUuid,
}

#[derive(Debug, Args)]
struct AddItemArgs {
    #[arg(long)]
    cart: CartUuid,

    #[arg(long)]
    product: ProductUuid,

    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct EditItemArgs {
    #[arg(long)]
    cart: CartUuid,

    #[arg(long)]
    item: CartItemUuid,

    #[arg(long)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct ItemArgs {
    #[arg(long)]
    cart: CartUuid,

    #[arg(long)]
    item: CartItemUuid,
}

pub(crate) async fn run(command: CartCommand, ctx: &AppContext) -> Result<(), String> {
    let user = command
        .user
        .ok_or_else(|| "missing required argument: --user".to_string())?;

    match command.command {
        CartSubcommand::Create => {
            let cart = ctx
                .carts
                .create_cart(
                    user,
                    NewCart {
                        uuid: CartUuid::new(),
                    },
                )
                .await
                .map_err(cart_error)?;

            println!("cart_uuid: {}", cart.uuid);
        }
        CartSubcommand::Add(args) => {
            let view = ctx
                .carts
                .add_item(
                    user,
                    args.cart,
                    NewCartItem {
                        product_uuid: args.product,
                        quantity: args.quantity,
                    },
                )
                .await
                .map_err(cart_error)?;

            print_cart(&view);
        }
        CartSubcommand::Edit(args) => {
            let item = ctx
                .carts
                .edit_item(
                    user,
                    args.cart,
                    args.item,
                    CartItemUpdate {
                        quantity: args.quantity,
                    },
                )
                .await
                .map_err(cart_error)?;

            println!("item_uuid: {}", item.uuid);
            println!("quantity: {}", item.quantity);
        }
        CartSubcommand::Remove(args) => {
            ctx.carts
                .remove_item(user, args.cart, args.item)
                .await
                .map_err(cart_error)?;

            println!("removed: {}", args.item);
        }
        CartSubcommand::View(args) => {
            let view = ctx
                .carts
                .get_cart(user, args.cart)
                .await
                .map_err(cart_error)?;

            print_cart(&view);
        }
        CartSubcommand::Empty(args) => {
            let removed = ctx
                .carts
                .empty_cart(user, args.cart)
                .await
                .map_err(cart_error)?;

            println!("removed_items: {removed}");
        }
    }

    Ok(())
}

pub(crate) fn print_cart(view: &CartView) {
    println!("cart_uuid: {}", view.cart.uuid);

    for line in &view.lines {
        println!(
            "item: {} {} x{} @ {} = {}",
            line.item_uuid,
            line.name,
            line.quantity,
            format_amount(line.unit_price()),
            line.line_total().map_or_else(|| "overflow".to_string(), format_amount),
        );
    }

    println!("total: {}", format_amount(view.total));
}
