use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::{
        users::UserUuid,
        wishlists::records::{WishlistItemUuid, WishlistUuid},
    },
};

use super::errors::wishlist_error;

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    /// Move wishlist items into the user's cart
    Move(MoveArgs),
}

#[derive(Debug, Args)]
struct MoveArgs {
    /// Acting user
    #[arg(long)]
    user: UserUuid,

    #[arg(long)]
    wishlist: WishlistUuid,

    /// Move only this item; every item is moved when omitted
    #[arg(long)]
    item: Option<WishlistItemUuid>,
}

pub(crate) async fn run(command: WishlistCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        WishlistSubcommand::Move(args) => {
            let summary = match args.item {
                Some(item) => ctx.wishlists.move_item(args.user, args.wishlist, item).await,
                None => ctx.wishlists.move_all(args.user, args.wishlist).await,
            }
            .map_err(wishlist_error)?;

            println!("cart_uuid: {}", summary.cart_uuid);
            println!("moved: {}", summary.moved);
        }
    }

    Ok(())
}
