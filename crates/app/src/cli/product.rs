use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::products::{
        ProductsService,
        data::{NewProduct, ProductUpdate},
        records::{ProductRecord, ProductUuid, VendorUuid},
    },
    notifications::format_amount,
};

use super::errors::product_error;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Register a new product
    Create(CreateProductArgs),

    /// Show a product
    Show(ShowProductArgs),

    /// Change price, discount, stock or availability
    Update(UpdateProductArgs),
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Owning vendor; generated when omitted
    #[arg(long)]
    vendor: Option<VendorUuid>,

    /// Display name
    #[arg(long)]
    name: String,

    /// Price in minor units
    #[arg(long)]
    price: u64,

    /// Discount in minor units
    #[arg(long)]
    discount: Option<u64>,

    /// Units available
    #[arg(long, default_value_t = 0)]
    stock: u64,

    /// Create the product unlisted
    #[arg(long)]
    inactive: bool,
}

#[derive(Debug, Args)]
struct ShowProductArgs {
    #[arg(long)]
    product: ProductUuid,
}

#[derive(Debug, Args)]
struct UpdateProductArgs {
    #[arg(long)]
    product: ProductUuid,

    #[arg(long)]
    name: Option<String>,

    /// Price in minor units
    #[arg(long)]
    price: Option<u64>,

    /// Discount in minor units
    #[arg(long, conflicts_with = "clear_discount")]
    discount: Option<u64>,

    /// Remove the current discount
    #[arg(long)]
    clear_discount: bool,

    #[arg(long)]
    stock: Option<u64>,

    #[arg(long)]
    active: Option<bool>,
}

pub(crate) async fn run(command: ProductCommand, ctx: &AppContext) -> Result<(), String> {
    let product = match command.command {
        ProductSubcommand::Create(args) => create(args, ctx.products.as_ref()).await?,
        ProductSubcommand::Show(args) => ctx
            .products
            .get_product(args.product)
            .await
            .map_err(product_error)?,
        ProductSubcommand::Update(args) => update(args, ctx.products.as_ref()).await?,
    };

    print_product(&product);

    Ok(())
}

async fn create(
    args: CreateProductArgs,
    products: &dyn ProductsService,
) -> Result<ProductRecord, String> {
    products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            vendor_uuid: args.vendor.unwrap_or_else(VendorUuid::new),
            name: args.name,
            price: args.price,
            discount: args.discount,
            stock: args.stock,
            is_active: !args.inactive,
        })
        .await
        .map_err(product_error)
}

async fn update(
    args: UpdateProductArgs,
    products: &dyn ProductsService,
) -> Result<ProductRecord, String> {
    let discount = if args.clear_discount {
        Some(None)
    } else {
        args.discount.map(Some)
    };

    products
        .update_product(
            args.product,
            ProductUpdate {
                name: args.name,
                price: args.price,
                discount,
                stock: args.stock,
                is_active: args.active,
            },
        )
        .await
        .map_err(product_error)
}

fn print_product(product: &ProductRecord) {
    println!("product_uuid: {}", product.uuid);
    println!("vendor_uuid: {}", product.vendor_uuid);
    println!("name: {}", product.name);
    println!("price: {}", format_amount(product.price));

    if let Some(discount) = product.discount {
        println!("discount: {}", format_amount(discount));
    }

    println!("stock: {}", product.stock);
    println!("active: {}", product.is_active);
}
