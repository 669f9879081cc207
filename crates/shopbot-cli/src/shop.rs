//! Storefront command handlers for the CLI.
//!
//! The cart lives in the local storage file; payment and order submission go
//! to the shop backend configured by `SHOPBOT_STOREFRONT_API_URL`.

use clap::Subcommand;
use rust_decimal::Decimal;
use shopbot_core::{AppConfig, Cart, CustomerDetails, OrderCard, ProductId};
use shopbot_storefront::{CardDetails, CartStore, Storefront, StorefrontClient};

/// Sub-commands available under `shop`.
#[derive(Debug, Subcommand)]
pub enum ShopCommands {
    /// List products sold by the backend
    Products,
    /// Show the cart lines and total
    Cart,
    /// Add one unit of a product to the cart
    Add { product_id: ProductId },
    /// Remove one unit of a product from the cart
    Remove { product_id: ProductId },
    /// Set a cart line's quantity (0 removes it)
    Set { product_id: ProductId, quantity: u32 },
    /// Drop a cart line whatever its quantity
    Drop { product_id: ProductId },
    /// Empty the cart
    Clear {
        /// Also empty the cart kept by the backend
        #[arg(long)]
        remote: bool,
    },
    /// Show the cart lines recorded by the backend
    RemoteCart,
    /// Pay for the cart with a card
    Pay {
        #[arg(long)]
        card_number: String,
        #[arg(long)]
        card_holder: String,
        /// Expiry date as MM/YY
        #[arg(long = "expiry")]
        expiry_date: String,
        #[arg(long)]
        cvv: String,
    },
    /// Place an order for the cart
    Order {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        card_number: String,
        /// Expiry date as MM/YY
        #[arg(long = "expiry")]
        expiry_date: String,
        #[arg(long)]
        cvv: String,
    },
    /// List processed payments
    Payments,
}

pub(crate) async fn run_shop(config: &AppConfig, command: ShopCommands) -> anyhow::Result<()> {
    let mut shop = open_storefront(config)?;

    match command {
        ShopCommands::Products => {
            let products = shop.client().list_products().await?;
            if products.is_empty() {
                println!("no products available");
            }
            for p in products {
                println!("{:>4}  {:<24} {:>10}  {}", p.id, p.name, fmt_price(p.price), p.description);
            }
        }
        ShopCommands::Cart => print_cart(shop.cart()),
        ShopCommands::Add { product_id } => print_cart(shop.add_product(product_id).await?),
        ShopCommands::Remove { product_id } => print_cart(shop.remove_from_cart(product_id)?),
        ShopCommands::Set {
            product_id,
            quantity,
        } => print_cart(shop.set_quantity(product_id, quantity)?),
        ShopCommands::Drop { product_id } => print_cart(shop.remove_line(product_id)?),
        ShopCommands::Clear { remote: false } => print_cart(shop.clear_cart()?),
        ShopCommands::Clear { remote: true } => {
            let removed = shop.clear_cart_everywhere().await?;
            println!("removed {removed} backend cart lines");
            print_cart(shop.cart());
        }
        ShopCommands::RemoteCart => {
            let lines = shop.remote_cart().await?;
            if lines.is_empty() {
                println!("backend cart is empty");
            }
            for line in lines {
                println!(
                    "{:>4}  {:<24} {:>3} x {:>10}",
                    line.id,
                    line.product.name,
                    line.quantity,
                    fmt_price(line.product.price)
                );
            }
        }
        ShopCommands::Pay {
            card_number,
            card_holder,
            expiry_date,
            cvv,
        } => {
            let payment = shop
                .pay(CardDetails {
                    card_number,
                    card_holder,
                    expiry_date,
                    cvv,
                })
                .await?;
            println!(
                "payment {} for {}: {:?}",
                payment.id,
                fmt_price(payment.amount),
                payment.status
            );
        }
        ShopCommands::Order {
            full_name,
            email,
            address,
            card_number,
            expiry_date,
            cvv,
        } => {
            let receipt = shop
                .place_order(
                    CustomerDetails {
                        full_name,
                        email,
                        address,
                    },
                    OrderCard {
                        card_number,
                        expiry_date,
                        cvv,
                    },
                )
                .await?;
            println!(
                "order {} placed: {} items, total {}",
                receipt.id,
                receipt.item_count,
                fmt_price(receipt.total)
            );
        }
        ShopCommands::Payments => {
            let payments = shop.client().list_payments().await?;
            if payments.is_empty() {
                println!("no payments yet");
            }
            for p in payments {
                println!(
                    "{:>4}  {}  {:>10}  {}  {:?}",
                    p.id,
                    p.created_at.map_or_else(
                        || "-".to_owned(),
                        |at| at.format("%Y-%m-%d %H:%M").to_string()
                    ),
                    fmt_price(p.amount),
                    p.card_number,
                    p.status
                );
            }
        }
    }

    Ok(())
}

/// Prints the item count and total without contacting the backend.
pub(crate) fn run_cart_badge(config: &AppConfig) -> anyhow::Result<()> {
    let store = CartStore::open(&config.storage_path)?;
    println!("{}", badge(store.cart()));
    Ok(())
}

fn open_storefront(config: &AppConfig) -> anyhow::Result<Storefront> {
    let client = StorefrontClient::new(
        &config.storefront_api_url,
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    let store = CartStore::open(&config.storage_path)?;
    Ok(Storefront::new(client, store))
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }
    for line in cart.items() {
        println!(
            "{:>4}  {:<24} {:>3} x {:>10} = {:>10}",
            line.product_id(),
            line.product.name,
            line.quantity,
            fmt_price(line.product.price),
            fmt_price(line.line_total())
        );
    }
    println!("total: {}", fmt_price(cart.total()));
}

fn badge(cart: &Cart) -> String {
    format!("cart: {} items, {}", cart.item_count(), fmt_price(cart.total()))
}

fn fmt_price(price: Decimal) -> String {
    format!("{:.2}", price.round_dp(2))
}
