//! Shopfront CLI - browse the catalog and shop from a local profile.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! shopfront products --category mobiles --sort rating_desc
//! shopfront product 12
//!
//! # Identity
//! shopfront signup -n "Asha Rao" -e asha@example.com -p secret1
//! shopfront whoami
//!
//! # Shop
//! shopfront cart add 12
//! shopfront checkout --name "Asha Rao" --city Pune --state MH --postal-code 411001
//! ```
//!
//! The profile lives in `--data-dir` (or `STOREFRONT_DATA_DIR`, default
//! `.shopfront`) and is shared with the storefront server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use shopfront_core::{ProductId, ReviewDraft, ShippingAddress, SortKey};
use shopfront_storefront::config::CatalogConfig;

mod commands;

use commands::Context;
use commands::catalog::ListOptions;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront command-line storefront")]
struct Cli {
    /// Profile directory
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".shopfront")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Category (mobiles, laptops, fashion, ...; "all" for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Text to search in name, description and brand
        #[arg(short, long)]
        search: Option<String>,

        /// Brand to include (repeatable)
        #[arg(short, long = "brand")]
        brands: Vec<String>,

        /// Lowest price in rupees
        #[arg(long)]
        min_price: Option<u64>,

        /// Highest price in rupees
        #[arg(long)]
        max_price: Option<u64>,

        /// Sort order (relevance, price_asc, price_desc, name_asc, name_desc, rating_desc, newest)
        #[arg(long, default_value = "relevance")]
        sort: SortKey,
    },
    /// Show one product
    Product { id: ProductId },
    /// Register and sign in
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the cart
    Checkout {
        #[arg(long)]
        name: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        state: String,

        #[arg(long, alias = "pincode")]
        postal_code: String,
    },
    /// List past orders
    Orders,
    /// Read or write product reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove every entry of a product
    Remove { id: ProductId },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Add a review
    Add {
        id: ProductId,

        #[arg(short, long)]
        name: String,

        /// 1 to 5, default 5
        #[arg(short, long)]
        rating: Option<u8>,

        #[arg(short, long)]
        comment: String,
    },
    /// List reviews, newest first
    List { id: ProductId },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Add or remove a product
    Toggle { id: ProductId },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "shopfront_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        let _ = writeln!(std::io::stderr(), "error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CatalogConfig::from_env()?;
    let mut ctx = Context::open(&cli.data_dir, &catalog)?;
    let stdout = std::io::stdout();
    let out = &mut stdout.lock();

    match cli.command {
        Commands::Products {
            category,
            search,
            brands,
            min_price,
            max_price,
            sort,
        } => {
            let options = ListOptions {
                category,
                search,
                brands,
                min_price,
                max_price,
                sort,
            };
            commands::catalog::list(&ctx, &options, out).await?;
        }
        Commands::Product { id } => commands::catalog::show(&ctx, id, out).await?,
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let password = SecretString::from(password);
            commands::account::signup(&mut ctx, &name, &email, &password, out)?;
        }
        Commands::Login { email, password } => {
            let password = SecretString::from(password);
            commands::account::login(&mut ctx, &email, &password, out)?;
        }
        Commands::Logout => commands::account::logout(&mut ctx, out)?,
        Commands::Whoami => commands::account::whoami(&ctx, out)?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::shop::show(&ctx, out)?,
            CartAction::Add { id, quantity } => commands::shop::add(&ctx, id, quantity, out).await?,
            CartAction::Remove { id } => commands::shop::remove(&ctx, id, out)?,
            CartAction::Clear => commands::shop::clear(&ctx, out)?,
        },
        Commands::Checkout {
            name,
            city,
            state,
            postal_code,
        } => {
            let address = ShippingAddress::new(name, city, state, postal_code);
            commands::shop::checkout(&ctx, address, out)?;
        }
        Commands::Orders => commands::shop::orders(&ctx, out)?,
        Commands::Review { action } => match action {
            ReviewAction::Add {
                id,
                name,
                rating,
                comment,
            } => {
                let draft = ReviewDraft {
                    name,
                    rating,
                    comment,
                };
                commands::community::add_review(&ctx, id, draft, out)?;
            }
            ReviewAction::List { id } => commands::community::list_reviews(&ctx, id, out)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::community::show_wishlist(&ctx, out).await?,
            WishlistAction::Toggle { id } => commands::community::toggle_wishlist(&ctx, id, out)?,
        },
    }
    Ok(())
}
