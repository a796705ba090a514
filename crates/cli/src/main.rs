//! Bloom CLI - Shop from the terminal against a storefront data directory.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog, cheapest first
//! bloom catalog --sort price
//!
//! # Fill the cart
//! bloom cart add rose-1 -q 2
//! bloom cart update rose-1 3
//! bloom cart show
//!
//! # Check out
//! bloom checkout --name "Ivy Green" --email ivy@example.com --phone 555-0100 --address "1 Fern Lane"
//!
//! # Review orders
//! bloom orders list
//! bloom orders show 1718020800000
//! ```
//!
//! The data directory defaults to `STOREFRONT_DATA_DIR` (or `.bloom`), so the
//! CLI and a running storefront server see the same cart and order log.
//! Don't point both at the same directory at the same time.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "bloom")]
#[command(author, version, about = "Bloom storefront CLI")]
struct Cli {
    /// Data directory (overrides `STOREFRONT_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog items
    Catalog {
        /// Only items from this shop
        #[arg(long)]
        shop: Option<String>,

        /// Sort key
        #[arg(long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,

        /// Sort descending (newest or most expensive first)
        #[arg(long)]
        desc: bool,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit the cart as an order
    Checkout {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
    },
    /// Browse order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage favorite items
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Price,
    Date,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and total
    Show,
    /// Add an item
    Add {
        item_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set an item's quantity (0 or less removes it)
    Update {
        item_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove an item
    Remove { item_id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List,
    /// Show one order
    Show { order_id: String },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite items
    List,
    /// Favorite or unfavorite an item
    Toggle { item_id: String },
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bloom=info,bloom_storefront=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CliError> {
    let mut session = commands::open(cli.data_dir)?;

    match cli.command {
        Commands::Catalog { shop, sort, desc } => {
            commands::catalog::list(&session, shop, sort.into(), desc);
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&session),
            CartAction::Add { item_id, quantity } => {
                commands::cart::add(&mut session, &item_id.into(), quantity)?;
            }
            CartAction::Update { item_id, quantity } => {
                commands::cart::update(&mut session, &item_id.into(), quantity)?;
            }
            CartAction::Remove { item_id } => {
                commands::cart::remove(&mut session, &item_id.into())?;
            }
            CartAction::Clear => commands::cart::clear(&mut session)?,
        },
        Commands::Checkout {
            name,
            email,
            phone,
            address,
        } => {
            let form = bloom_core::ContactForm {
                name,
                email,
                phone,
                address,
            };
            commands::orders::checkout(&mut session, &form)?;
        }
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&session)?,
            OrdersAction::Show { order_id } => commands::orders::show(&session, &order_id.into())?,
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list(&session),
            FavoritesAction::Toggle { item_id } => {
                commands::favorites::toggle(&mut session, &item_id.into())?;
            }
        },
    }
    Ok(())
}

impl From<SortArg> for bloom_storefront::catalog::SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Price => Self::Price,
            SortArg::Date => Self::Date,
        }
    }
}
