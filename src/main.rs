//! Storefront CLI
//!
//! Loads a catalog, fills a cart with products by id and prints it. Use
//! `--checkout` to place the order and print the order history.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use jiff::Zoned;
use storefront::{
    catalog::Catalog,
    checkout::{write_cart_table, write_order_table, write_summary},
    config::StoreConfig,
    store::CartStore,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart CLI", long_about = None)]
struct Cli {
    /// Catalog fixture file
    #[arg(
        long,
        env = "STOREFRONT_CATALOG",
        default_value = "fixtures/catalog.yml"
    )]
    catalog: PathBuf,

    /// Store configuration file; built-in defaults when omitted
    #[arg(long, env = "STOREFRONT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List catalog products
    Products(ProductsArgs),

    /// Add products to a cart and print it
    Cart(CartArgs),
}

#[derive(Debug, Args)]
struct ProductsArgs {
    /// Only show products matching this text
    #[arg(short, long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct CartArgs {
    /// Product ids to add, in order; repeat an id to add it again
    #[arg(required = true)]
    ids: Vec<i64>,

    /// Set a quantity as `ID=QTY`; zero or below removes the line
    #[arg(short = 'q', long = "quantity", value_parser = parse_quantity)]
    quantities: Vec<(i64, i64)>,

    /// Place the order and print the order history
    #[arg(long)]
    checkout: bool,
}

fn parse_quantity(s: &str) -> Result<(i64, i64), String> {
    let (id, quantity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=QTY, got {s}"))?;

    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("invalid product id {id}: {err}"))?;

    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("invalid quantity {quantity}: {err}"))?;

    Ok((id, quantity))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = Catalog::from_path(&cli.catalog)
        .with_context(|| format!("failed to load catalog {}", cli.catalog.display()))?;

    let config = match &cli.config {
        Some(path) => StoreConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => StoreConfig::default(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Products(args) => list_products(&mut out, &catalog, args.search.as_deref()),
        Commands::Cart(args) => fill_cart(&mut out, &catalog, config, args),
    }
}

fn list_products(out: &mut impl Write, catalog: &Catalog, search: Option<&str>) -> Result<()> {
    for product in catalog.search(search.unwrap_or_default()) {
        writeln!(
            out,
            "{:>5}  {} {:<40} {:>10}  {}",
            product.id, product.image, product.name, product.price, product.category
        )?;
    }

    Ok(())
}

fn fill_cart(
    out: &mut impl Write,
    catalog: &Catalog,
    config: StoreConfig,
    args: CartArgs,
) -> Result<()> {
    let mut store = CartStore::new(config);

    store.subscribe_fn(|event, snapshot| {
        debug!(
            ?event,
            items = snapshot.total_items(),
            subtotal = %snapshot.total_price(),
            "store changed"
        );
    });

    for id in args.ids {
        let Some(product) = catalog.get(id) else {
            bail!("no product with id {id} in the catalog");
        };

        store.add_item(product.clone());
    }

    for (id, quantity) in args.quantities {
        store.update_quantity(id, quantity);
    }

    write_cart_table(out, store.items())?;
    write_summary(out, &store.checkout_summary())?;

    if args.checkout {
        let date = Zoned::now().strftime("%d/%m/%Y").to_string();

        match store.checkout(date) {
            Some(id) => writeln!(out, "\nOrder {id} placed\n")?,
            None => writeln!(out, "\nCart is empty; nothing to check out\n")?,
        }

        write_order_table(out, store.order_history())?;
    }

    Ok(())
}
