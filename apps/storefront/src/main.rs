use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use catalog::StaticCatalog;
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::protocol::StoreAction;
use store_core::{spawn_store, StateStore, StorefrontHandle};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod script;

use config::{load_settings, Settings};
use script::parse_action;

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Drive the storefront cart state from the command line")]
struct Cli {
    /// JSON catalog to load instead of the built-in product list.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the loaded catalog.
    List,
    /// Apply actions in order and print the final snapshot.
    Run {
        #[arg(required = true, value_parser = parse_action)]
        actions: Vec<StoreAction>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(path) = cli.catalog {
        settings.catalog_path = Some(path);
    }

    let store = StateStore::new(Arc::new(open_catalog(&settings)?), settings.store_config());

    match cli.command {
        Command::List => print_json(store.products(), cli.pretty)?,
        Command::Run { actions } => {
            let (client, worker) = spawn_store(store);
            for action in actions {
                client.dispatch(action).await.with_context(|| {
                    format!("action {} was rejected", action.name())
                })?;
            }
            let snapshot = client.snapshot();
            drop(client);
            worker.await.context("store worker panicked")?;

            info!(
                version = snapshot.version,
                cart_lines = snapshot.cart.len(),
                total = %snapshot.totals.total,
                "script finished"
            );
            print_json(snapshot.as_ref(), cli.pretty)?;
        }
    }

    Ok(())
}

fn open_catalog(settings: &Settings) -> Result<StaticCatalog> {
    match &settings.catalog_path {
        Some(path) => StaticCatalog::from_json_file(path)
            .with_context(|| format!("failed to load catalog from '{}'", path.display())),
        None => StaticCatalog::builtin().context("built-in catalog is invalid"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
