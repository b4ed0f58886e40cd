//! # Shelf CLI (`shelf`)
//!
//! Browse a storefront catalog from the terminal: list, filter by facet,
//! sort, and search.
//!
//! ## Usage
//!
//! ```bash
//! shelf --config ./config/shelf.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `shelf list` | Show the full catalog (sorted/searched) |
//! | `shelf filter` | Apply brand/color/price facets through the product service |
//! | `shelf reset` | Forget the saved filter and show the full catalog |
//! | `shelf state` | Print the saved filter and sort |
//! | `shelf facets` | Print the facet label → code table |
//! | `shelf completions <shell>` | Generate shell completions |
//!
//! ## Examples
//!
//! ```bash
//! shelf list --sort price --order desc
//! shelf filter --brand 나이키 --price "10만원 - 20만원" --search air
//! shelf list --saved
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelf::browse::{self, BrowseOptions};
use shelf::config;
use shelf::render;
use shelf::shelf_core::models::{SortField, SortOrder, SortState};

/// Shelf: storefront catalog filter, sort, and search.
#[derive(Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/shelf.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Sort and search flags shared by `list` and `filter`.
#[derive(clap::Args, Debug, Clone)]
struct ViewArgs {
    /// Sort field: none, name, likeCount, or price.
    #[arg(long)]
    sort: Option<SortField>,

    /// Sort direction: asc or desc.
    #[arg(long, default_value = "asc")]
    order: SortOrder,

    /// Case-insensitive substring matched against product names.
    #[arg(long)]
    search: Option<String>,

    /// Print the view as JSON.
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    fn into_options(self) -> BrowseOptions {
        BrowseOptions {
            sort: self.sort.map(|field| SortState::new(field, self.order)),
            search: self.search,
            json: self.json,
            ..BrowseOptions::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full catalog.
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// Re-apply the filter and sort saved by the last `filter`.
        #[arg(long)]
        saved: bool,
    },

    /// Filter the catalog by facet labels.
    ///
    /// Labels are translated to service codes before the request
    /// (unknown brands become `Others`, unknown colors are upper-cased).
    /// With no labels this behaves like `reset`.
    Filter {
        /// Brand label (repeatable).
        #[arg(long = "brand")]
        brands: Vec<String>,

        /// Color label (repeatable).
        #[arg(long = "color")]
        colors: Vec<String>,

        /// Price bucket label, e.g. "10만원 - 20만원" (repeatable).
        #[arg(long = "price")]
        prices: Vec<String>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Forget the saved filter and sort, then show the full catalog.
    Reset {
        /// Print the view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the saved filter and sort.
    State,

    /// Print the facet label → code table.
    Facets,

    /// Generate shell completions.
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Commands that don't require config
    match &cli.command {
        Commands::Facets => {
            render::print_facet_table();
            return Ok(());
        }
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "shelf", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::List { view, saved } => {
            browse::run_list(&cfg, &view.into_options(), saved).await?;
        }
        Commands::Filter {
            brands,
            colors,
            prices,
            view,
        } => {
            let opts = BrowseOptions {
                brands,
                colors,
                prices,
                ..view.into_options()
            };
            browse::run_filter(&cfg, &opts).await?;
        }
        Commands::Reset { json } => {
            browse::run_reset(&cfg, json).await?;
        }
        Commands::State => {
            browse::run_state(&cfg)?;
        }
        Commands::Facets | Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
