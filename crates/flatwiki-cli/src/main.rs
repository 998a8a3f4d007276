//! # Flatwiki CLI
//!
//! Command-line interface for the Flatwiki page-store query engine.
//!
//! ## Commands
//!
//! - `flatwiki search <text>` - Full-text search across page bodies
//! - `flatwiki read <page>` - Print one page
//! - `flatwiki list` - List pages grouped by group
//! - `flatwiki resources` - List pages as addressable resources
//! - `flatwiki resource <uri>` - Read one page by resource URI
//! - `flatwiki tools` - Print the tool catalogue as JSON
//! - `flatwiki serve` - Answer JSON-lines tool calls on stdin/stdout
//! - `flatwiki config` - Show or write the configuration file
//!
//! ## Example Usage
//!
//! ```bash
//! # Point at a store and search it
//! WIKI_DIR=/var/lib/pmwiki/wiki.d flatwiki search "backup"
//!
//! # Read a page
//! flatwiki --store ./wiki.d read Main/HomePage
//!
//! # Serve tool calls to another process
//! flatwiki serve < requests.jsonl
//! ```

mod app;
mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Flatwiki - query a flat-file wiki store
#[derive(Parser)]
#[command(name = "flatwiki")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the page records
    #[arg(short, long, global = true, env = "WIKI_DIR")]
    store: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search page bodies for a substring
    Search {
        /// Text to search for
        query: String,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Read one page (Group/Page or Group.Page)
    Read {
        /// Page name
        page: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// List pages grouped by group
    #[command(alias = "ls")]
    List {
        /// Only list pages of this group
        #[arg(short, long)]
        group: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// List every page as a resource
    Resources {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Read one page by resource URI
    Resource {
        /// Resource URI (e.g., pmwiki://Main.HomePage)
        uri: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Print the tool catalogue as JSON
    Tools,

    /// Answer JSON-lines requests on stdin, one response per line on stdout
    Serve,

    /// Show the effective configuration
    Config {
        /// Write the configuration file instead of printing it
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => flatwiki_core::Config::load_from(path)?,
        None => flatwiki_core::Config::load()?,
    };

    // Setup logging; stdout is reserved for results
    let log_level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.general.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    let app = app::App::new(&config, cli.store.as_deref());

    // Execute command
    match cli.command {
        Commands::Search {
            query,
            case_sensitive,
            output,
        } => commands::search::run(&app, &query, case_sensitive, output),
        Commands::Read { page, output } => commands::read::run(&app, &page, output),
        Commands::List { group, output } => commands::list::run(&app, group.as_deref(), output),
        Commands::Resources { output } => commands::resources::list(&app, output),
        Commands::Resource { uri, output } => commands::resources::read(&app, &uri, output),
        Commands::Tools => commands::tools::run(),
        Commands::Serve => commands::serve::run(&app),
        Commands::Config { init } => commands::config::run(&config, cli.config.as_deref(), init),
    }
}
