//! These structs provide the CLI interface for the txnview CLI.

use crate::config::Overrides;
use crate::model::TransactionFilter;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// txnview: browse, search and filter a list of financial transactions.
///
/// Transactions are fetched from a simulated backend, with a configurable latency and failure
/// rate, either from built-in sample data or from a CSV file with the columns
/// id,merchant,amount,date,category,type.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch the transactions, apply a filter and a search, and print the resulting list.
    ///
    /// A failed fetch is retried up to --retries times before the error screen is printed.
    List(ListArgs),
    /// Browse interactively. Each line read from stdin is one of:
    ///
    /// - `:filter all|income|expense` to change the type filter
    ///
    /// - `:refresh` to fetch again
    ///
    /// - `:quit` to exit
    ///
    /// - anything else replaces the search text (an empty line clears it)
    Browse(BrowseArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    /// The config file. Defaults to $CONFIG_DIR/txnview/config.json, which may be absent.
    #[arg(long, env = "TXNVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// A CSV file to read transactions from instead of the built-in data.
    #[arg(long, env = "TXNVIEW_DATA")]
    data: Option<PathBuf>,

    /// Simulated network latency of every fetch, in milliseconds.
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Probability, between 0 and 1, that a fetch fails.
    #[arg(long)]
    failure_rate: Option<f64>,

    /// How long the search text must be left alone before it is applied, in milliseconds.
    #[arg(long)]
    debounce_ms: Option<u64>,
}

impl Common {
    pub fn new(log_level: LevelFilter) -> Self {
        Self {
            log_level,
            config: None,
            data: None,
            latency_ms: None,
            failure_rate: None,
            debounce_ms: None,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    /// The config file that was asked for explicitly, if any.
    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Settings given on the command line that override the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            latency_ms: self.latency_ms,
            failure_rate: self.failure_rate,
            debounce_ms: self.debounce_ms,
            data_path: self.data.clone(),
        }
    }
}

/// (Not shown): Args for the `txnview list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Show only this type of transaction.
    #[arg(long, value_enum, default_value_t = TransactionFilter::All)]
    filter: TransactionFilter,

    /// Show only merchants containing this text, ignoring case.
    #[arg(long, default_value = "")]
    search: String,

    /// How many times to refresh after a failed fetch.
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Print the rows as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    pub fn new(filter: TransactionFilter, search: impl Into<String>, retries: u32) -> Self {
        Self {
            filter,
            search: search.into(),
            retries,
            json: false,
        }
    }

    pub fn filter(&self) -> TransactionFilter {
        self.filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// (Not shown): Args for the `txnview browse` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct BrowseArgs {
    /// The type filter to start with.
    #[arg(long, value_enum, default_value_t = TransactionFilter::All)]
    filter: TransactionFilter,
}

impl BrowseArgs {
    pub fn new(filter: TransactionFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> TransactionFilter {
        self.filter
    }
}

/// The default config file location, `$CONFIG_DIR/txnview/config.json`.
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("txnview").join("config.json"),
        None => {
            error!(
                "There was an error when trying to get your config directory. You can get around \
                this by providing --config or TXNVIEW_CONFIG. Default settings will be used.",
            );
            PathBuf::from("txnview.json")
        }
    }
}
