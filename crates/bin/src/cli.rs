//! CLI argument definitions for the sortable binary.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use sortable::Value;

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// SQLite database (default)
    Sqlite,
    /// PostgreSQL database
    Postgres,
    /// In-memory with JSON persistence (for development and experiments)
    Inmemory,
}

/// Sortable table tool
#[derive(Parser, Debug)]
#[command(name = "sortable")]
#[command(about = "Sortable: keep dense, group-scoped positions in a table")]
#[command(version)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the table with its position and group columns
    Init(InitArgs),
    /// Create a row at the position the configuration dictates
    Add(AddArgs),
    /// Change a row's attributes, moving it if a group column changes
    Move(MoveArgs),
    /// Delete a row and close the gap it leaves
    Remove(RemoveArgs),
    /// List rows by group and position
    List(ListArgs),
    /// Show the resolved configuration of the table
    Config(ConfigArgs),
}

/// Shared backend configuration arguments
#[derive(clap::Args, Debug, Clone)]
pub struct BackendConfig {
    /// Storage backend to use
    #[arg(short, long, default_value = "sqlite", env = "SORTABLE_BACKEND")]
    pub backend: Backend,

    /// Data directory for storage files.
    /// For SQLite: stores sortable.db
    /// For InMemory: stores <table>.json
    #[arg(short = 'D', long, env = "SORTABLE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// PostgreSQL connection URL (required when backend=postgres)
    #[arg(long, env = "SORTABLE_POSTGRES_URL")]
    pub postgres_url: Option<String>,
}

/// The table a command works on and how it is ordered
#[derive(clap::Args, Debug, Clone)]
pub struct TableArgs {
    #[command(flatten)]
    pub backend_config: BackendConfig,

    /// Table name, also the model name looked up in the config file
    #[arg(short, long, default_value = "items", env = "SORTABLE_TABLE")]
    pub table: String,

    /// Primary key column
    #[arg(long, default_value = "id")]
    pub key_column: String,

    /// JSON config file with `defaults` and per-table `models` sections
    #[arg(short, long, env = "SORTABLE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for the init command
#[derive(clap::Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Group or payload column to create as an integer column
    #[arg(long = "integer", value_name = "COL")]
    pub integer_columns: Vec<String>,

    /// Payload column to create alongside the ordering columns
    #[arg(long = "column", value_name = "COL")]
    pub extra_columns: Vec<String>,
}

/// Arguments for the add command
#[derive(clap::Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Attribute of the new row
    #[arg(short, long = "set", value_name = "COL=VAL")]
    pub assignments: Vec<Assignment>,
}

/// Arguments for the move command
#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Key of the row to change
    pub key: String,

    /// Attribute to change
    #[arg(short, long = "set", value_name = "COL=VAL", required = true)]
    pub assignments: Vec<Assignment>,
}

/// Arguments for the remove command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Key of the row to delete
    pub key: String,
}

/// Arguments for the list command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Only list rows with this attribute value
    #[arg(short, long = "where", value_name = "COL=VAL")]
    pub filters: Vec<Assignment>,

    /// List positions in descending order
    #[arg(long)]
    pub desc: bool,
}

/// Arguments for the config command
#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Show only this setting
    pub key: Option<String>,
}

/// A `COL=VAL` pair from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected COL=VAL, got {s:?}"))?;
        if column.is_empty() {
            return Err(format!("missing column name in {s:?}"));
        }
        Ok(Self {
            column: column.to_string(),
            value: Value::parse_literal(value),
        })
    }
}
