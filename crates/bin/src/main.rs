use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod output;

mod commands {
    pub mod config;
    pub mod init;
    pub mod rows;
}

use cli::{Cli, Commands};
use output::OutputFormat;

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sortable=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let result = match &cli.command {
        Commands::Init(args) => commands::init::run(args, format).await,
        Commands::Add(args) => commands::rows::add(args, format).await,
        Commands::Move(args) => commands::rows::move_row(args, format).await,
        Commands::Remove(args) => commands::rows::remove(args, format).await,
        Commands::List(args) => commands::rows::list(args, format).await,
        Commands::Config(args) => commands::config::run(args, format).await,
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
