//! Backend creation and utility functions.

use std::path::PathBuf;

use sortable::{
    ConfigFile, SortableBackend, SortableConfig,
    backend::database::{InMemory, Postgres, Sqlite},
};

use crate::cli::{Backend, BackendConfig, TableArgs};

/// Redact credentials from a PostgreSQL connection URL for safe logging
pub fn redact_postgres_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut redacted = parsed.clone();
        if !parsed.username().is_empty() {
            let _ = redacted.set_username("***");
        }
        if parsed.password().is_some() {
            let _ = redacted.set_password(Some("***"));
        }
        redacted.to_string()
    } else {
        "postgres://***@<unparsable-url>".to_string()
    }
}

/// Human-readable label of the configured backend
pub fn backend_label(config: &BackendConfig) -> &'static str {
    match config.backend {
        Backend::Sqlite => "sqlite",
        Backend::Postgres => "postgres",
        Backend::Inmemory => "inmemory",
    }
}

fn data_dir(config: &BackendConfig) -> PathBuf {
    config.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// File backing an in-memory table
pub fn in_memory_path(args: &TableArgs) -> PathBuf {
    data_dir(&args.backend_config).join(format!("{}.json", args.table))
}

/// Create the appropriate backend for the table
pub async fn create_backend(
    args: &TableArgs,
) -> Result<Box<dyn SortableBackend>, Box<dyn std::error::Error>> {
    let config = &args.backend_config;
    let data_dir = data_dir(config);

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;

    match config.backend {
        Backend::Sqlite => {
            let db_path = data_dir.join("sortable.db");
            tracing::info!("Using SQLite backend at {}", db_path.display());
            let backend = Sqlite::open_sqlite(&db_path).await?;
            Ok(Box::new(backend.for_table(&args.table, &args.key_column)?))
        }
        Backend::Postgres => {
            let url = config
                .postgres_url
                .as_ref()
                .ok_or("PostgreSQL backend requires --postgres-url or SORTABLE_POSTGRES_URL")?;

            let display_url = redact_postgres_url(url);
            tracing::info!("Connecting to PostgreSQL backend at {}", display_url);

            match Postgres::connect_postgres(url).await {
                Ok(backend) => {
                    tracing::info!("Connected to PostgreSQL successfully");
                    Ok(Box::new(backend.for_table(&args.table, &args.key_column)?))
                }
                Err(e) => {
                    Err(format!("Failed to connect to PostgreSQL at {}: {}", display_url, e).into())
                }
            }
        }
        Backend::Inmemory => {
            let json_path = in_memory_path(args);
            tracing::info!(
                "Using in-memory backend with persistence at {}",
                json_path.display()
            );
            let backend = InMemory::load_from_file(&json_path, args.key_column.as_str()).await?;
            Ok(Box::new(backend))
        }
    }
}

/// Write an in-memory table back to its file. Other backends persist on
/// their own.
pub async fn persist(
    args: &TableArgs,
    backend: &dyn SortableBackend,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(in_memory) = backend.as_any().downcast_ref::<InMemory>() {
        let json_path = in_memory_path(args);
        in_memory.save_to_file(&json_path).await?;
        tracing::debug!("Saved table to {}", json_path.display());
    }
    Ok(())
}

/// Resolve the sortable configuration of the table
pub fn load_config(args: &TableArgs) -> Result<SortableConfig, Box<dyn std::error::Error>> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    Ok(file.config_for(&args.table)?)
}
