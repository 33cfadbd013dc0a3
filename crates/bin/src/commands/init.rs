//! Table creation command.

use sortable::backend::database::{
    SqlxBackend,
    sql::schema::{self, ColumnType, TableSpec},
};

use crate::backend::{backend_label, create_backend, in_memory_path, load_config, persist};
use crate::cli::InitArgs;
use crate::output::OutputFormat;

/// Run the init command
pub async fn run(args: &InitArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let table = &args.table;
    let config = load_config(table)?;
    let backend = create_backend(table).await?;

    let mut spec = TableSpec::for_config(&table.table, &table.key_column, &config);
    for column in &args.extra_columns {
        spec = spec.with_extra_column(column.as_str(), ColumnType::Text);
    }
    for column in &args.integer_columns {
        spec = spec.with_column_type(column, ColumnType::Integer);
    }

    if let Some(sql) = backend.as_any().downcast_ref::<SqlxBackend>() {
        schema::create_table(sql, &spec).await?;
    } else {
        // In-memory tables have no schema; writing the file is enough
        persist(table, backend.as_ref()).await?;
        tracing::info!("Initialized {}", in_memory_path(table).display());
    }

    match format {
        OutputFormat::Human => {
            println!("Table:     {}", spec.table);
            println!("Backend:   {}", backend_label(&table.backend_config));
            println!("Position:  {}", spec.position_column);
            if !spec.group_columns.is_empty() {
                let groups: Vec<&str> = spec
                    .group_columns
                    .iter()
                    .map(|(c, _)| c.as_str())
                    .collect();
                println!("Group by:  {}", groups.join(", "));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&spec)?),
    }

    Ok(())
}
