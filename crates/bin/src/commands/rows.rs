//! Row commands: add, move, remove and list.
//!
//! Every mutation goes through a [`Collection`], so positions stay dense
//! exactly as they would for a host application.

use sortable::{Collection, Direction, GroupScope, Row, SortableBackend, Value};

use crate::backend::{create_backend, load_config, persist};
use crate::cli::{AddArgs, ListArgs, MoveArgs, RemoveArgs, TableArgs};
use crate::output::{OutputFormat, print_row, print_rows};

type CliCollection = Collection<Box<dyn SortableBackend>>;

async fn open(args: &TableArgs) -> Result<CliCollection, Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let backend = create_backend(args).await?;
    Ok(Collection::new(backend, config))
}

async fn find(
    collection: &CliCollection,
    args: &TableArgs,
    key: &str,
) -> Result<Row, Box<dyn std::error::Error>> {
    let key = Value::parse_literal(key);
    collection
        .find(&key)
        .await?
        .ok_or_else(|| format!("No row with {} = {key} in {}", args.key_column, args.table).into())
}

/// Run the add command
pub async fn add(args: &AddArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let collection = open(&args.table).await?;

    let mut row = Row::new(args.table.key_column.as_str());
    for assignment in &args.assignments {
        row.set(assignment.column.as_str(), assignment.value.clone());
    }
    let row = collection.create(row).await?;
    persist(&args.table, collection.backend().as_ref()).await?;

    print_row(&row, collection.config(), &args.table.key_column, format)
}

/// Run the move command
pub async fn move_row(
    args: &MoveArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let collection = open(&args.table).await?;

    let mut row = find(&collection, &args.table, &args.key).await?;
    let from = collection.group_of(&row);
    for assignment in &args.assignments {
        row.set(assignment.column.as_str(), assignment.value.clone());
    }
    collection.save(&mut row).await?;
    persist(&args.table, collection.backend().as_ref()).await?;

    let to = collection.group_of(&row);
    if from != to {
        tracing::info!(key = %args.key, %from, %to, "Moved row to another group");
    }
    print_row(&row, collection.config(), &args.table.key_column, format)
}

/// Run the remove command
pub async fn remove(
    args: &RemoveArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let collection = open(&args.table).await?;

    let row = find(&collection, &args.table, &args.key).await?;
    collection.delete(&row).await?;
    persist(&args.table, collection.backend().as_ref()).await?;

    match format {
        OutputFormat::Human => println!("Removed {} {}", args.table.key_column, args.key),
        OutputFormat::Json => println!("{}", serde_json::to_string(row.attributes())?),
    }
    Ok(())
}

/// Run the list command
pub async fn list(args: &ListArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let collection = open(&args.table).await?;
    let direction = if args.desc {
        Direction::Desc
    } else {
        Direction::Asc
    };

    let scope = GroupScope::from_pairs(
        args.filters
            .iter()
            .map(|filter| (filter.column.as_str(), filter.value.clone())),
    );
    // Keep each group together, then order within it
    let mut query = scope.query();
    for column in collection.config().group_columns() {
        query = query.order_by(column.as_str(), Direction::Asc);
    }
    let query = collection.manager().ordered(query, direction);
    let rows = collection.backend().fetch(&query).await?;

    print_rows(&rows, collection.config(), &args.table.key_column, format)
}
