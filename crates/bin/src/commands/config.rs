//! Configuration inspection command.

use sortable::config::KEYS;

use crate::backend::load_config;
use crate::cli::ConfigArgs;
use crate::output::{OutputFormat, print_table};

/// Run the config command
pub async fn run(
    args: &ConfigArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.table)?;

    if let Some(key) = &args.key {
        let value = config.resolve(key)?;
        match format {
            OutputFormat::Human => match value.as_str() {
                Some(s) => println!("{s}"),
                None => println!("{value}"),
            },
            OutputFormat::Json => println!("{}", serde_json::to_string(&value)?),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Human => {
            let mut rows = Vec::with_capacity(KEYS.len());
            for key in KEYS {
                rows.push(vec![key.to_string(), config.resolve(key)?.to_string()]);
            }
            print_table(&["KEY", "VALUE"], &rows);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&config)?),
    }

    Ok(())
}
