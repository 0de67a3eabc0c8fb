//! `teamcollab config`: inspect the effective configuration.

use clap::{Args, Subcommand};
use serde_json::Value;
use tabled::Tabled;

use teamcollab_core::error::AppError;

use crate::output::{OutputFormat, print_rows, print_success};

/// Arguments for `config`.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration with secrets masked
    Show,
    /// Check that the configuration loads
    Validate,
}

#[derive(Debug, Tabled)]
struct Setting {
    key: String,
    value: String,
}

/// Dispatch a config subcommand.
pub fn execute(args: &ConfigArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;

    match args.command {
        ConfigCommands::Show => {
            let shown = config.redacted();
            let value = serde_json::to_value(&shown)
                .map_err(|e| AppError::internal(format!("Failed to serialize config: {e}")))?;
            let mut rows = Vec::new();
            flatten("", &value, &mut rows);
            print_rows(&rows, &value, format);
        }
        ConfigCommands::Validate => {
            print_success(&format!(
                "Configuration for '{}' is valid (listening on {})",
                env,
                config.server.bind_address()
            ));
        }
    }
    Ok(())
}

/// Flattens nested JSON into dotted `key = value` rows.
fn flatten(prefix: &str, value: &Value, out: &mut Vec<Setting>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(&key, v, out);
            }
        }
        Value::String(s) => out.push(Setting {
            key: prefix.to_string(),
            value: s.clone(),
        }),
        other => out.push(Setting {
            key: prefix.to_string(),
            value: other.to_string(),
        }),
    }
}
