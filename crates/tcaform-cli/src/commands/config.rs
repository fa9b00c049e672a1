//! Configuration management subcommands
//!
//! - init: create a starter configuration file
//! - show: display the configuration in effect
//! - schema: print the JSON schema of the configuration file

use super::write_output;
use crate::ConfigFormat;
use crate::output::print_success;
use serde_json::json;
use std::path::PathBuf;
use tcaform_core::{ConfigLoader, Result, TcaError, TcaformConfig};
use tracing::debug;

fn config_file_name(format: ConfigFormat) -> &'static str {
    match format {
        ConfigFormat::Json => ".tcaformrc.json",
        ConfigFormat::Toml => ".tcaformrc.toml",
        ConfigFormat::Yaml => "tcaform.yaml",
    }
}

/// Config init command implementation
pub fn config_init_command(format: ConfigFormat, force: bool) -> Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = config_file_name(format);
    let config_path = PathBuf::from(filename);
    if config_path.exists() && !force {
        return Err(TcaError::config_error(format!(
            "Configuration file '{filename}' already exists. Use --force to overwrite."
        )));
    }

    let starter = TcaformConfig::starter();
    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&starter)?,
        ConfigFormat::Toml => toml::to_string_pretty(&starter)
            .map_err(|e| TcaError::config_error(format!("Failed to serialize TOML: {e}")))?,
        ConfigFormat::Yaml => serde_yaml::to_string(&starter)
            .map_err(|e| TcaError::config_error(format!("Failed to serialize YAML: {e}")))?,
    };
    write_output(&content, Some(config_path.as_path()))?;

    print_success(&format!("Created configuration file: {filename}"));
    Ok(())
}

/// Config show command implementation
pub fn config_show_command(resolved: bool, config_path: Option<PathBuf>) -> Result<()> {
    debug!("Showing configuration (resolved: {})", resolved);

    let config = ConfigLoader::load(config_path.as_deref(), None)?;
    let shown = if resolved {
        let options = config.compiler_options();
        json!({
            "compiler": {
                "defaultTabLabel": options.default_tab_label,
                "baseTypeKey": options.base_type_key,
                "canonicalPaletteCompare": options.canonical_palette_compare,
            },
            "output": {
                "format": config.output_format(),
                "pretty": config.pretty(),
            }
        })
    } else {
        serde_json::to_value(&config)?
    };

    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}

/// Config schema command implementation
pub fn config_schema_command(output: Option<PathBuf>) -> Result<()> {
    let schema = TcaformConfig::json_schema()?;
    write_output(&schema, output.as_deref())?;
    if let Some(path) = output {
        print_success(&format!("Wrote configuration schema to {}", path.display()));
    }
    Ok(())
}
