//! Configuration types for tcaform

use crate::error::TcaError;
use crate::result::Result;
use crate::tree::DEFAULT_TAB_LABEL;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root of a `tcaform` configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TcaformConfig {
    /// JSON schema reference, ignored when loading
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Marks the top of a configuration hierarchy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,

    /// Configuration files this one extends, relative to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Paths of configuration files to extend")]
    pub extends: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Layout and type compiler settings")]
    pub compiler: Option<CompilerConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Output document settings")]
    pub output: Option<OutputConfiguration>,
}

/// Compiler section
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompilerConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Label of the tab created for layouts without a leading --div--")]
    pub default_tab_label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Type key whose layout defines the base table (defaults to the first type)")]
    pub base_type_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Treat palettes that differ only in whitespace or trailing empty parts as equal"
    )]
    pub canonical_palette_compare: Option<bool>,
}

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Output section
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Format of compiled documents: 'json' or 'yaml'")]
    pub format: Option<OutputFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Pretty-print JSON output")]
    pub pretty: Option<bool>,
}

/// Resolved compiler settings with every default applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    pub default_tab_label: String,
    /// `None` selects the first type of each table
    pub base_type_key: Option<String>,
    pub canonical_palette_compare: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            default_tab_label: DEFAULT_TAB_LABEL.to_string(),
            base_type_key: None,
            canonical_palette_compare: true,
        }
    }
}

impl TcaformConfig {
    /// Parse a configuration file, picking the format from its extension
    ///
    /// `extends` is not resolved here, see [`ConfigLoader`](super::ConfigLoader).
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TcaError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let parsed = match ext {
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            _ => {
                return Err(TcaError::config_error(format!(
                    "Unsupported config file extension: {} (expected .json, .toml, .yaml or .yml)",
                    path.display()
                )));
            }
        };

        parsed.map_err(|message| {
            TcaError::config_error(format!("Failed to parse '{}': {}", path.display(), message))
        })
    }

    /// Settings for the core compilers
    pub fn compiler_options(&self) -> CompilerOptions {
        let defaults = CompilerOptions::default();
        let Some(compiler) = &self.compiler else {
            return defaults;
        };
        CompilerOptions {
            default_tab_label: compiler
                .default_tab_label
                .clone()
                .unwrap_or(defaults.default_tab_label),
            base_type_key: compiler.base_type_key.clone(),
            canonical_palette_compare: compiler
                .canonical_palette_compare
                .unwrap_or(defaults.canonical_palette_compare),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|output| output.format)
            .unwrap_or_default()
    }

    pub fn pretty(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|output| output.pretty)
            .unwrap_or(true)
    }

    /// Starter configuration written by `tcaform config init`
    pub fn starter() -> Self {
        Self {
            schema: None,
            root: Some(true),
            extends: None,
            compiler: Some(CompilerConfiguration {
                default_tab_label: Some(DEFAULT_TAB_LABEL.to_string()),
                base_type_key: None,
                canonical_palette_compare: Some(true),
            }),
            output: Some(OutputConfiguration {
                format: Some(OutputFormat::Json),
                pretty: Some(true),
            }),
        }
    }

    /// JSON schema of the configuration file
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(TcaformConfig);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}
