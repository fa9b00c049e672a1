//! CLI command implementations
//!
//! Each subcommand lives in its own module; the document reading and writing
//! shared by `compile` and `diff` is implemented here.

pub mod compile;
pub mod config;
pub mod diff;
pub mod parse;

use serde_json::Value;
use std::path::Path;
use tcaform_core::{OutputFormat, Result, TcaError};

/// Extensions accepted for input documents
pub const DOCUMENT_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Whether the path carries one of [`DOCUMENT_EXTENSIONS`]
pub fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Read a JSON or YAML document, chosen by file extension
pub fn read_document(path: &Path) -> Result<Value> {
    let content =
        std::fs::read_to_string(path).map_err(|e| TcaError::io_error(path, e))?;
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|e| {
            TcaError::invalid_document(path.display().to_string(), format!("YAML error: {e}"))
        }),
        _ => serde_json::from_str(&content).map_err(|e| {
            TcaError::invalid_document(path.display().to_string(), format!("JSON error: {e}"))
        }),
    }
}

/// Render a document in the requested format
pub fn render_document(value: &Value, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|e| TcaError::internal_error(format!("Failed to serialize YAML: {e}"))),
    }
}

/// Write rendered output to a file, or to stdout when no path is given
pub fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut content = rendered.to_string();
            if !content.ends_with('\n') {
                content.push('\n');
            }
            std::fs::write(path, content).map_err(|e| TcaError::io_error(path, e))
        }
        None => {
            println!("{}", rendered.trim_end_matches('\n'));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_document() {
        assert!(is_document(Path::new("tt_content.json")));
        assert!(is_document(Path::new("pages.YAML")));
        assert!(is_document(Path::new("dir/pages.yml")));
        assert!(!is_document(Path::new("ext_tables.sql")));
        assert!(!is_document(Path::new("README")));
    }

    #[test]
    fn test_read_yaml_and_json_documents() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = temp_dir.path().join("pages.yaml");
        fs::write(&yaml, "pages:\n  columns:\n    title: {}\n").unwrap();
        let json = temp_dir.path().join("pages.json");
        fs::write(&json, r#"{"pages": {"columns": {"title": {}}}}"#).unwrap();

        assert_eq!(read_document(&yaml).unwrap(), read_document(&json).unwrap());
    }

    #[test]
    fn test_read_invalid_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ nope").unwrap();

        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, TcaError::InvalidDocument { .. }));
    }

    #[test]
    fn test_render_compact_json() {
        let value = serde_json::json!({"b": 1, "a": [true]});
        assert_eq!(
            render_document(&value, OutputFormat::Json, false).unwrap(),
            r#"{"b":1,"a":[true]}"#
        );
    }
}
