//! `tcaform compile`

use super::{is_document, read_document, render_document, write_output};
use crate::output::{CompileSummary, print_compile_summary};
use rayon::prelude::*;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tcaform_core::config::CONFIG_FILE_NAMES;
use tcaform_core::{ConfigLoader, OutputFormat, Result, ResultExt, TcaError, TcaTable};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A table read from an input document
#[derive(Debug)]
struct TableSource {
    name: String,
    value: Value,
    file: PathBuf,
}

/// Compile command implementation
pub fn compile_command(
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    tables: Vec<String>,
    compact: bool,
    keep_going: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    debug!("Running compile command on {}", input.display());
    let start = Instant::now();

    let start_dir = if input.is_dir() {
        input.as_path()
    } else {
        match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };
    let config = ConfigLoader::load(config_path.as_deref(), Some(start_dir))?;
    let options = config.compiler_options();
    let format = format.unwrap_or_else(|| config.output_format());
    let pretty = config.pretty() && !compact;

    let files = discover_files(&input)?;
    let mut sources = Vec::new();
    for file in &files {
        collect_tables(file, &mut sources)?;
    }
    let sources = select_tables(sources, &tables)?;
    info!(
        "Compiling {} tables from {} files",
        sources.len(),
        files.len()
    );

    let results = sources
        .par_iter()
        .map(|source| -> Result<(String, Value, usize)> {
            debug!("Compiling {} from {}", source.name, source.file.display());
            let table = TcaTable::from_value(&source.name, &source.value, &options)?;
            let types = table.type_keys().count();
            Ok((source.name.clone(), table.compile()?, types))
        })
        .collect::<Vec<_>>();

    let mut summary = CompileSummary::new();
    let compiled = if keep_going {
        let total = results.len();
        let compiled: Vec<_> = results
            .into_iter()
            .filter_map(ResultExt::log_and_continue)
            .collect();
        summary.tables_failed = total - compiled.len();
        compiled
    } else {
        results.into_iter().collect::<Result<Vec<_>>>()?
    };

    summary.files_read = files.len();
    let mut document = Map::new();
    for (name, value, types) in compiled {
        summary.tables_compiled += 1;
        summary.types_compiled += types;
        document.insert(name, value);
    }
    summary.elapsed = start.elapsed();

    let rendered = render_document(&Value::Object(document), format, pretty)?;
    write_output(&rendered, output.as_deref())?;
    print_compile_summary(&summary, output.as_deref());

    Ok(())
}

/// Input files in a stable order; configuration files are never inputs
fn discover_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(TcaError::io_error(
            input,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input does not exist"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(input).to_path_buf();
            TcaError::io_error(path, std::io::Error::other(e.to_string()))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_document(path) {
            continue;
        }
        let is_config = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| CONFIG_FILE_NAMES.contains(&name));
        if is_config {
            debug!("Skipping configuration file {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }
    Ok(files)
}

/// Read a document mapping table names to TCA dictionaries
fn collect_tables(file: &Path, sources: &mut Vec<TableSource>) -> Result<()> {
    let Value::Object(map) = read_document(file)? else {
        return Err(TcaError::invalid_document(
            file.display().to_string(),
            "expected an object mapping table names to TCA",
        ));
    };

    for (name, value) in map {
        if let Some(existing) = sources.iter().find(|source| source.name == name) {
            return Err(TcaError::invalid_document(
                name.clone(),
                format!(
                    "defined in both {} and {}",
                    existing.file.display(),
                    file.display()
                ),
            ));
        }
        sources.push(TableSource {
            name,
            value,
            file: file.to_path_buf(),
        });
    }
    Ok(())
}

/// Restrict the sources to the requested tables, in input order
fn select_tables(sources: Vec<TableSource>, tables: &[String]) -> Result<Vec<TableSource>> {
    if tables.is_empty() {
        return Ok(sources);
    }
    if let Some(missing) = tables
        .iter()
        .find(|name| !sources.iter().any(|source| &source.name == *name))
    {
        return Err(TcaError::invalid_document(
            missing.clone(),
            "table not found in input",
        ));
    }
    Ok(sources
        .into_iter()
        .filter(|source| tables.contains(&source.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn source(name: &str) -> TableSource {
        TableSource {
            name: name.to_string(),
            value: Value::Object(Map::new()),
            file: PathBuf::from("tca.json"),
        }
    }

    #[test]
    fn test_discover_files_skips_config_and_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("Overrides")).unwrap();
        fs::write(temp_dir.path().join("tcaform.yaml"), "root: true\n").unwrap();
        fs::write(temp_dir.path().join("pages.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("ext_tables.sql"), "").unwrap();
        fs::write(temp_dir.path().join("Overrides/tt_content.yaml"), "{}").unwrap();

        let files = discover_files(temp_dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["tt_content.yaml", "pages.json"]);
    }

    #[test]
    fn test_duplicate_table_names_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.json");
        let b = temp_dir.path().join("b.json");
        fs::write(&a, r#"{"pages": {}}"#).unwrap();
        fs::write(&b, r#"{"pages": {}}"#).unwrap();

        let mut sources = Vec::new();
        collect_tables(&a, &mut sources).unwrap();
        let err = collect_tables(&b, &mut sources).unwrap_err();
        assert!(err.to_string().contains("defined in both"));
    }

    #[test]
    fn test_select_tables_keeps_input_order() {
        let sources = vec![source("pages"), source("tt_content"), source("sys_file")];
        let selected =
            select_tables(sources, &["sys_file".to_string(), "pages".to_string()]).unwrap();
        let names: Vec<_> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["pages", "sys_file"]);
    }

    #[test]
    fn test_select_unknown_table() {
        let err = select_tables(vec![source("pages")], &["be_users".to_string()]).unwrap_err();
        assert!(matches!(err, TcaError::InvalidDocument { .. }));
    }
}
