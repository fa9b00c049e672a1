//! `tcaform diff`

use super::read_document;
use serde_json::{Value, json};
use std::path::Path;
use tcaform_core::{ColumnMap, Result, TcaError, build_column_overrides};
use tracing::debug;

/// Read a file holding a column dictionary (`{field: config, ...}`)
fn read_columns(path: &Path) -> Result<ColumnMap> {
    let invalid = |message: String| TcaError::invalid_document(path.display().to_string(), message);

    let Value::Object(map) = read_document(path)? else {
        return Err(invalid("expected an object of column configurations".to_string()));
    };
    map.into_iter()
        .map(|(id, config)| match config {
            Value::Object(config) => Ok((id, config)),
            _ => Err(invalid(format!("'{id}' must be an object"))),
        })
        .collect()
}

/// Overrides of `derived` over `base`, plus the fields merged into the base
/// as dummy columns
pub fn column_diff(mut base: ColumnMap, derived: &ColumnMap, real: &[String]) -> Value {
    let known: Vec<String> = base.keys().cloned().collect();
    let overrides = build_column_overrides(&mut base, derived, |id| {
        real.iter().any(|field| field == id)
    });
    let dummies: Vec<&String> = base.keys().filter(|id| !known.contains(id)).collect();
    debug!(
        "{} overridden columns, {} dummy columns",
        overrides.len(),
        dummies.len()
    );

    json!({
        "columnsOverrides": overrides,
        "dummyColumns": dummies,
    })
}

/// Diff command implementation
pub fn diff_command(base: &Path, derived: &Path, real: &[String]) -> Result<()> {
    let base_columns = read_columns(base)?;
    let derived_columns = read_columns(derived)?;
    let diff = column_diff(base_columns, &derived_columns, real);
    println!("{}", serde_json::to_string_pretty(&diff)?);
    Ok(())
}
