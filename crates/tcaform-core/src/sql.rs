//! SQL column definition registry
//!
//! The compilers never generate database schema themselves. Field changes that
//! affect a column definition are forwarded to a [`SqlRegistry`] owned by the
//! caller, which acts as a key-value store keyed by `(table, field)`.

use indexmap::IndexMap;
use tracing::trace;

/// Store of column definitions, keyed by table and field
pub trait SqlRegistry {
    fn set_definition_for(&mut self, table: &str, field: &str, definition: &str);

    fn get_definition_for(&self, table: &str, field: &str) -> Option<String>;

    fn remove_definition_for(&mut self, table: &str, field: &str);
}

/// Registry kept in memory, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemorySqlRegistry {
    tables: IndexMap<String, IndexMap<String, String>>,
}

impl InMemorySqlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column definitions of one table
    pub fn definitions(&self, table: &str) -> Option<&IndexMap<String, String>> {
        self.tables.get(table)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// One `CREATE TABLE` statement per table with at least one definition
    pub fn create_table_statements(&self) -> Vec<String> {
        self.tables
            .iter()
            .map(|(table, columns)| {
                let body = columns
                    .iter()
                    .map(|(field, definition)| format!("    {field} {definition}"))
                    .collect::<Vec<_>>()
                    .join(",\n");
                format!("CREATE TABLE {table} (\n{body}\n);")
            })
            .collect()
    }
}

impl SqlRegistry for InMemorySqlRegistry {
    fn set_definition_for(&mut self, table: &str, field: &str, definition: &str) {
        trace!("SQL definition for {}.{}: {}", table, field, definition);
        self.tables
            .entry(table.to_string())
            .or_default()
            .insert(field.to_string(), definition.to_string());
    }

    fn get_definition_for(&self, table: &str, field: &str) -> Option<String> {
        self.tables.get(table)?.get(field).cloned()
    }

    fn remove_definition_for(&mut self, table: &str, field: &str) {
        let Some(columns) = self.tables.get_mut(table) else {
            return;
        };
        columns.shift_remove(field);
        if columns.is_empty() {
            self.tables.shift_remove(table);
        }
    }
}
