//! TCA table orchestration
//!
//! [`TcaTable`] reads one table dictionary, builds the form tree of the base
//! type and one derived tree per additional type, hands out mutable access to
//! them and compiles everything back into a table dictionary:
//!
//! ```text
//! { ctrl, columns, palettes, types: { key: { showitem, columnsOverrides? } } }
//! ```
//!
//! `ctrl` and every key the compiler does not own are passed through untouched.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tcaform_core::{CompilerOptions, TcaTable};
//!
//! let input = json!({
//!     "ctrl": {"title": "News"},
//!     "columns": {
//!         "title": {"label": "Title", "config": {"type": "input"}},
//!         "teaser": {"label": "Teaser", "config": {"type": "text"}}
//!     },
//!     "types": {
//!         "0": {"showitem": "title,teaser"},
//!         "1": {"showitem": "title"}
//!     }
//! });
//!
//! let mut table = TcaTable::from_value("tx_news", &input, &CompilerOptions::default())?;
//! table
//!     .type_mut("1")
//!     .expect("derived type")
//!     .field("teaser")?
//!     .configure(|config| {
//!         config.insert("label".into(), json!("Short teaser"));
//!     })
//!     .move_to("before:title")?;
//!
//! let output = table.compile()?;
//! assert_eq!(output["types"]["1"]["showitem"], "--div--;general,teaser,title");
//! assert_eq!(output["types"]["1"]["columnsOverrides"], json!({"teaser": {"label": "Short teaser"}}));
//! # Ok::<(), tcaform_core::TcaError>(())
//! ```

use crate::config::CompilerOptions;
use crate::error::TcaError;
use crate::layout::LayoutCompiler;
use crate::resolver::{BaseTableResolver, FieldConfigResolver, ResolverCache};
use crate::result::Result;
use crate::sql::SqlRegistry;
use crate::table_type::{build_column_overrides, diff_config, merge_config, merge_palettes};
use crate::tree::{ColumnConfig, FormTree, NodeMut};
use crate::{ColumnMap, PaletteMap};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// One entry of `types`
#[derive(Debug, Clone)]
pub struct TableType {
    key: String,
    tree: FormTree,
    /// Stored `columnsOverrides`, plus entries synthesized while populating
    columns: ColumnMap,
    document: Map<String, Value>,
    cache: ResolverCache,
}

impl TableType {
    fn new(key: &str, document: Map<String, Value>, options: &CompilerOptions) -> Self {
        Self {
            key: key.to_string(),
            tree: FormTree::with_default_tab_label(options.default_tab_label.clone()),
            columns: ColumnMap::new(),
            document,
            cache: ResolverCache::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn tree(&self) -> &FormTree {
        &self.tree
    }

    /// Column configuration stored for this type
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    fn layout(&self) -> &str {
        self.document
            .get("showitem")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Full configuration of every field of the type
    fn effective_columns(&self, base_columns: &ColumnMap) -> ColumnMap {
        let mut columns: ColumnMap = self
            .tree
            .fields()
            .filter_map(|node| Some((node.id().to_string(), node.config()?.clone())))
            .collect();

        for (id, stored) in &self.columns {
            if columns.contains_key(id) {
                continue;
            }
            let mut config = base_columns.get(id).cloned().unwrap_or_default();
            merge_config(&mut config, stored);
            columns.insert(id.clone(), config);
        }
        columns
    }
}

/// Mutable access to a derived type
///
/// Fields the type does not show yet are resolved from the base table the
/// first time they are requested and cached until invalidated.
pub struct TypeMut<'a> {
    ty: &'a mut TableType,
    base_tree: &'a FormTree,
    base_columns: &'a ColumnMap,
}

impl TypeMut<'_> {
    pub fn key(&self) -> &str {
        &self.ty.key
    }

    pub fn tree(&self) -> &FormTree {
        &self.ty.tree
    }

    pub fn tree_mut(&mut self) -> &mut FormTree {
        &mut self.ty.tree
    }

    /// Configuration of a base table field, as seen by this type
    pub fn resolve(&mut self, field_id: &str) -> Option<ColumnConfig> {
        self.ty
            .cache
            .wrap(BaseTableResolver::new(self.base_tree, self.base_columns))
            .resolve(field_id)
    }

    /// Create or fetch a field, inheriting the base configuration of new fields
    pub fn field(&mut self, id: &str) -> Result<NodeMut<'_>> {
        if self.ty.tree.find_field(id).is_some() {
            return self.ty.tree.field(id);
        }
        let mut config = self.resolve(id).unwrap_or_default();
        if let Some(stored) = self.ty.columns.get(id) {
            merge_config(&mut config, stored);
        }
        self.ty.tree.field_with(id, move || config)
    }

    pub fn palette(&mut self, palette_id: &str) -> Result<NodeMut<'_>> {
        self.ty.tree.palette(palette_id)
    }

    pub fn tab(&mut self, id: &str) -> Result<NodeMut<'_>> {
        self.ty.tree.tab(id)
    }
}

/// One TCA table with its base layout and derived types
#[derive(Debug, Clone)]
pub struct TcaTable {
    name: String,
    options: CompilerOptions,
    document: Map<String, Value>,
    columns: ColumnMap,
    palettes: PaletteMap,
    palette_documents: Map<String, Value>,
    base: TableType,
    types: IndexMap<String, TableType>,
    type_order: Vec<String>,
}

impl TcaTable {
    /// Read a table dictionary and populate all of its trees
    pub fn from_value(
        name: impl Into<String>,
        value: &Value,
        options: &CompilerOptions,
    ) -> Result<Self> {
        let name = name.into();
        let document = value
            .as_object()
            .cloned()
            .ok_or_else(|| TcaError::invalid_document(&name, "expected an object"))?;

        let mut columns = read_columns(&name, "columns", document.get("columns"))?;
        let palette_documents = read_objects(&name, "palettes", document.get("palettes"))?;
        let palettes: PaletteMap = palette_documents
            .iter()
            .map(|(id, palette)| {
                let layout = palette.get("showitem").and_then(Value::as_str).unwrap_or_default();
                (id.clone(), layout.to_string())
            })
            .collect();
        let type_documents = read_objects(&name, "types", document.get("types"))?;

        let base_key = select_base_key(&name, &type_documents, options);
        let compiler = LayoutCompiler::new();

        let base_document = match type_documents.get(&base_key) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        let mut base = TableType::new(&base_key, base_document, options);
        let layout = base.layout().to_string();
        compiler.populate(&mut base.tree, &layout, &palettes, &mut columns, None)?;

        let mut types = IndexMap::new();
        for (key, type_document) in &type_documents {
            if *key == base_key {
                continue;
            }
            let type_document = type_document.as_object().cloned().unwrap_or_default();
            let mut ty = TableType::new(key, type_document, options);
            ty.columns = read_columns(
                &name,
                &format!("types.{key}.columnsOverrides"),
                ty.document.get("columnsOverrides"),
            )?;

            let layout = ty.layout().to_string();
            {
                let mut resolver = ty.cache.wrap(BaseTableResolver::new(&base.tree, &columns));
                compiler.populate(
                    &mut ty.tree,
                    &layout,
                    &palettes,
                    &mut ty.columns,
                    Some(&mut resolver),
                )?;
            }
            types.insert(key.clone(), ty);
        }

        let type_order = if type_documents.is_empty() {
            vec![base_key.clone()]
        } else {
            type_documents.keys().cloned().collect()
        };

        info!(
            "Loaded table '{}': base type '{}', {} derived types, {} columns",
            name,
            base_key,
            types.len(),
            columns.len()
        );

        Ok(Self {
            name,
            options: options.clone(),
            document,
            columns,
            palettes,
            palette_documents,
            base,
            types,
            type_order,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn base_type_key(&self) -> &str {
        &self.base.key
    }

    pub fn base_tree(&self) -> &FormTree {
        &self.base.tree
    }

    /// Base layout
    ///
    /// Types keep the field configurations they resolved until the field is
    /// passed to [`TcaTable::invalidate_field`].
    pub fn base_tree_mut(&mut self) -> &mut FormTree {
        &mut self.base.tree
    }

    /// Stored column configuration of the table
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Stored palette show-items
    pub fn palettes(&self) -> &PaletteMap {
        &self.palettes
    }

    /// Keys of the derived types, in document order
    pub fn type_keys(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn table_type(&self, key: &str) -> Option<&TableType> {
        if key == self.base.key {
            return Some(&self.base);
        }
        self.types.get(key)
    }

    /// Mutable handle to a derived type; `None` for the base type and unknown keys
    pub fn type_mut(&mut self, key: &str) -> Option<TypeMut<'_>> {
        let ty = self.types.get_mut(key)?;
        Some(TypeMut {
            ty,
            base_tree: &self.base.tree,
            base_columns: &self.columns,
        })
    }

    /// Forget cached resolutions of a field in every type, returning how many were dropped
    ///
    /// Types that show the field get their copy of it rebuilt from the
    /// current base configuration; keys the type changed itself are kept.
    pub fn invalidate_field(&mut self, field_id: &str) -> usize {
        let mut dropped = 0;
        for ty in self.types.values_mut() {
            let Some(previous) = ty.cache.take(field_id) else {
                continue;
            };
            dropped += 1;

            let Some(current) = ty.tree.find_field(field_id).and_then(|node| node.config()) else {
                continue;
            };
            let own = diff_config(&previous.unwrap_or_default(), current);
            let mut refreshed = ty
                .cache
                .wrap(BaseTableResolver::new(&self.base.tree, &self.columns))
                .resolve(field_id)
                .unwrap_or_default();
            merge_config(&mut refreshed, &own);

            if let Some(mut node) = ty.tree.node_mut(field_id) {
                if let Some(config) = node.config_mut() {
                    *config = refreshed;
                }
            }
            debug!(
                "Refreshed field '{}' of type '{}', {} own keys kept",
                field_id,
                ty.key,
                own.len()
            );
        }
        dropped
    }

    /// Remove a field from every tree and from the stored columns
    ///
    /// The SQL definition of the field is removed from `registry` as well.
    /// Returns whether the field was known anywhere.
    pub fn remove_field(&mut self, field_id: &str, registry: &mut dyn SqlRegistry) -> Result<bool> {
        let mut found = self.columns.shift_remove(field_id).is_some();
        found |= remove_field_node(&mut self.base.tree, field_id)?;

        for ty in self.types.values_mut() {
            found |= remove_field_node(&mut ty.tree, field_id)?;
            found |= ty.columns.shift_remove(field_id).is_some();
            ty.cache.invalidate(field_id);
        }

        registry.remove_definition_for(&self.name, field_id);
        debug!("Removed field '{}' from table '{}'", field_id, self.name);
        Ok(found)
    }

    pub fn set_sql_definition(&self, registry: &mut dyn SqlRegistry, field_id: &str, definition: &str) {
        registry.set_definition_for(&self.name, field_id, definition);
    }

    pub fn sql_definition(&self, registry: &dyn SqlRegistry, field_id: &str) -> Option<String> {
        registry.get_definition_for(&self.name, field_id)
    }

    pub fn remove_sql_definition(&self, registry: &mut dyn SqlRegistry, field_id: &str) {
        registry.remove_definition_for(&self.name, field_id);
    }

    /// Compile all trees back into a table dictionary
    pub fn compile(&self) -> Result<Value> {
        let compiler = LayoutCompiler::new();
        let base_dump = compiler.dump(&self.base.tree);

        let mut columns = self.columns.clone();
        for field in self.base.tree.fields() {
            if let Some(config) = field.config() {
                columns.insert(field.id().to_string(), config.clone());
            }
        }

        let mut palettes = self.palettes.clone();
        palettes.extend(base_dump.palettes);

        let is_real =
            |id: &str| self.columns.contains_key(id) || self.base.tree.find_field(id).is_some();

        let mut renamed_from: HashMap<String, String> = HashMap::new();
        let mut types = Map::new();
        for key in &self.type_order {
            if *key == self.base.key {
                types.insert(
                    key.clone(),
                    type_document(&self.base.document, &base_dump.showitem, None),
                );
                continue;
            }
            let Some(ty) = self.types.get(key) else {
                continue;
            };

            let dump = compiler.dump(&ty.tree);
            let type_columns = ty.effective_columns(&columns);
            let overrides = build_column_overrides(&mut columns, &type_columns, &is_real);
            let merged = merge_palettes(
                key,
                &mut palettes,
                &dump.palettes,
                &dump.showitem,
                self.options.canonical_palette_compare,
            )?;
            debug!(
                "Type '{}' of '{}': {} column overrides, {} renamed palettes",
                key,
                self.name,
                overrides.len(),
                merged.renamed.len()
            );
            for (original, renamed) in &merged.renamed {
                renamed_from.insert(renamed.clone(), original.clone());
            }
            types.insert(
                key.clone(),
                type_document(&ty.document, &merged.showitem, Some(overrides)),
            );
        }

        let palettes: Map<String, Value> = palettes
            .into_iter()
            .map(|(id, layout)| {
                // renamed palettes keep the settings of the palette they were copied from
                let source = renamed_from.get(&id).unwrap_or(&id);
                let mut palette = match self.palette_documents.get(source) {
                    Some(Value::Object(map)) => map.clone(),
                    _ => Map::new(),
                };
                palette.insert("showitem".to_string(), Value::String(layout));
                (id, Value::Object(palette))
            })
            .collect();

        let mut document = self.document.clone();
        document.insert("columns".to_string(), columns_to_value(columns));
        if !palettes.is_empty() || document.contains_key("palettes") {
            document.insert("palettes".to_string(), Value::Object(palettes));
        }
        document.insert("types".to_string(), Value::Object(types));

        info!("Compiled table '{}'", self.name);
        Ok(Value::Object(document))
    }
}

fn remove_field_node(tree: &mut FormTree, field_id: &str) -> Result<bool> {
    if tree.find_field(field_id).is_none() {
        return Ok(false);
    }
    tree.remove(field_id)?;
    Ok(true)
}

fn select_base_key(table: &str, types: &Map<String, Value>, options: &CompilerOptions) -> String {
    if let Some(key) = &options.base_type_key {
        if types.is_empty() || types.contains_key(key) {
            return key.clone();
        }
        warn!(
            "Base type '{}' not found in table '{}', using its first type",
            key, table
        );
    }
    types
        .keys()
        .next()
        .cloned()
        .unwrap_or_else(|| "0".to_string())
}

/// An object of objects; `null` and empty lists count as empty
fn read_objects(table: &str, path: &str, value: Option<&Value>) -> Result<Map<String, Value>> {
    let map = match value {
        None | Some(Value::Null) => return Ok(Map::new()),
        Some(Value::Array(items)) if items.is_empty() => return Ok(Map::new()),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(TcaError::invalid_document(table, format!("'{path}' must be an object"))),
    };

    for (key, entry) in map {
        if !entry.is_object() {
            return Err(TcaError::invalid_document(
                table,
                format!("'{path}.{key}' must be an object"),
            ));
        }
    }
    Ok(map.clone())
}

fn read_columns(table: &str, path: &str, value: Option<&Value>) -> Result<ColumnMap> {
    Ok(read_objects(table, path, value)?
        .into_iter()
        .filter_map(|(id, config)| match config {
            Value::Object(config) => Some((id, config)),
            _ => None,
        })
        .collect())
}

fn columns_to_value(columns: ColumnMap) -> Value {
    Value::Object(
        columns
            .into_iter()
            .map(|(id, config)| (id, Value::Object(config)))
            .collect(),
    )
}

fn type_document(
    document: &Map<String, Value>,
    showitem: &str,
    overrides: Option<ColumnMap>,
) -> Value {
    let mut document = document.clone();
    document.insert("showitem".to_string(), Value::String(showitem.to_string()));
    match overrides {
        Some(overrides) if !overrides.is_empty() => {
            document.insert("columnsOverrides".to_string(), columns_to_value(overrides));
        }
        Some(_) => {
            document.shift_remove("columnsOverrides");
        }
        None => {}
    }
    Value::Object(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::InMemorySqlRegistry;
    use serde_json::json;

    fn news() -> Value {
        json!({
            "ctrl": {"title": "News", "label": "title"},
            "columns": {
                "title": {"label": "Title", "config": {"type": "input", "size": 30}},
                "teaser": {"label": "Teaser", "config": {"type": "text"}},
                "hidden": {"label": "Hidden", "config": {"type": "check"}},
                "starttime": {"label": "Start", "config": {"type": "datetime"}}
            },
            "palettes": {
                "access": {"showitem": "hidden,--linebreak--,starttime", "label": "Access"}
            },
            "types": {
                "0": {"showitem": "--div--;General,title,teaser,--palette--;;access"},
                "1": {
                    "showitem": "--div--;General,title,--palette--;;access",
                    "columnsOverrides": {"title": {"config": {"size": "30", "max": 80}}},
                    "previewRenderer": "NewsPreview"
                }
            },
            "searchFields": "title,teaser"
        })
    }

    fn load(value: &Value) -> TcaTable {
        TcaTable::from_value("tx_news", value, &CompilerOptions::default()).unwrap()
    }

    #[test]
    fn test_compile_unchanged_table() {
        let output = load(&news()).compile().unwrap();

        assert_eq!(output["ctrl"], json!({"title": "News", "label": "title"}));
        assert_eq!(output["searchFields"], "title,teaser");
        assert_eq!(
            output["types"]["0"]["showitem"],
            "--div--;General,title,teaser,--palette--;;access"
        );
        assert_eq!(
            output["types"]["1"],
            json!({
                "showitem": "--div--;General,title,--palette--;;access",
                "columnsOverrides": {"title": {"config": {"max": 80}}},
                "previewRenderer": "NewsPreview"
            })
        );
        assert_eq!(
            output["palettes"]["access"],
            json!({"showitem": "hidden,--linebreak--,starttime", "label": "Access"})
        );
        assert_eq!(output["columns"], news()["columns"]);
    }

    #[test]
    fn test_output_keeps_top_level_key_order() {
        let output = load(&news()).compile().unwrap();
        let keys: Vec<&str> = output.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["ctrl", "columns", "palettes", "types", "searchFields"]);
    }

    #[test]
    fn test_derived_type_inherits_base_config() {
        let table = load(&news());
        let ty = table.table_type("1").unwrap();
        let title = ty.tree().find_field("title").unwrap().config().unwrap();
        assert_eq!(
            Value::Object(title.clone()),
            json!({"label": "Title", "config": {"type": "input", "size": "30", "max": 80}})
        );
    }

    #[test]
    fn test_type_palette_change_is_renamed() {
        let mut table = load(&news());
        {
            let mut ty = table.type_mut("1").unwrap();
            ty.field("teaser").unwrap().move_to("bottom:palette:access").unwrap();
        }

        let output = table.compile().unwrap();
        assert_eq!(
            output["types"]["1"]["showitem"],
            "--div--;General,title,--palette--;;1-access"
        );
        assert_eq!(
            output["palettes"]["1-access"]["showitem"],
            "hidden,--linebreak--,starttime,teaser"
        );
        assert_eq!(output["palettes"]["1-access"]["label"], "Access");
        assert_eq!(
            output["palettes"]["access"]["showitem"],
            "hidden,--linebreak--,starttime"
        );
    }

    #[test]
    fn test_fluent_override_is_minimal() {
        let mut table = load(&news());
        table
            .type_mut("1")
            .unwrap()
            .field("title")
            .unwrap()
            .configure(|config| {
                config.insert("label".to_string(), json!("Headline"));
            });

        let output = table.compile().unwrap();
        assert_eq!(
            output["types"]["1"]["columnsOverrides"],
            json!({"title": {"label": "Headline", "config": {"max": 80}}})
        );
    }

    #[test]
    fn test_override_removed_when_type_matches_base() {
        let mut table = load(&news());
        table
            .type_mut("1")
            .unwrap()
            .field("title")
            .unwrap()
            .configure(|config| {
                config.insert("config".to_string(), json!({"type": "input", "size": 30}));
            });

        let output = table.compile().unwrap();
        assert!(output["types"]["1"].get("columnsOverrides").is_none());
    }

    #[test]
    fn test_new_type_field_becomes_base_column() {
        let mut table = load(&news());
        table
            .type_mut("1")
            .unwrap()
            .field("path_segment")
            .unwrap()
            .configure(|config| {
                config.insert("config".to_string(), json!({"type": "slug"}));
            });

        let output = table.compile().unwrap();
        assert_eq!(output["columns"]["path_segment"], json!({"config": {"type": "slug"}}));
        assert!(output["types"]["1"]["columnsOverrides"].get("path_segment").is_none());
        assert_eq!(
            output["types"]["1"]["showitem"],
            "--div--;General,title,--palette--;;access,path_segment"
        );
    }

    #[test]
    fn test_type_resolution_is_cached_until_invalidated() {
        let mut table = load(&news());
        table
            .base_tree_mut()
            .field("teaser")
            .unwrap()
            .configure(|config| {
                config.insert("label".to_string(), json!("Intro"));
            });

        {
            let mut ty = table.type_mut("1").unwrap();
            assert_eq!(ty.resolve("hidden").unwrap()["label"], "Hidden");
        }
        table
            .base_tree_mut()
            .field("hidden")
            .unwrap()
            .configure(|config| {
                config.insert("label".to_string(), json!("Invisible"));
            });

        assert_eq!(table.type_mut("1").unwrap().resolve("hidden").unwrap()["label"], "Hidden");
        assert_eq!(table.invalidate_field("hidden"), 1);
        assert_eq!(table.type_mut("1").unwrap().resolve("hidden").unwrap()["label"], "Invisible");
        assert_eq!(table.type_mut("1").unwrap().resolve("teaser").unwrap()["label"], "Intro");
    }

    #[test]
    fn test_base_edit_after_load_does_not_become_override() {
        let mut table = load(&json!({
            "columns": {
                "title": {"label": "Title", "config": {"type": "input"}},
                "teaser": {"label": "Teaser", "config": {"type": "text"}}
            },
            "types": {
                "0": {"showitem": "title,teaser"},
                "1": {"showitem": "title"}
            }
        }));
        table
            .base_tree_mut()
            .field("title")
            .unwrap()
            .configure(|config| {
                config.insert("label".to_string(), json!("Headline"));
            });
        assert_eq!(table.invalidate_field("title"), 1);

        let output = table.compile().unwrap();
        assert_eq!(output["columns"]["title"]["label"], "Headline");
        assert_eq!(output["types"]["1"]["showitem"], "--div--;general,title");
        assert!(output["types"]["1"].get("columnsOverrides").is_none());
    }

    #[test]
    fn test_refresh_keeps_type_edits_and_overrides() {
        let mut table = load(&news());
        table
            .type_mut("1")
            .unwrap()
            .field("title")
            .unwrap()
            .configure(|config| {
                config.insert("description".to_string(), json!("Shown in lists"));
            });
        table
            .base_tree_mut()
            .field("title")
            .unwrap()
            .configure(|config| {
                config.insert("label".to_string(), json!("Headline"));
            });
        table.invalidate_field("title");

        let output = table.compile().unwrap();
        assert_eq!(
            output["types"]["1"]["columnsOverrides"],
            json!({"title": {"description": "Shown in lists", "config": {"max": 80}}})
        );
    }

    #[test]
    fn test_remove_field_everywhere() {
        let mut table = load(&news());
        let mut registry = InMemorySqlRegistry::new();
        table.set_sql_definition(&mut registry, "title", "varchar(255) DEFAULT '' NOT NULL");
        assert!(table.sql_definition(&registry, "title").is_some());

        assert!(table.remove_field("title", &mut registry).unwrap());
        assert!(table.sql_definition(&registry, "title").is_none());
        assert!(table.base_tree().find_field("title").is_none());
        assert!(table.table_type("1").unwrap().tree().find_field("title").is_none());

        let output = table.compile().unwrap();
        assert!(output["columns"].get("title").is_none());
        assert_eq!(output["types"]["1"]["showitem"], "--div--;General,--palette--;;access");
        assert!(output["types"]["1"].get("columnsOverrides").is_none());

        assert!(!table.remove_field("title", &mut registry).unwrap());
    }

    #[test]
    fn test_base_type_key_option() {
        let options = CompilerOptions {
            base_type_key: Some("1".to_string()),
            ..Default::default()
        };
        let mut table = TcaTable::from_value("tx_news", &news(), &options).unwrap();
        assert_eq!(table.base_type_key(), "1");
        assert_eq!(table.type_keys().collect::<Vec<_>>(), ["0"]);
        assert!(table.type_mut("1").is_none());
    }

    #[test]
    fn test_table_without_types() {
        let table = load(&json!({"columns": {"title": {"config": {"type": "input"}}}}));
        let output = table.compile().unwrap();
        assert_eq!(output["types"], json!({"0": {"showitem": "--div--;general"}}));
        assert!(output.get("palettes").is_none());
    }

    #[test]
    fn test_invalid_documents() {
        let options = CompilerOptions::default();
        assert!(matches!(
            TcaTable::from_value("t", &json!([1, 2]), &options),
            Err(TcaError::InvalidDocument { .. })
        ));
        let err = TcaTable::from_value("t", &json!({"types": {"0": "title"}}), &options).unwrap_err();
        assert!(err.to_string().contains("types.0"));
        assert!(TcaTable::from_value("t", &json!({"columns": []}), &options).is_ok());
    }

    #[test]
    fn test_grammar_error_aborts_table() {
        let err = TcaTable::from_value(
            "t",
            &json!({"types": {"0": {"showitem": "title,--tab--;Extra"}}}),
            &CompilerOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TcaError::UnknownSpecialItem { .. }));
    }
}
