//! Type compiler: column override diffs and palette merging
//!
//! A derived table type carries its own form tree. When the table is
//! compiled, the type's field configuration is reduced to the minimal
//! `columnsOverrides` against the base table ([`build_column_overrides`]) and
//! its palettes are folded into the table's shared palette set
//! ([`merge_palettes`]), renaming palettes whose name is already taken by a
//! different layout.
//!
//! # Example
//!
//! ```
//! use tcaform_core::PaletteMap;
//! use tcaform_core::table_type::merge_palettes;
//!
//! let mut base = PaletteMap::new();
//! base.insert("p1".to_string(), "a,b".to_string());
//! let mut own = PaletteMap::new();
//! own.insert("p1".to_string(), "a,c".to_string());
//!
//! let merged = merge_palettes("1", &mut base, &own, "--palette--;;p1,fieldp1x", true)?;
//! assert_eq!(merged.showitem, "--palette--;;1-p1,fieldp1x");
//! assert_eq!(base["1-p1"], "a,c");
//! # Ok::<(), tcaform_core::TcaError>(())
//! ```

mod overrides;
mod palettes;

pub use overrides::{build_column_overrides, diff_config, loose_eq};
pub use palettes::{PaletteMerge, merge_palettes, rename_palette_reference};

use crate::tree::ColumnConfig;
use serde_json::Value;

/// Recursively merge `overlay` into `base`
///
/// Nested objects are merged key by key, every other value in `overlay`
/// replaces the one in `base`.
pub fn merge_config(base: &mut ColumnConfig, overlay: &ColumnConfig) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(target)), Value::Object(source)) => merge_config(target, source),
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> ColumnConfig {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_merge_config_is_recursive() {
        let mut base = config(json!({
            "label": "Title",
            "config": {"type": "input", "size": 30, "eval": "trim"}
        }));
        let overlay = config(json!({
            "config": {"size": 50, "max": 255},
            "description": "Shown in lists"
        }));
        merge_config(&mut base, &overlay);

        assert_eq!(
            Value::Object(base),
            json!({
                "label": "Title",
                "config": {"type": "input", "size": 50, "eval": "trim", "max": 255},
                "description": "Shown in lists"
            })
        );
    }

    #[test]
    fn test_merge_config_replaces_non_objects() {
        let mut base = config(json!({"config": {"items": [1, 2, 3]}, "exclude": 1}));
        let overlay = config(json!({"config": {"items": [4]}, "exclude": {"nested": true}}));
        merge_config(&mut base, &overlay);

        assert_eq!(
            Value::Object(base),
            json!({"config": {"items": [4]}, "exclude": {"nested": true}})
        );
    }
}
