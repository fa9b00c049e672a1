//! Column override diff

use crate::ColumnMap;
use crate::tree::ColumnConfig;
use serde_json::Value;
use tracing::{debug, trace};

/// Compare two configuration values the way the stored configuration does
///
/// Numbers and numeric strings compare by value (`"1" == 1`, `"1.0" == "1"`),
/// arrays and objects compare element-wise with the same rules, everything
/// else compares strictly.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            numeric_string(s).is_some_and(|parsed| n.as_f64() == Some(parsed))
        }
        (Value::String(x), Value::String(y)) => {
            x == y
                || matches!(
                    (numeric_string(x), numeric_string(y)),
                    (Some(l), Some(r)) if l == r
                )
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| loose_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| loose_eq(l, r)))
        }
        _ => a == b,
    }
}

/// Value of a decimal numeric string, surrounding whitespace allowed
fn numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let digits = trimmed.bytes().any(|b| b.is_ascii_digit());
    let charset = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !digits || !charset {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Keys of `derived` that differ from `base`
///
/// Missing keys and unequal values are kept verbatim, nested objects are
/// diffed recursively and kept only when something inside them changed.
pub fn diff_config(base: &ColumnConfig, derived: &ColumnConfig) -> ColumnConfig {
    let mut diff = ColumnConfig::new();
    for (key, value) in derived {
        match (base.get(key), value) {
            (None, _) => {
                diff.insert(key.clone(), value.clone());
            }
            (Some(Value::Object(inner_base)), Value::Object(inner_derived)) => {
                let inner = diff_config(inner_base, inner_derived);
                if !inner.is_empty() {
                    diff.insert(key.clone(), Value::Object(inner));
                }
            }
            (Some(existing), _) => {
                if !loose_eq(existing, value) {
                    diff.insert(key.clone(), value.clone());
                }
            }
        }
    }
    diff
}

/// Minimal per-field overrides of `type_columns` against `base`
///
/// Fields the base does not know are recorded as whole overrides when
/// `is_real` says they are real columns of the table; dummy columns are
/// merged into `base` instead and produce no override.
pub fn build_column_overrides(
    base: &mut ColumnMap,
    type_columns: &ColumnMap,
    is_real: impl Fn(&str) -> bool,
) -> ColumnMap {
    let mut overrides = ColumnMap::new();
    if *base == *type_columns {
        return overrides;
    }

    for (id, config) in type_columns {
        let Some(base_config) = base.get(id) else {
            if is_real(id) {
                overrides.insert(id.clone(), config.clone());
            } else {
                debug!("Merging dummy column '{}' into base columns", id);
                base.insert(id.clone(), config.clone());
            }
            continue;
        };

        if base_config == config {
            continue;
        }
        let diff = diff_config(base_config, config);
        if !diff.is_empty() {
            trace!("Column '{}' overrides {} keys", id, diff.len());
            overrides.insert(id.clone(), diff);
        }
    }

    overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> ColumnConfig {
        value.as_object().cloned().unwrap_or_default()
    }

    fn columns(value: Value) -> ColumnMap {
        value
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(id, cfg)| (id.clone(), config(cfg.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_loose_eq_numbers_and_numeric_strings() {
        assert!(loose_eq(&json!("1"), &json!(1)));
        assert!(loose_eq(&json!(1), &json!("1")));
        assert!(loose_eq(&json!(1.0), &json!(1)));
        assert!(loose_eq(&json!("1.0"), &json!("1")));
        assert!(loose_eq(&json!(" 30 "), &json!(30)));
        assert!(loose_eq(&json!("1e1"), &json!(10)));
        assert!(loose_eq(&json!(["1", 2]), &json!([1, "2"])));
        assert!(loose_eq(&json!({"size": "30"}), &json!({"size": 30})));
    }

    #[test]
    fn test_loose_eq_stays_strict_otherwise() {
        assert!(!loose_eq(&json!("abc"), &json!(0)));
        assert!(!loose_eq(&json!("1"), &json!(2)));
        assert!(!loose_eq(&json!("inf"), &json!(f64::MAX)));
        assert!(!loose_eq(&json!(true), &json!(1)));
        assert!(!loose_eq(&json!(null), &json!("")));
        assert!(!loose_eq(&json!("a"), &json!("A")));
        assert!(!loose_eq(&json!([1]), &json!([1, 1])));
        assert!(!loose_eq(&json!({"a": 1}), &json!({"b": 1})));
    }

    #[test]
    fn test_diff_config_keeps_only_changes() {
        let base = config(json!({
            "label": "Title",
            "exclude": 1,
            "config": {"type": "input", "size": 30, "eval": "trim"}
        }));
        let derived = config(json!({
            "label": "Headline",
            "exclude": "1",
            "config": {"type": "input", "size": "30", "eval": "trim,required", "max": 80}
        }));

        assert_eq!(
            Value::Object(diff_config(&base, &derived)),
            json!({"label": "Headline", "config": {"eval": "trim,required", "max": 80}})
        );
    }

    #[test]
    fn test_diff_config_drops_unchanged_nested_objects() {
        let base = config(json!({"config": {"type": "check", "items": [["On", 1]]}}));
        let derived = config(json!({"config": {"type": "check", "items": [["On", "1"]]}}));
        assert!(diff_config(&base, &derived).is_empty());
    }

    #[test]
    fn test_diff_config_object_replacing_scalar() {
        let base = config(json!({"displayCond": "FIELD:hidden:=:0"}));
        let derived = config(json!({"displayCond": {"AND": ["FIELD:hidden:=:0"]}}));
        assert_eq!(
            Value::Object(diff_config(&base, &derived)),
            json!({"displayCond": {"AND": ["FIELD:hidden:=:0"]}})
        );
    }

    #[test]
    fn test_identical_columns_produce_no_overrides() {
        let base = columns(json!({
            "title": {"label": "Title", "config": {"type": "input"}},
            "hidden": {"config": {"type": "check"}}
        }));
        let mut working = base.clone();
        let overrides = build_column_overrides(&mut working, &base, |_| true);
        assert!(overrides.is_empty());
        assert_eq!(working, base);
    }

    #[test]
    fn test_new_real_field_is_recorded_whole() {
        let mut base = columns(json!({"title": {"label": "Title"}}));
        let mut derived = base.clone();
        derived.insert("subtitle".to_string(), config(json!({"label": "Sub", "config": {"type": "input"}})));

        let overrides = build_column_overrides(&mut base, &derived, |id| id == "subtitle");
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides["subtitle"], derived["subtitle"]);
        assert!(!base.contains_key("subtitle"));
    }

    #[test]
    fn test_new_dummy_field_is_merged_into_base() {
        let mut base = columns(json!({"title": {"label": "Title"}}));
        let mut derived = base.clone();
        derived.insert("sys_language_uid".to_string(), ColumnConfig::new());

        let overrides = build_column_overrides(&mut base, &derived, |_| false);
        assert!(overrides.is_empty());
        assert_eq!(base["sys_language_uid"], ColumnConfig::new());
    }

    #[test]
    fn test_changed_field_records_recursive_diff() {
        let mut base = columns(json!({
            "title": {"label": "Title", "config": {"type": "input", "size": 30}},
            "bodytext": {"label": "Text", "config": {"type": "text"}}
        }));
        let derived = columns(json!({
            "title": {"label": "Title", "config": {"type": "input", "size": 50}},
            "bodytext": {"label": "Text", "config": {"type": "text", "enableRichtext": true}}
        }));

        let overrides = build_column_overrides(&mut base, &derived, |_| true);
        assert_eq!(
            serde_json::to_value(&overrides).unwrap(),
            json!({
                "title": {"config": {"size": 50}},
                "bodytext": {"config": {"enableRichtext": true}}
            })
        );
    }

    #[test]
    fn test_base_only_fields_are_ignored() {
        let mut base = columns(json!({"title": {"label": "Title"}, "hidden": {}}));
        let derived = columns(json!({"title": {"label": "Title"}}));
        assert!(build_column_overrides(&mut base, &derived, |_| true).is_empty());
    }
}
