//! Palette merging across table types

use crate::PaletteMap;
use crate::error::TcaError;
use crate::result::Result;
use crate::showitem;
use regex::{Captures, Regex};
use tracing::{debug, warn};

/// Result of merging one type's palettes into the shared set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteMerge {
    /// The type's show-item with renamed palette references
    pub showitem: String,
    /// `(original id, new id)` for every renamed palette
    pub renamed: Vec<(String, String)>,
}

fn same_layout(a: &str, b: &str, canonical: bool) -> bool {
    a == b || (canonical && showitem::canonicalize(a) == showitem::canonicalize(b))
}

/// Fold the palettes of type `type_key` into `base`
///
/// A palette equal to the shared one of the same name is reused, an unknown
/// name is added as is. A name taken by a different layout is stored as
/// `{type_key}-{palette}` and the references in `type_showitem` are rewritten.
/// With `canonical` set, layouts differing only in whitespace or trailing
/// empty parts count as equal.
pub fn merge_palettes(
    type_key: &str,
    base: &mut PaletteMap,
    type_palettes: &PaletteMap,
    type_showitem: &str,
    canonical: bool,
) -> Result<PaletteMerge> {
    let mut merged = PaletteMerge {
        showitem: type_showitem.to_string(),
        renamed: Vec::new(),
    };

    for (palette_id, layout) in type_palettes {
        match base.get(palette_id) {
            Some(existing) if same_layout(existing, layout, canonical) => continue,
            None => {
                base.insert(palette_id.clone(), layout.clone());
                continue;
            }
            Some(_) => {}
        }

        let renamed_id = format!("{type_key}-{palette_id}");
        match base.get(&renamed_id) {
            Some(existing) if same_layout(existing, layout, canonical) => {}
            Some(_) => {
                warn!(
                    "Palette '{}' of type '{}' replaces the existing palette '{}'",
                    palette_id, type_key, renamed_id
                );
                base.insert(renamed_id.clone(), layout.clone());
            }
            None => {
                base.insert(renamed_id.clone(), layout.clone());
            }
        }

        debug!(
            "Renamed palette '{}' to '{}' for type '{}'",
            palette_id, renamed_id, type_key
        );
        merged.showitem = rename_palette_reference(&merged.showitem, palette_id, &renamed_id)?;
        merged.renamed.push((palette_id.clone(), renamed_id));
    }

    Ok(merged)
}

/// Point every `--palette--` item referencing `from` at `to`
///
/// Only the last part of a palette item is matched, so fields or labels that
/// merely contain the palette name are left alone. Everything else in the
/// string is kept byte for byte.
pub fn rename_palette_reference(showitem: &str, from: &str, to: &str) -> Result<String> {
    let pattern = format!(
        r"^(?P<head>\s*(?i:--palette--)\s*(?:;[^;]*)*;\s*){}(?P<tail>\s*)$",
        regex::escape(from)
    );
    let re = Regex::new(&pattern).map_err(|err| {
        TcaError::internal_error(format!("Invalid palette reference pattern: {err}"))
    })?;

    let segments: Vec<String> = showitem
        .split(',')
        .map(|segment| {
            re.replace(segment, |caps: &Captures| {
                format!("{}{}{}", &caps["head"], to, &caps["tail"])
            })
            .into_owned()
        })
        .collect();
    Ok(segments.join(","))
}
