//! Show-item grammar
//!
//! Stateless parser and serializer for the comma/semicolon delimited layout
//! strings stored in `types.*.showitem` and `palettes.*.showitem`:
//!
//! ```text
//! showitem := item (',' item)*
//! item     := part (';' part)*
//! ```
//!
//! Items and parts are trimmed, empty items are dropped. An item whose first
//! part is wrapped in `--` is a special item (`--div--`, `--palette--`,
//! `--linebreak--`); every other item references a field.
//!
//! # Example
//!
//! ```
//! use tcaform_core::showitem::{self, ItemKind, SpecialToken};
//!
//! let items = showitem::parse("--div--;General, title;Title ,--palette--;;access,");
//! assert_eq!(items.len(), 3);
//! assert_eq!(items[1], vec!["title".to_string(), "Title".to_string()]);
//! assert_eq!(showitem::classify(&items[0]), ItemKind::Special(SpecialToken::Div));
//! assert_eq!(showitem::serialize(&items), "--div--;General,title;Title,--palette--;;access");
//! ```

use std::fmt;

/// One parsed item: its semicolon separated parts
pub type ShowItem = Vec<String>;

/// Literal token emitted for line breaks inside palettes
pub const LINEBREAK_ITEM: &str = "--linebreak--";
pub const DIV_ITEM: &str = "--div--";
pub const PALETTE_ITEM: &str = "--palette--";

/// Token between the dashes of a special item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialToken {
    Div,
    Palette,
    LineBreak,
    /// Anything else; always a structural error for the layout compiler
    Unknown(String),
}

impl SpecialToken {
    fn from_inner(inner: &str) -> Self {
        match inner.to_ascii_lowercase().as_str() {
            "div" => SpecialToken::Div,
            "palette" => SpecialToken::Palette,
            "linebreak" => SpecialToken::LineBreak,
            other => SpecialToken::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for SpecialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialToken::Div => f.write_str("div"),
            SpecialToken::Palette => f.write_str("palette"),
            SpecialToken::LineBreak => f.write_str("linebreak"),
            SpecialToken::Unknown(token) => f.write_str(token),
        }
    }
}

/// Classification of a parsed item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind<'a> {
    Special(SpecialToken),
    Field(&'a str),
}

/// Parse a show-item string into its items
pub fn parse(showitem: &str) -> Vec<ShowItem> {
    showitem
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment.contains(';') {
                segment
                    .split(';')
                    .map(|part| part.trim().to_string())
                    .collect()
            } else {
                vec![segment.to_string()]
            }
        })
        .collect()
}

/// Serialize items back into a show-item string
pub fn serialize(items: &[ShowItem]) -> String {
    items
        .iter()
        .map(|item| item.join(";"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Returns the special token of a part like `--div--`, if it is one
pub fn special_token(part: &str) -> Option<SpecialToken> {
    let part = part.trim();
    if part.len() >= 4 && part.starts_with("--") && part.ends_with("--") {
        Some(SpecialToken::from_inner(&part[2..part.len() - 2]))
    } else {
        None
    }
}

/// Classify an item by its first part
pub fn classify(item: &[String]) -> ItemKind<'_> {
    let first = item.first().map(String::as_str).unwrap_or_default();
    match special_token(first) {
        Some(token) => ItemKind::Special(token),
        None => ItemKind::Field(first),
    }
}

/// Drops trailing empty parts, keeping at least the first part
pub fn trim_trailing_empty(item: &mut ShowItem) {
    while item.len() > 1 && item.last().is_some_and(|part| part.is_empty()) {
        item.pop();
    }
}

/// Whitespace and trailing-separator insensitive form of a show-item string
///
/// Two show-items with the same canonical form describe the same layout.
pub fn canonicalize(showitem: &str) -> String {
    let mut items = parse(showitem);
    for item in &mut items {
        trim_trailing_empty(item);
    }
    serialize(&items)
}
