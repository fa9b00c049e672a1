//! `tcaform parse`

use serde::Serialize;
use tcaform_core::showitem::{self, ItemKind, SpecialToken};
use tcaform_core::{Result, TcaError};

/// One show-item entry as printed by `tcaform parse`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ParsedItem {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub parts: Vec<String>,
}

/// Classify every entry of a show-item string
pub fn describe(showitem: &str) -> Result<Vec<ParsedItem>> {
    showitem::parse(showitem)
        .into_iter()
        .map(|item| {
            let mut label = item.get(1).filter(|label| !label.is_empty()).cloned();
            let (kind, id) = match showitem::classify(&item) {
                ItemKind::Field(id) => ("field".to_string(), Some(id.to_string())),
                ItemKind::Special(SpecialToken::Palette) => {
                    // the palette name is always the last part
                    let id = item.last().filter(|_| item.len() > 1).cloned();
                    if item.len() < 3 {
                        label = None;
                    }
                    ("palette".to_string(), id)
                }
                ItemKind::Special(SpecialToken::Unknown(token)) => {
                    return Err(TcaError::unknown_special_item(token, item.join(";")));
                }
                ItemKind::Special(token) => (token.to_string(), None),
            };
            Ok(ParsedItem {
                kind,
                id,
                label,
                parts: item,
            })
        })
        .collect()
}

/// Parse command implementation
pub fn parse_command(showitem: &str) -> Result<()> {
    let items = describe(showitem)?;
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}
