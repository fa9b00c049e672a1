//! Layout metadata attached to tree nodes

use serde::{Deserialize, Serialize};

/// Ordered show-item parts that follow a node's leading token
///
/// For `title;Title;;;icon` the meta is `["Title", "", "", "icon"]`, for
/// `--div--;General` it is `["General"]` and for `--palette--;Access;access`
/// it is `["Access"]` (the trailing palette id is not part of the meta).
/// Index 0 is the label slot for every node kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutMeta(Vec<String>);

impl LayoutMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Set a slot, padding missing slots with empty strings
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if self.0.len() <= index {
            self.0.resize(index + 1, String::new());
        }
        self.0[index] = value.into();
    }

    /// The label slot, if it holds a non-empty value
    pub fn label(&self) -> Option<&str> {
        self.get(0).filter(|label| !label.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
