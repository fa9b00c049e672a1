//! Tree nodes: tabs, palettes, fields and line breaks

use super::meta::LayoutMeta;
use serde_json::Value;
use std::fmt;

/// Per-field configuration payload (one entry of the table's `columns`)
pub type ColumnConfig = serde_json::Map<String, Value>;

/// Node variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Tab,
    Palette,
    Field,
    LineBreak,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Tab => "tab",
            NodeKind::Palette => "palette",
            NodeKind::Field => "field",
            NodeKind::LineBreak => "line break",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Tab | NodeKind::Palette)
    }

    /// Nesting rules: tabs hold everything but tabs, palettes hold fields and line breaks
    pub fn can_contain(self, child: NodeKind) -> bool {
        match self {
            NodeKind::Tab => !matches!(child, NodeKind::Tab),
            NodeKind::Palette => matches!(child, NodeKind::Field | NodeKind::LineBreak),
            NodeKind::Field | NodeKind::LineBreak => false,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Variant specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Tab,
    Palette { palette_id: String },
    Field { config: ColumnConfig },
    LineBreak,
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Tab => NodeKind::Tab,
            NodeData::Palette { .. } => NodeKind::Palette,
            NodeData::Field { .. } => NodeKind::Field,
            NodeData::LineBreak => NodeKind::LineBreak,
        }
    }
}

/// A node stored in the [`FormTree`](super::FormTree) arena
///
/// Parent and children are ids into the same arena; only the tree mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: String,
    pub(crate) meta: LayoutMeta,
    pub(crate) parent: Option<String>,
    pub(crate) children: Vec<String>,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(id: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            meta: LayoutMeta::new(),
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Display label, read from the label slot of the layout meta
    pub fn label(&self) -> Option<&str> {
        self.meta.label()
    }

    /// Replace the label; `None` clears the label slot
    pub fn set_label(&mut self, label: Option<&str>) {
        match label {
            Some(label) => self.meta.set(0, label),
            None if !self.meta.is_empty() => self.meta.set(0, ""),
            None => {}
        }
    }

    pub fn meta(&self) -> &LayoutMeta {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: LayoutMeta) {
        self.meta = meta;
    }

    /// Id of the containing tab or palette, `None` for top-level tabs
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Ordered child ids (empty for leaves)
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// TCA palette name for palette nodes
    pub fn palette_id(&self) -> Option<&str> {
        match &self.data {
            NodeData::Palette { palette_id } => Some(palette_id),
            _ => None,
        }
    }

    pub fn config(&self) -> Option<&ColumnConfig> {
        match &self.data {
            NodeData::Field { config } => Some(config),
            _ => None,
        }
    }

    pub fn config_mut(&mut self) -> Option<&mut ColumnConfig> {
        match &mut self.data {
            NodeData::Field { config } => Some(config),
            _ => None,
        }
    }
}
