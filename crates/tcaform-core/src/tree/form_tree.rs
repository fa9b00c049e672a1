//! The form tree aggregate
//!
//! All nodes live in one arena (`index`) keyed by id. Containers keep the
//! ordered ids of their children and every node keeps the id of its parent,
//! so there are no owning cycles and lookups by id are O(1) at any depth.

use super::meta::LayoutMeta;
use super::node::{ColumnConfig, Node, NodeData, NodeKind};
use super::position::Position;
use crate::error::TcaError;
use crate::result::Result;
use indexmap::IndexMap;
use tracing::trace;

/// Label of the tab created when a tree needs one and has none
pub const DEFAULT_TAB_LABEL: &str = "general";

/// Arena id of a palette node
///
/// Palettes live in their own `palette:` namespace so that a palette and a
/// field may share a TCA name. Column names never contain a colon.
pub fn palette_node_id(palette_id: &str) -> String {
    format!("palette:{palette_id}")
}

#[derive(Debug, Clone, Copy)]
enum Anchor<'a> {
    Start,
    End,
    Before(&'a str),
    After(&'a str),
}

/// Layout of one table or one table type
#[derive(Debug, Clone)]
pub struct FormTree {
    elements: Vec<String>,
    index: IndexMap<String, Node>,
    default_tab_label: String,
    line_break_seq: usize,
}

impl Default for FormTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FormTree {
    pub fn new() -> Self {
        Self::with_default_tab_label(DEFAULT_TAB_LABEL)
    }

    pub fn with_default_tab_label(label: impl Into<String>) -> Self {
        Self {
            elements: Vec::new(),
            index: IndexMap::new(),
            default_tab_label: label.into(),
            line_break_seq: 0,
        }
    }

    pub fn default_tab_label(&self) -> &str {
        &self.default_tab_label
    }

    /// Drop every node
    pub fn reset(&mut self) {
        self.elements.clear();
        self.index.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of nodes at any depth
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.index.get_mut(id)
    }

    pub fn has_palette(&self, palette_id: &str) -> bool {
        self.find_palette(palette_id).is_some()
    }

    pub fn find_palette(&self, palette_id: &str) -> Option<&Node> {
        self.index
            .get(&palette_node_id(palette_id))
            .filter(|node| node.kind() == NodeKind::Palette)
    }

    pub fn find_field(&self, id: &str) -> Option<&Node> {
        self.index
            .get(id)
            .filter(|node| node.kind() == NodeKind::Field)
    }

    pub fn tab_ids(&self) -> &[String] {
        &self.elements
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Node> {
        self.elements.iter().filter_map(|id| self.index.get(id))
    }

    /// Children of a container in render order
    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &Node> {
        self.index
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.index.get(child))
    }

    /// Every node in render order (depth first)
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = Vec::with_capacity(self.index.len());
        let mut stack: Vec<&str> = self.elements.iter().rev().map(String::as_str).collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.index.get(id) {
                out.push(node);
                stack.extend(node.children.iter().rev().map(String::as_str));
            }
        }
        out
    }

    /// Fields in render order
    pub fn fields(&self) -> impl Iterator<Item = &Node> {
        self.walk()
            .into_iter()
            .filter(|node| node.kind() == NodeKind::Field)
    }

    /// Create the default tab if the tree has no tab yet, returning the id of the last tab
    pub fn ensure_initial_tab(&mut self) -> Result<String> {
        if let Some(last) = self.elements.last() {
            return Ok(last.clone());
        }

        let id = self.next_tab_id();
        let label = self.default_tab_label.clone();
        self.attach_new(&id, NodeData::Tab)?;
        if let Some(node) = self.index.get_mut(&id) {
            node.set_label(Some(&label));
        }
        trace!("Created initial tab '{}'", id);
        Ok(id)
    }

    /// Create or fetch a tab
    pub fn tab(&mut self, id: &str) -> Result<NodeMut<'_>> {
        self.create_or_fetch(id, NodeKind::Tab, || NodeData::Tab)?;
        Ok(NodeMut::new(self, id.to_string()))
    }

    /// Create a tab with the next free sequential id
    pub fn add_tab(&mut self) -> Result<NodeMut<'_>> {
        let id = self.next_tab_id();
        self.attach_new(&id, NodeData::Tab)?;
        Ok(NodeMut::new(self, id))
    }

    /// Create or fetch a palette by its TCA name
    pub fn palette(&mut self, palette_id: &str) -> Result<NodeMut<'_>> {
        let id = palette_node_id(palette_id);
        self.create_or_fetch(&id, NodeKind::Palette, || NodeData::Palette {
            palette_id: palette_id.to_string(),
        })?;
        Ok(NodeMut::new(self, id))
    }

    /// Create (with an empty config) or fetch a field
    pub fn field(&mut self, id: &str) -> Result<NodeMut<'_>> {
        self.field_with(id, ColumnConfig::new)
    }

    /// Create or fetch a field; `init` provides the config of a new field
    pub fn field_with(
        &mut self,
        id: &str,
        init: impl FnOnce() -> ColumnConfig,
    ) -> Result<NodeMut<'_>> {
        self.create_or_fetch(id, NodeKind::Field, || NodeData::Field { config: init() })?;
        Ok(NodeMut::new(self, id.to_string()))
    }

    /// Insert a new line break at `position`
    pub fn line_break(&mut self, position: &str) -> Result<NodeMut<'_>> {
        let position: Position = position.parse()?;
        let id = loop {
            self.line_break_seq += 1;
            let candidate = format!("--linebreak-{}--", self.line_break_seq);
            if !self.index.contains_key(&candidate) {
                break candidate;
            }
        };

        self.index
            .insert(id.clone(), Node::new(id.clone(), NodeData::LineBreak));
        if let Err(err) = self.move_to_position(&id, &position) {
            self.index.shift_remove(&id);
            return Err(err);
        }
        Ok(NodeMut::new(self, id))
    }

    /// Handle to an existing node
    pub fn node_mut(&mut self, id: &str) -> Option<NodeMut<'_>> {
        if self.index.contains_key(id) {
            Some(NodeMut::new(self, id.to_string()))
        } else {
            None
        }
    }

    /// Move a node; see [`Position`] for the accepted strings
    pub fn move_to(&mut self, id: &str, position: &str) -> Result<()> {
        let position: Position = position.parse()?;
        self.move_to_position(id, &position)
    }

    pub fn move_to_position(&mut self, id: &str, position: &Position) -> Result<()> {
        let kind = self
            .index
            .get(id)
            .map(Node::kind)
            .ok_or_else(|| TcaError::node_not_found(id))?;

        if position.target() == Some(id) {
            return Ok(());
        }

        let (parent, anchor) = match position {
            Position::Default => {
                if kind == NodeKind::Tab {
                    (None, Anchor::End)
                } else {
                    (Some(self.ensure_initial_tab()?), Anchor::End)
                }
            }
            Position::Top(target) | Position::Bottom(target) => {
                let container = self.expect_node(target)?;
                if !container.kind().can_contain(kind) {
                    return Err(TcaError::InvalidNesting {
                        child: kind.to_string(),
                        location: format!("inside {} '{}'", container.kind(), target),
                    });
                }
                let anchor = if matches!(position, Position::Top(_)) {
                    Anchor::Start
                } else {
                    Anchor::End
                };
                (Some(target.clone()), anchor)
            }
            Position::Before(target) | Position::After(target) => {
                let sibling = self.expect_node(target)?;
                let parent = sibling.parent.clone();
                match &parent {
                    None if kind != NodeKind::Tab => {
                        return Err(TcaError::InvalidNesting {
                            child: kind.to_string(),
                            location: format!("next to tab '{target}' at the top level"),
                        });
                    }
                    Some(parent_id) => {
                        let container = self.expect_node(parent_id)?;
                        if !container.kind().can_contain(kind) {
                            return Err(TcaError::InvalidNesting {
                                child: kind.to_string(),
                                location: format!("inside {} '{}'", container.kind(), parent_id),
                            });
                        }
                    }
                    None => {}
                }
                let anchor = if matches!(position, Position::Before(_)) {
                    Anchor::Before(target)
                } else {
                    Anchor::After(target)
                };
                (parent, anchor)
            }
        };

        self.detach(id);
        self.insert_at(id, parent.as_deref(), anchor);
        trace!("Moved {} '{}' to '{}'", kind, id, position);
        Ok(())
    }

    /// Remove a node and all of its descendants, returning the removed nodes
    pub fn remove(&mut self, id: &str) -> Result<Vec<Node>> {
        if !self.index.contains_key(id) {
            return Err(TcaError::node_not_found(id));
        }

        let mut ids = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.index.get(&current) {
                stack.extend(node.children.iter().rev().cloned());
            }
            ids.push(current);
        }

        self.detach(id);
        let removed = ids
            .iter()
            .filter_map(|id| self.index.shift_remove(id))
            .collect();
        trace!("Removed '{}' and {} descendants", id, ids.len() - 1);
        Ok(removed)
    }

    fn expect_node(&self, id: &str) -> Result<&Node> {
        self.index.get(id).ok_or_else(|| TcaError::node_not_found(id))
    }

    fn next_tab_id(&self) -> String {
        (self.elements.len()..)
            .map(|n| n.to_string())
            .find(|id| !self.index.contains_key(id))
            .unwrap_or_default()
    }

    fn create_or_fetch(
        &mut self,
        id: &str,
        kind: NodeKind,
        data: impl FnOnce() -> NodeData,
    ) -> Result<bool> {
        if let Some(existing) = self.index.get(id) {
            if existing.kind() != kind {
                return Err(TcaError::IdCollision {
                    id: id.to_string(),
                    existing: existing.kind().to_string(),
                    requested: kind.to_string(),
                });
            }
            return Ok(false);
        }
        self.attach_new(id, data())?;
        Ok(true)
    }

    fn attach_new(&mut self, id: &str, data: NodeData) -> Result<()> {
        if let Some(existing) = self.index.get(id) {
            return Err(TcaError::IdCollision {
                id: id.to_string(),
                existing: existing.kind().to_string(),
                requested: data.kind().to_string(),
            });
        }
        trace!("Creating {} '{}'", data.kind(), id);
        self.index.insert(id.to_string(), Node::new(id, data));
        if let Err(err) = self.move_to_position(id, &Position::Default) {
            self.index.shift_remove(id);
            return Err(err);
        }
        Ok(())
    }

    fn detach(&mut self, id: &str) {
        let parent = self.index.get_mut(id).and_then(|node| node.parent.take());
        match parent {
            Some(parent_id) => {
                if let Some(parent) = self.index.get_mut(&parent_id) {
                    parent.children.retain(|child| child != id);
                }
            }
            None => self.elements.retain(|element| element != id),
        }
    }

    fn insert_at(&mut self, id: &str, parent: Option<&str>, anchor: Anchor<'_>) {
        let siblings = match parent {
            Some(parent_id) => match self.index.get_mut(parent_id) {
                Some(node) => &mut node.children,
                None => return,
            },
            None => &mut self.elements,
        };

        let at = match anchor {
            Anchor::Start => 0,
            Anchor::End => siblings.len(),
            Anchor::Before(sibling) => siblings
                .iter()
                .position(|s| s == sibling)
                .unwrap_or(siblings.len()),
            Anchor::After(sibling) => siblings
                .iter()
                .position(|s| s == sibling)
                .map_or(siblings.len(), |i| i + 1),
        };
        siblings.insert(at, id.to_string());

        if let Some(node) = self.index.get_mut(id) {
            node.parent = parent.map(str::to_string);
        }
    }
}

/// Chainable handle to one node of a [`FormTree`]
///
/// ```
/// use tcaform_core::FormTree;
///
/// let mut tree = FormTree::new();
/// tree.field("title")?.label("Title").move_to("")?;
/// tree.palette("access")?.label("Access");
/// tree.field("hidden")?.move_to("bottom:palette:access")?;
///
/// assert_eq!(tree.tab_ids(), &["0"]);
/// assert_eq!(tree.get("hidden").and_then(|n| n.parent()), Some("palette:access"));
/// # Ok::<(), tcaform_core::TcaError>(())
/// ```
#[derive(Debug)]
pub struct NodeMut<'a> {
    tree: &'a mut FormTree,
    id: String,
}

impl<'a> NodeMut<'a> {
    fn new(tree: &'a mut FormTree, id: String) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node(&self) -> &Node {
        &self.tree.index[self.id.as_str()]
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.tree.index[self.id.as_str()]
    }

    pub fn label(mut self, label: impl AsRef<str>) -> Self {
        self.node_mut().set_label(Some(label.as_ref()));
        self
    }

    pub fn clear_label(mut self) -> Self {
        self.node_mut().set_label(None);
        self
    }

    pub fn meta(mut self, meta: LayoutMeta) -> Self {
        self.node_mut().set_meta(meta);
        self
    }

    pub fn move_to(self, position: &str) -> Result<Self> {
        self.tree.move_to(&self.id, position)?;
        Ok(self)
    }

    pub fn config_mut(&mut self) -> Option<&mut ColumnConfig> {
        self.node_mut().config_mut()
    }

    /// Edit the config of a field node; no-op for other kinds
    pub fn configure(mut self, edit: impl FnOnce(&mut ColumnConfig)) -> Self {
        if let Some(config) = self.config_mut() {
            edit(config);
        }
        self
    }

    pub fn remove(self) -> Result<Vec<Node>> {
        self.tree.remove(&self.id)
    }

    pub fn into_id(self) -> String {
        self.id
    }
}
