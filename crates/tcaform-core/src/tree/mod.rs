//! In-memory form tree
//!
//! A [`FormTree`] holds the layout of one table (or one table type) as tabs
//! containing palettes, fields and line breaks. Nodes are addressed by id and
//! every id resolves to at most one node anywhere in the tree.
//!
//! ## Node ids
//!
//! - tabs: sequential numbers (`"0"`, `"1"`, ...) unless created with an explicit id
//! - palettes: `palette:` followed by the palette name (`palette:access`)
//! - fields: the column name
//! - line breaks: generated (`--linebreak-1--`)

mod form_tree;
mod meta;
mod node;
mod position;

pub use form_tree::{DEFAULT_TAB_LABEL, FormTree, NodeMut, palette_node_id};
pub use meta::LayoutMeta;
pub use node::{ColumnConfig, Node, NodeData, NodeKind};
pub use position::Position;
