//! Layout compiler: show-item strings to form trees and back
//!
//! [`LayoutCompiler::populate`] builds a [`FormTree`](crate::FormTree) from a
//! type's `showitem` and the table's palette show-items, and
//! [`LayoutCompiler::dump`] turns a tree back into a `showitem` plus one
//! show-item per palette.
//!
//! # Example
//!
//! ```
//! use tcaform_core::{ColumnMap, FormTree, LayoutCompiler, PaletteMap};
//!
//! let mut columns = ColumnMap::new();
//! columns.insert("title".to_string(), Default::default());
//! columns.insert("hidden".to_string(), Default::default());
//! let mut palettes = PaletteMap::new();
//! palettes.insert("access".to_string(), "hidden".to_string());
//!
//! let compiler = LayoutCompiler::new();
//! let mut tree = FormTree::new();
//! compiler.populate(
//!     &mut tree,
//!     "--div--;General,title;Title,--palette--;;access",
//!     &palettes,
//!     &mut columns,
//!     None,
//! )?;
//!
//! let dump = compiler.dump(&tree);
//! assert_eq!(dump.showitem, "--div--;General,title;Title,--palette--;;access");
//! assert_eq!(dump.palettes["access"], "hidden");
//! # Ok::<(), tcaform_core::TcaError>(())
//! ```

mod dump;
mod populate;

pub use dump::LayoutDump;

/// Stateless driver for populate and dump
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutCompiler;

impl LayoutCompiler {
    pub fn new() -> Self {
        Self
    }
}
