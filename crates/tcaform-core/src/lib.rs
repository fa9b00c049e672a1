//! tcaform core
//!
//! Form-tree builder and show-item compiler for TCA table configuration.
//! This crate provides the in-memory layout tree, the show-item grammar, the
//! layout compiler that converts between the two, and the type compiler that
//! reduces derived table types to column overrides and shared palettes.

pub mod config;
pub mod error;
pub mod layout;
pub mod resolver;
pub mod result;
pub mod showitem;
pub mod sql;
pub mod table;
pub mod table_type;
pub mod tree;

use indexmap::IndexMap;

/// Column configurations keyed by field id, in document order
pub type ColumnMap = IndexMap<String, ColumnConfig>;

/// Palette show-items keyed by palette id, in document order
pub type PaletteMap = IndexMap<String, String>;

// Re-export commonly used types
pub use config::{
    CompilerOptions, ConfigLoader, OutputConfiguration, OutputFormat, TcaformConfig,
};
pub use error::{ErrorKind, TcaError};
pub use layout::{LayoutCompiler, LayoutDump};
pub use resolver::{BaseTableResolver, CachedResolver, FieldConfigResolver, ResolverCache};
pub use result::{Result, ResultExt};
pub use showitem::{ItemKind, ShowItem, SpecialToken};
pub use sql::{InMemorySqlRegistry, SqlRegistry};
pub use table::{TableType, TcaTable, TypeMut};
pub use table_type::{PaletteMerge, build_column_overrides, merge_palettes};
pub use tree::{
    ColumnConfig, DEFAULT_TAB_LABEL, FormTree, LayoutMeta, Node, NodeData, NodeKind, NodeMut,
    Position,
};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tcaform=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
