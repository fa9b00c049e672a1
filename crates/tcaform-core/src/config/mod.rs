//! Configuration system for tcaform
//!
//! - JSON, TOML and YAML configuration files
//! - Auto-discovery by traversing up directories
//! - Configuration inheritance through the `extends` field
//! - Strong typing with serde and JSON Schema generation via schemars
//!
//! ## Configuration Discovery
//!
//! Without an explicit path the loader looks for `.tcaformrc.json`,
//! `.tcaformrc.toml`, `tcaform.yaml`, `tcaform.yml` and `tcaform.json`, starting
//! in the current directory and moving up until one is found.
//!
//! ## Example Configuration
//!
//! ```yaml
//! root: true
//! extends:
//!   - ../shared/tcaform.yaml
//! compiler:
//!   defaultTabLabel: general
//!   baseTypeKey: "1"
//!   canonicalPaletteCompare: true
//! output:
//!   format: json
//!   pretty: true
//! ```

mod loader;
mod merge;
mod tcaform_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use tcaform_config::{
    CompilerConfiguration, CompilerOptions, OutputConfiguration, OutputFormat, TcaformConfig,
};
