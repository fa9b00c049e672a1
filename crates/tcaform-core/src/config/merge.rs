//! Configuration merging logic
//!
//! Combines a configuration with the files it `extends`.

use super::tcaform_config::*;

impl TcaformConfig {
    /// Merge another config into this one (current takes precedence)
    ///
    /// The `$schema`, `root` and `extends` fields are file-specific and not merged.
    pub fn merge_with(&mut self, other: TcaformConfig) {
        if let Some(other_compiler) = other.compiler {
            if let Some(ref mut compiler) = self.compiler {
                compiler.merge_with(other_compiler);
            } else {
                self.compiler = Some(other_compiler);
            }
        }

        if let Some(other_output) = other.output {
            if let Some(ref mut output) = self.output {
                output.merge_with(other_output);
            } else {
                self.output = Some(other_output);
            }
        }
    }
}

impl CompilerConfiguration {
    pub fn merge_with(&mut self, other: CompilerConfiguration) {
        if self.default_tab_label.is_none() {
            self.default_tab_label = other.default_tab_label;
        }
        if self.base_type_key.is_none() {
            self.base_type_key = other.base_type_key;
        }
        if self.canonical_palette_compare.is_none() {
            self.canonical_palette_compare = other.canonical_palette_compare;
        }
    }
}

impl OutputConfiguration {
    pub fn merge_with(&mut self, other: OutputConfiguration) {
        if self.format.is_none() {
            self.format = other.format;
        }
        if self.pretty.is_none() {
            self.pretty = other.pretty;
        }
    }
}
