//! Configuration file discovery and loading

use super::TcaformConfig;
use crate::error::TcaError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// Config file names in discovery priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".tcaformrc.json",
    ".tcaformrc.toml",
    "tcaform.yaml",
    "tcaform.yml",
    "tcaform.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// In each directory the names of [`CONFIG_FILE_NAMES`] are tried in
    /// order; the search stops at the first hit or at the filesystem root.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| TcaError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file, resolving `extends`
    pub fn load_from_file(path: &Path) -> Result<TcaformConfig> {
        let mut chain = Vec::new();
        Self::load_chain(path, &mut chain)
    }

    fn load_chain(path: &Path, chain: &mut Vec<PathBuf>) -> Result<TcaformConfig> {
        let canonical = path.canonicalize().map_err(|e| {
            TcaError::config_error(format!("Config file not found: {} ({e})", path.display()))
        })?;
        if chain.contains(&canonical) {
            return Err(TcaError::config_error(format!(
                "Circular extends chain: {}",
                chain
                    .iter()
                    .chain(std::iter::once(&canonical))
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(" -> ")
            )));
        }

        let mut config = TcaformConfig::load(&canonical)?;
        let Some(extends) = config.extends.clone() else {
            return Ok(config);
        };

        chain.push(canonical.clone());
        let base_dir = canonical.parent().unwrap_or_else(|| Path::new("."));
        for parent in extends {
            let parent_path = base_dir.join(&parent);
            tracing::debug!(
                "{} extends {}",
                canonical.display(),
                parent_path.display()
            );
            let parent_config = Self::load_chain(&parent_path, chain)?;
            config.merge_with(parent_config);
        }
        chain.pop();

        Ok(config)
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, the configuration is
    /// discovered from `start_dir` (or the current directory); when nothing is
    /// found the defaults are used.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<TcaformConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(TcaError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(TcaformConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_auto_discover_from_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("ext/site/Configuration/TCA");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "tcaform.yaml", "root: true\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "tcaform.yaml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "tcaform.json", "{}");
        create_temp_config(temp_dir.path(), ".tcaformrc.toml", "");
        create_temp_config(temp_dir.path(), "tcaform.yml", "{}");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".tcaformrc.toml");
    }

    #[test]
    fn test_extends_resolution() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("shared")).unwrap();
        create_temp_config(
            &temp_dir.path().join("shared"),
            "base.json",
            r#"{"compiler": {"defaultTabLabel": "main", "baseTypeKey": "1"}, "output": {"format": "yaml"}}"#,
        );
        let path = create_temp_config(
            temp_dir.path(),
            "tcaform.json",
            r#"{"extends": ["shared/base.json"], "compiler": {"baseTypeKey": "textmedia"}}"#,
        );

        let config = ConfigLoader::load_from_file(&path).unwrap();
        let options = config.compiler_options();
        assert_eq!(options.default_tab_label, "main");
        assert_eq!(options.base_type_key.as_deref(), Some("textmedia"));
        assert_eq!(config.output_format(), OutputFormat::Yaml);
    }

    #[test]
    fn test_circular_extends_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "a.json", r#"{"extends": ["b.json"]}"#);
        let b = create_temp_config(temp_dir.path(), "b.json", r#"{"extends": ["a.json"]}"#);

        let err = ConfigLoader::load_from_file(&b).unwrap_err();
        assert!(matches!(err, TcaError::ConfigError { .. }));
        assert!(err.to_string().contains("Circular"));
    }

    #[test]
    fn test_load_without_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        assert!(ConfigLoader::load(None, Some(temp_dir.path())).is_ok());
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.json")), None);
        assert!(matches!(result, Err(TcaError::ConfigError { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "tcaform.json", r#"{ invalid json }"#);
        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }
}
