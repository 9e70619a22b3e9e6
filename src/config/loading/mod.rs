mod circular_detection;
mod file_creation;
mod merging;

use super::{Config, ConfigPaths};
use crate::{ListenPartyError, Result};
use circular_detection::CircularDetector;
use merging::merge_toml_configs;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use toml::Value;
use tracing::{debug, instrument};

impl Config {
    /// Loads a configuration file with support for importing other TOML files
    ///
    /// Imports are listed in a top-level `imports` array using the `@` prefix,
    /// e.g. `imports = ["@hosts"]` loads `hosts.toml` next to the file.
    /// Imported configurations are merged beneath the main configuration,
    /// with the main configuration taking precedence in case of conflicts.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be read
    /// - The TOML content is invalid
    /// - Any imported files cannot be loaded
    /// - The merged configuration is invalid
    /// - Circular imports are detected
    #[instrument]
    pub fn load_with_imports(path: &Path) -> Result<Config> {
        let canonical_path = path
            .canonicalize()
            .map_err(|e| ListenPartyError::io_at(&e, path))?;

        let mut detector = CircularDetector::new();
        Self::load_config_with_tracking(&canonical_path, &mut detector)
    }

    /// Loads the main configuration file, or defaults when it does not exist.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be loaded, or if the
    /// configuration directory cannot be determined.
    pub fn load_or_default() -> Result<Config> {
        let main_config = ConfigPaths::main_config()?;

        if !main_config.exists() {
            debug!(path = %main_config.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        Self::load_with_imports(&main_config)
    }

    /// Writes the default configuration to `path` unless a file already exists.
    ///
    /// Returns `true` if a file was written.
    ///
    /// # Errors
    /// Returns error if the directory or file cannot be created.
    pub fn write_default_file(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        let rendered = Config::default().to_toml_string()?;
        file_creation::create_config_file(path, &rendered)?;
        Ok(true)
    }

    /// Recursively collects all configuration files involved in imports.
    ///
    /// Each file is listed only once even if imported multiple times.
    ///
    /// # Errors
    /// Returns error if any file cannot be read or contains invalid TOML
    pub fn get_all_config_files(path: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut visited = HashSet::new();

        Self::collect_config_files(path, &mut files, &mut visited)?;
        Ok(files)
    }

    fn load_config_with_tracking(path: &Path, detector: &mut CircularDetector) -> Result<Config> {
        detector.detect_circular_import(path)?;
        detector.push_to_chain(path);

        let result = Self::load_main_config(path, detector);
        detector.pop_from_chain();
        result
    }

    fn load_main_config(path: &Path, detector: &mut CircularDetector) -> Result<Config> {
        let main_config_content =
            fs::read_to_string(path).map_err(|e| ListenPartyError::io_at(&e, path))?;
        let import_paths = Self::extract_import_paths(&main_config_content)?;
        let imported_configs = Self::load_all_imports(path, &import_paths, detector)?;

        let mut main_config: Value = toml::from_str(&main_config_content)
            .map_err(|e| ListenPartyError::toml_parse(e, Some(path)))?;
        strip_imports_key(&mut main_config);

        let merged_config = merge_toml_configs(imported_configs, main_config);
        merged_config
            .try_into()
            .map_err(|e| ListenPartyError::ConfigValidation {
                component: "config parsing".to_string(),
                details: format!("Configuration validation failed: {e}"),
            })
    }

    fn load_all_imports(
        base_path: &Path,
        import_paths: &[String],
        detector: &mut CircularDetector,
    ) -> Result<Vec<Value>> {
        import_paths
            .iter()
            .map(|import_path| {
                let resolved_path = Self::resolve_import_path(base_path, import_path)?;
                let canonical_import = resolved_path
                    .canonicalize()
                    .map_err(|e| ListenPartyError::import(e, &resolved_path))?;

                Self::load_imported_file_with_tracking(&canonical_import, detector)
            })
            .collect()
    }

    fn load_imported_file_with_tracking(
        path: &Path,
        detector: &mut CircularDetector,
    ) -> Result<Value> {
        detector.detect_circular_import(path)?;
        detector.push_to_chain(path);

        let result = Self::load_toml_file_with_imports(path, detector);
        detector.pop_from_chain();
        result
    }

    fn load_toml_file_with_imports(path: &Path, detector: &mut CircularDetector) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| ListenPartyError::import(e, path))?;
        let import_paths = Self::extract_import_paths(&content)?;
        let imported_configs = Self::load_all_imports(path, &import_paths, detector)?;

        let mut main_value: Value =
            toml::from_str(&content).map_err(|e| ListenPartyError::toml_parse(e, Some(path)))?;
        strip_imports_key(&mut main_value);

        Ok(merge_toml_configs(imported_configs, main_value))
    }

    fn extract_import_paths(config_content: &str) -> Result<Vec<String>> {
        let value: Value =
            toml::from_str(config_content).map_err(|e| ListenPartyError::toml_parse(e, None))?;

        let import_paths = match value.get("imports") {
            Some(Value::Array(imports)) => imports
                .iter()
                .filter_map(|v| v.as_str())
                .filter_map(|s| s.strip_prefix('@'))
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        };

        Ok(import_paths)
    }

    fn resolve_import_path(base_path: &Path, import_path: &str) -> Result<PathBuf> {
        let parent_dir = base_path
            .parent()
            .ok_or_else(|| ListenPartyError::ImportError {
                path: base_path.to_path_buf(),
                details: "Invalid base path - no parent directory".to_string(),
            })?;

        let mut import_path_buf = PathBuf::from(import_path);
        if import_path_buf.extension().is_none() {
            import_path_buf.set_extension("toml");
        }

        Ok(parent_dir.join(import_path_buf))
    }

    fn collect_config_files(
        path: &Path,
        files: &mut Vec<PathBuf>,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<()> {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if !visited.insert(canonical.clone()) {
            return Ok(());
        }

        files.push(canonical);

        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ListenPartyError::io_at(&e, path))?;
            let import_paths = Self::extract_import_paths(&content)?;

            for import_path in import_paths {
                let resolved = Self::resolve_import_path(path, &import_path)?;
                Self::collect_config_files(&resolved, files, visited)?;
            }
        }

        Ok(())
    }
}

/// The `imports` list is loader metadata, not part of the schema.
fn strip_imports_key(value: &mut Value) {
    if let Value::Table(table) = value {
        table.remove("imports");
    }
}
