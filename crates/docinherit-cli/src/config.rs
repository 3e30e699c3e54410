//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and layering the command-line options on top.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use docinherit::{DocInheritError, config::AppConfig};

use crate::Args;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration `{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for DocInheritError {
    fn from(err: ConfigError) -> Self {
        DocInheritError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (docinherit/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DocInheritError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("docinherit/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "docinherit", "docinherit") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if the file doesn't exist, cannot be read, or is not
/// valid configuration.
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, DocInheritError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path).map_err(|err| DocInheritError::io(path, err))?;

    let config: AppConfig = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    Ok(config)
}

/// Apply command-line options over a loaded configuration.
///
/// List options replace the configured list when given at least once;
/// `--overwrite` can only switch overwriting on.
pub fn apply_args(config: AppConfig, args: &Args) -> AppConfig {
    let mut config = config;
    if let Some(base_path) = &args.base_path {
        config = config.with_base_path(base_path);
    }
    if !args.file_patterns.is_empty() {
        config = config.with_file_patterns(args.file_patterns.clone());
    }
    if !args.reference_docs.is_empty() {
        config = config.with_reference_docs(args.reference_docs.iter().map(PathBuf::from).collect());
    }
    if !args.exclude_types.is_empty() {
        config = config.with_exclude_types(args.exclude_types.clone());
    }
    if args.overwrite {
        config = config.with_overwrite(true);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "file_patterns = [\"Acme.*.xml\"]\noverwrite = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.file_patterns(), &["Acme.*.xml".to_string()]);
        assert!(config.overwrite());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load_config(Some(&path)).unwrap_err();

        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "overwrite = \"yes\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, DocInheritError::Config(_)));
    }

    #[test]
    fn test_args_override_config() {
        let config = AppConfig::default()
            .with_file_patterns(vec!["Old.xml".to_string()])
            .with_exclude_types(vec!["System.*".to_string()]);
        let args = Args {
            base_path: Some("out".to_string()),
            file_patterns: vec!["New.xml".to_string()],
            overwrite: true,
            ..Args::default()
        };

        let config = apply_args(config, &args);

        assert_eq!(config.base_path(), Some(Path::new("out")));
        assert_eq!(config.file_patterns(), &["New.xml".to_string()]);
        assert_eq!(config.exclude_types(), &["System.*".to_string()]);
        assert!(config.overwrite());
    }
}
