//! This module provides functionality for loading the application's configuration.
//!
//! It defines the [`RagConfig`] struct and [`load_config`] to read it from a
//! YAML file. Every field is optional in the file; omitted fields take the
//! values from [`RagConfig::default`].
//!
//! # Examples
//!
//! ```no_run
//! use personal_knowledge_rag::config::load_config;
//!
//! let config = load_config("/path/to/config.yaml").unwrap();
//! println!("retrieving {} documents per question", config.top_k);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{error::Error, fs};

use tracing::*;

use crate::template::DEFAULT_TEMPLATE_NAME;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct RagConfig {
    /// Number of documents fetched per question.
    pub top_k: usize,

    /// Width of the hashed embedding vectors.
    pub embedding_dimension: usize,

    /// Prompt template name, resolved under `<config_dir>/templates/`.
    pub template: String,

    /// Whether sessions start with the three built-in sample documents.
    pub seed_sample_documents: bool,

    /// User id the CLI starts with when none is given.
    pub default_user_id: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            embedding_dimension: 384,
            template: DEFAULT_TEMPLATE_NAME.to_string(),
            seed_sample_documents: true,
            default_user_id: "user_001".to_string(),
        }
    }
}

/// Loads the application's configuration from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the YAML is malformed, or a
/// field has an invalid value (`top_k` may be zero, `embedding_dimension` may not).
pub fn load_config(file: impl AsRef<Path>) -> Result<RagConfig, Box<dyn Error>> {
    let file = file.as_ref();
    debug!("Loading config from: {}", file.display());

    let content = fs::read_to_string(file)?;
    let config: RagConfig = serde_yaml::from_str(&content)?;
    if config.embedding_dimension == 0 {
        return Err("embedding_dimension must be greater than zero".into());
    }
    Ok(config)
}

/// Where the config file is expected: an explicit path if given, else
/// `<config_dir>/config.yaml`.
pub fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(crate::config_dir()?.join("config.yaml")),
    }
}

/// Load the config at `path`, falling back to defaults when the file is missing.
pub fn load_config_or_default(path: &Path) -> Result<RagConfig, Box<dyn Error>> {
    if !path.exists() {
        info!(
            "No config at {}, using defaults (run `pkr init` to create one)",
            path.display()
        );
        return Ok(RagConfig::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_valid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
top_k: 5
embedding_dimension: 128
template: "terse"
seed_sample_documents: false
default_user_id: "ada"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path());

        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.embedding_dimension, 128);
        assert_eq!(config.template, "terse");
        assert!(!config.seed_sample_documents);
        assert_eq!(config.default_user_id, "ada");
    }

    #[test]
    fn test_load_config_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "top_k: 1").unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.top_k, 1);
        assert_eq!(
            config,
            RagConfig {
                top_k: 1,
                ..RagConfig::default()
            }
        );
    }

    #[test]
    fn test_load_config_invalid_file() {
        let config = load_config("non/existent/path");
        assert!(config.is_err());
    }

    #[test]
    fn test_load_config_invalid_format() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"invalid: config: format"#).unwrap();

        let config = load_config(temp_file.path());
        assert!(config.is_err());
    }

    #[test]
    fn test_load_config_rejects_zero_dimension() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "embedding_dimension: 0").unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_config_falls_back_to_default() {
        let config = load_config_or_default(Path::new("non/existent/config.yaml")).unwrap();
        assert_eq!(config, RagConfig::default());
    }
}
