use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::validation::ValidationSchema;
use crate::terminal::KeyChord;

pub const DEFAULT_MAX_DEPTH: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Editor settings. Every key is optional in the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Nesting levels rendered as editors before rows flatten to leaves.
    pub max_depth: usize,
    pub commit_and_continue: KeyChord,
    pub validation: ValidationSchema,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            commit_and_continue: KeyChord::default(),
            validation: ValidationSchema::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a config file; `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), is_json, "loading editor config");
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DEFAULT_MAX_DEPTH, EditorConfig};
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn empty_document_uses_defaults() {
        let config = EditorConfig::from_yaml_str("{}").expect("config");
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.validation.date_range.is_some());
    }

    #[test]
    fn yaml_overrides_depth_and_chord() {
        let config =
            EditorConfig::from_yaml_str("maxDepth: 2\ncommitAndContinue: alt+enter\n").expect("config");
        assert_eq!(config.max_depth, 2);
        assert!(
            config
                .commit_and_continue
                .matches(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT))
        );
    }

    #[test]
    fn json_validation_section_replaces_default_rules() {
        let config = EditorConfig::from_json_str(
            r#"{"validation": {"fields": [{"name": "title", "required": true}]}}"#,
        )
        .expect("config");
        assert_eq!(config.validation.fields.len(), 1);
        assert!(config.validation.value_check.is_none());
    }

    #[test]
    fn bad_chord_is_a_yaml_error() {
        let err = EditorConfig::from_yaml_str("commitAndContinue: ctrl\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
        let err = EditorConfig::from_yaml_str("commitAndContinue: enter\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EditorConfig::load("/nonexistent/dataform.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dataform.yaml"));
    }
}
