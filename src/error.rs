//! Error types with fix suggestions

use std::path::Path;

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

pub type Result<T, E = ArtifactError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ArtifactError {
    // ─────────────────────────────────────────────────────────────
    // Pass-through errors from the underlying libraries
    // ─────────────────────────────────────────────────────────────

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Binary codec error: {0}")]
    Binary(#[from] postcard::Error),

    // ─────────────────────────────────────────────────────────────
    // Document errors (AIO-010 to AIO-012)
    // ─────────────────────────────────────────────────────────────

    #[error("AIO-010: YAML file '{path}' is empty")]
    EmptyConfig { path: String },

    #[error("AIO-011: Document '{path}' must be a mapping at the root, found {found}")]
    NotAMapping { path: String, found: String },

    #[error("AIO-012: Artifact '{path}' is not readable: {details}")]
    ArtifactFormat { path: String, details: String },

    // ─────────────────────────────────────────────────────────────
    // Argument contract errors (AIO-020)
    // ─────────────────────────────────────────────────────────────

    #[error("AIO-020: Invalid argument '{param}': {reason}")]
    InvalidArgument { param: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // ConfigBox access errors (AIO-030 to AIO-032)
    // ─────────────────────────────────────────────────────────────

    #[error("AIO-030: Key '{key}' not found")]
    KeyNotFound { key: String },

    #[error("AIO-031: Key '{key}' is {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("AIO-032: Invalid key path '{path}'")]
    InvalidKeyPath { path: String },
}

impl ArtifactError {
    pub(crate) fn invalid_argument(param: &str, reason: impl Into<String>) -> Self {
        ArtifactError::InvalidArgument {
            param: param.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn artifact_format(path: &Path, details: impl Into<String>) -> Self {
        ArtifactError::ArtifactFormat {
            path: path.display().to_string(),
            details: details.into(),
        }
    }
}

impl FixSuggestion for ArtifactError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ArtifactError::Io(_) => Some("Check file path and permissions"),
            ArtifactError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            ArtifactError::JsonParse(_) => Some("Ensure the file is valid JSON (try parsing with jq)"),
            ArtifactError::Binary(_) => {
                Some("The artifact is corrupt or was saved from a different type; re-create it")
            }
            ArtifactError::EmptyConfig { .. } => Some("Add at least one key to the YAML file"),
            ArtifactError::NotAMapping { .. } => {
                Some("Wrap the document in a top-level mapping (key: value)")
            }
            ArtifactError::ArtifactFormat { .. } => {
                Some("Re-save the artifact with this version of artifact-io")
            }
            ArtifactError::InvalidArgument { .. } => {
                Some("Pass a non-empty file path and a mapping where one is expected")
            }
            ArtifactError::KeyNotFound { .. } => Some("Check the key spelling and nesting"),
            ArtifactError::TypeMismatch { .. } => {
                Some("Fix the value type in the document or use a different getter")
            }
            ArtifactError::InvalidKeyPath { .. } => {
                Some("Use dotted paths like model.params.alpha or layers[0].units")
            }
        }
    }
}
