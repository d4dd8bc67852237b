//! Error handling for the symvasi code generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from the underlying I/O, document
//! and template errors, which are propagated unmodified.
//!
//! # Examples
//!
//! ```
//! use symvasi_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::UnsupportedType("widget".to_string()))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for symvasi operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for symvasi operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Unreadable glob match
    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// A type string that is neither a keyword, a known enum/model nor a list
    #[error("Type \"{0}\" is not supported")]
    UnsupportedType(String),

    /// A model includes a contract the definition does not declare
    #[error("Contract \"{contract}\" not defined (referenced by model \"{model}\")")]
    ContractNotDefined { model: String, contract: String },

    /// A model name that cannot be resolved
    #[error("Model \"{0}\" not defined")]
    ModelNotDefined(String),

    /// An enum name that cannot be resolved
    #[error("Enum \"{0}\" not defined")]
    EnumNotDefined(String),

    /// A contract property collides with an existing property of a different type
    #[error(
        "Conflicting data types for contract property \"{property}\" on model \"{model}\": \"{existing}\" vs \"{incoming}\""
    )]
    PropertyTypeConflict {
        model: String,
        property: String,
        existing: String,
        incoming: String,
    },

    /// A build names a target that was not loaded
    #[error("Target \"{0}\" not defined")]
    TargetNotDefined(String),

    /// An output declaration names a template the target does not provide
    #[error("Template \"{template}\" not defined for target \"{target}\"")]
    TemplateNotDefined { target: String, template: String },

    /// A dotted context path resolves to nothing
    #[error("Context path \"{path}\" resolves to nothing in definition \"{definition}\"")]
    ContextNotFound { definition: String, path: String },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }
}
