//! Error and diagnostic types for layout generation.

use serde_derive::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Any of these aborts the run before an artifact is written.
#[derive(Debug, Error)]
pub enum GenError {
    /// Input document could not be read, decoded or parsed.
    #[error("failed to load schema document {}: {message}", path.display())]
    SchemaParse { path: PathBuf, message: String },

    /// No input documents were given.
    #[error("no input schema documents were given")]
    EmptyInput,

    /// No roots were requested and the registry does not hold exactly one struct.
    #[error("no root struct given and {} struct(s) are present ({}); pass --root <StructName>", structs.len(), structs.join(", "))]
    MissingRoot { structs: Vec<String> },

    /// Requested root is absent or is not a struct.
    #[error("root '{name}' {reason}")]
    UnknownRoot { name: String, reason: String },

    /// Struct composition cycle found while ordering.
    #[error("struct composition cycle among: {}", types.join(", "))]
    SchemaCycle { types: Vec<String> },

    /// Output artifact could not be staged or committed.
    #[error("failed to write {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generator configuration is unreadable or invalid.
    #[error("invalid generator config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl GenError {
    pub fn schema_parse(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::SchemaParse { path: path.into(), message: message.to_string() }
    }

    pub fn unknown_root(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnknownRoot { name: name.into(), reason: reason.into() }
    }
}

/// Non-fatal findings. Generation continues and the affected code is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// No code is emitted for the field.
    UnsupportedField { type_name: String, field: String, declared_type: String },
    /// The array is emitted but its elements are skipped.
    UnsupportedElement { type_name: String, field: String, declared_type: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedField { type_name, field, declared_type } => {
                write!(f, "{}.{}: unsupported field type '{}', field skipped", type_name, field, declared_type)
            }
            Diagnostic::UnsupportedElement { type_name, field, declared_type } => {
                write!(f, "{}.{}: unsupported array element in '{}', elements skipped", type_name, field, declared_type)
            }
        }
    }
}
