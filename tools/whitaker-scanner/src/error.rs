//! Error types for header decoding and table loading.

use std::path::PathBuf;

/// Why a header failed to decode.
///
/// Every variant carries the header text exactly as it appeared in the input,
/// so rejected blocks can be traced back to the raw dictionary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The header grammar did not match at all.
    #[error("Could not parse header {header:?}: unknown format")]
    Format { header: String },

    /// A code or classifier token is not in its table, a classifier was left
    /// unconsumed, or a mandatory stem expansion did not match.
    #[error("Could not parse header {header:?}: unknown {field}: {value:?}")]
    UnknownField {
        header: String,
        field: String,
        value: String,
    },

    /// A classifier that the part of speech requires is absent.
    #[error("Could not parse header {header:?}: no {field} specified for {class}")]
    MissingField {
        header: String,
        field: &'static str,
        class: &'static str,
    },

    /// The principal parts do not fit any shape known for the part of speech.
    #[error("Could not parse header {header:?}: {reason}")]
    Shape {
        header: String,
        reason: &'static str,
    },
}

impl DecodeError {
    pub fn unknown_field(header: &str, field: impl Into<String>, value: impl Into<String>) -> Self {
        DecodeError::UnknownField {
            header: header.to_string(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// The original header text.
    pub fn header(&self) -> &str {
        match self {
            DecodeError::Format { header }
            | DecodeError::UnknownField { header, .. }
            | DecodeError::MissingField { header, .. }
            | DecodeError::Shape { header, .. } => header,
        }
    }

    /// True when the header grammar itself failed, as opposed to a field
    /// that parsed but could not be interpreted.
    pub fn is_structural(&self) -> bool {
        matches!(self, DecodeError::Format { .. })
    }
}

/// Failure to load or validate a field table schema.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read schema file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("table {0} is empty")]
    EmptyTable(&'static str),

    #[error("flag table {table} has code {code:?}, flag codes must be a single character")]
    WideFlagCode { table: &'static str, code: String },
}
