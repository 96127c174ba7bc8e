//! Error taxonomy for easy-invoices.

use std::path::PathBuf;

/// Errors raised while building a record schema or the catalog.
///
/// These are fatal: they describe a declaration the traversal engine cannot
/// walk, so they surface when the catalog is built rather than mid-walk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{record}.{field}: lists of lists are not supported")]
    NestedList { record: String, field: String },

    #[error("{record}.{field}: declared more than once")]
    DuplicateField { record: String, field: String },

    #[error("{record}.{field}: enumeration has no variants")]
    EmptyEnum { record: String, field: String },

    #[error("{record}: stored record types need a string `id` field")]
    MissingId { record: String },

    #[error("{record}.{field}: does not name a stored record type")]
    UnknownReference { record: String, field: String },

    #[error("{record}.{field}: referenced type {target} has references of its own")]
    ChainedReference {
        record: String,
        field: String,
        target: String,
    },
}

/// Errors produced by malformed input during a traversal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{path}: list length must not be negative, got {length}")]
    NegativeLength { path: String, length: i64 },

    #[error("{path}: at most {max} items are allowed, got {length}")]
    ListTooLong { path: String, length: i64, max: usize },

    #[error("{path}: expected a whole number, got {input:?}")]
    NotAnInteger { path: String, input: String },

    #[error("{path}: expected a number, got {input:?}")]
    NotANumber { path: String, input: String },

    #[error("{path}: {input:?} is not one of {allowed}")]
    NotAVariant {
        path: String,
        input: String,
        allowed: String,
    },

    #[error("invalid id {id:?}: ids must be non-empty and must not contain path separators")]
    InvalidId { id: String },
}

/// easy-invoices errors.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: String, id: String },

    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{} contains invalid JSON: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("expected a {expected} record, found {found}")]
    KindMismatch { expected: String, found: String },

    #[error("{kind} has no `id` field")]
    MissingId { kind: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("input closed while waiting for {0}")]
    Interrupted(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl InvoiceError {
    /// Whether this error means the requested record is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, InvoiceError::NotFound { .. })
    }
}

/// Result type for easy-invoices operations.
pub type Result<T> = std::result::Result<T, InvoiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = InvoiceError::NotFound {
            kind: "Company".to_string(),
            id: "acme".to_string(),
        };
        assert_eq!(err.to_string(), "Company 'acme' not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_schema_error_wraps() {
        let err: InvoiceError = SchemaError::NestedList {
            record: "Options".to_string(),
            field: "grid".to_string(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("schema error"));
        assert!(msg.contains("Options.grid"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_validation_error_mentions_path() {
        let err = ValidationError::NegativeLength {
            path: "taxes".to_string(),
            length: -2,
        };
        assert!(err.to_string().contains("taxes"));
        assert!(err.to_string().contains("-2"));
    }
}
