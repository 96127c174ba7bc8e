pub mod fs;

use serde_json::Value;

use crate::catalog::{Catalog, RecordKind};
use crate::domain::{InvoiceError, Result, ValidationError};
use crate::obs;
use crate::record::Record;
use crate::visitors::{deserialize_onto, serialize};

/// Per-type document store keyed by record id.
///
/// Guarantees:
/// - `write(.., overwrite = false)` never replaces an existing document and
///   reports `false` instead.
/// - `list` of a collection that was never written is empty, not an error.
/// - `read` and `delete` of a missing id fail with `InvoiceError::NotFound`.
pub trait RecordStore {
    fn exists(&self, kind: RecordKind, id: &str) -> Result<bool>;

    /// Read the stored document.
    fn read(&self, kind: RecordKind, id: &str) -> Result<Value>;

    /// Persist `document`; `false` means the id exists and nothing was written.
    fn write(&self, kind: RecordKind, id: &str, document: &Value, overwrite: bool)
        -> Result<bool>;

    /// Stored ids of `kind`, sorted.
    fn list(&self, kind: RecordKind) -> Result<Vec<String>>;

    fn delete(&self, kind: RecordKind, id: &str) -> Result<()>;

    /// Serialize and persist `record` under its own id.
    fn save(&self, catalog: &Catalog, record: &Record, overwrite: bool) -> Result<bool> {
        let kind = record.kind();
        let id = record.id().ok_or_else(|| InvoiceError::MissingId {
            kind: kind.to_string(),
        })?;
        let document = serialize(catalog, record)?;
        let written = self.write(kind, id, &document, overwrite)?;
        if written {
            obs::emit_record_saved(kind, id, overwrite);
        } else {
            obs::emit_record_save_skipped(kind, id);
        }
        Ok(written)
    }

    /// Load `id`, failing with `NotFound` when it is absent. A document
    /// without an `id` key takes the requested id.
    fn load(&self, catalog: &Catalog, kind: RecordKind, id: &str) -> Result<Record> {
        let document = self.read(kind, id)?;
        let base = catalog.default_record(kind).with_id(id);
        deserialize_onto(catalog, &base, &document)
    }

    /// Load `id`, falling back to the default instance (with `id` set) when
    /// it is absent.
    fn load_or_default(&self, catalog: &Catalog, kind: RecordKind, id: &str) -> Result<Record> {
        match self.load(catalog, kind, id) {
            Err(err) if err.is_not_found() => {
                obs::emit_record_not_found(kind, id);
                Ok(catalog.default_record(kind).with_id(id))
            }
            other => other,
        }
    }
}

/// Reject ids that cannot be used as a file name inside a collection.
pub fn validate_id(id: &str) -> std::result::Result<(), ValidationError> {
    let invalid = id.trim().is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\'])
        || id.chars().any(char::is_control);
    if invalid {
        return Err(ValidationError::InvalidId { id: id.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("acme").is_ok());
        assert!(validate_id("acme co.").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("   ").is_err());
        assert!(validate_id("..").is_err());
        assert!(validate_id("a/b").is_err());
        assert!(validate_id("a\\b").is_err());
    }
}
