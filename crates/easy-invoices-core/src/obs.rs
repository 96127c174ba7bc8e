//! Structured observability hooks for record lifecycle events.
//!
//! This module provides:
//! - Command-scoped tracing spans via the `RecordSpan` RAII guard
//! - Emission functions for storage and reference-resolution events
//!
//! Events are emitted at `info!` level unless noted; filter with `RUST_LOG`.

use std::path::Path;

use tracing::{info, warn};

use crate::catalog::RecordKind;

/// RAII guard that scopes tracing output to one record.
///
/// # Example
///
/// ```ignore
/// let _span = RecordSpan::enter(RecordKind::Company, "acme");
/// // every event until the guard drops carries kind=Company id=acme
/// ```
pub struct RecordSpan {
    _span: tracing::span::EnteredSpan,
}

impl RecordSpan {
    pub fn enter(kind: RecordKind, id: &str) -> Self {
        let span = tracing::info_span!("invoices.record", kind = %kind, id = %id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a record document was written.
pub fn emit_record_saved(kind: RecordKind, id: &str, overwrite: bool) {
    info!(event = "record.saved", kind = %kind, id = %id, overwrite = overwrite);
}

/// Emit event: a save found an existing document and wrote nothing.
pub fn emit_record_save_skipped(kind: RecordKind, id: &str) {
    info!(event = "record.save_skipped", kind = %kind, id = %id);
}

pub fn emit_record_deleted(kind: RecordKind, id: &str) {
    info!(event = "record.deleted", kind = %kind, id = %id);
}

/// Emit event: a load fell back to defaults (warning level).
pub fn emit_record_not_found(kind: RecordKind, id: &str) {
    warn!(event = "record.not_found", kind = %kind, id = %id);
}

/// Emit event: a collection could not be listed (warning level).
pub fn emit_collection_unreadable(kind: RecordKind, path: &Path, error: &dyn std::fmt::Display) {
    warn!(
        event = "collection.unreadable",
        kind = %kind,
        path = %path.display(),
        error = %error,
    );
}

/// Emit event: a missing referenced record was created during resolution.
pub fn emit_reference_created(field: &str, target: RecordKind, id: &str) {
    info!(event = "reference.created", field = %field, target = %target, id = %id);
}

/// Emit event: a stored reference names a record that does not exist
/// (warning level).
pub fn emit_reference_dangling(field: &str, target: RecordKind, id: &str) {
    warn!(event = "reference.dangling", field = %field, target = %target, id = %id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_span_create() {
        let _span = RecordSpan::enter(RecordKind::Preset, "q3");
        emit_record_saved(RecordKind::Preset, "q3", false);
    }
}
