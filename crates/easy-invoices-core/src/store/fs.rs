use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tempfile::NamedTempFile;

use super::{validate_id, RecordStore};
use crate::catalog::RecordKind;
use crate::domain::{InvoiceError, Result};
use crate::obs;

/// Filesystem-backed record store, one JSON document per record.
///
/// Layout: `<root>/<collection>/<id>.json`
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    /// Create a store rooted at `root`. Directories are created on first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, kind: RecordKind) -> PathBuf {
        self.root.join(kind.collection())
    }

    /// Path of the document for `id`.
    pub fn document_path(&self, kind: RecordKind, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.collection_dir(kind).join(format!("{id}.json")))
    }
}

impl RecordStore for FsRecordStore {
    fn exists(&self, kind: RecordKind, id: &str) -> Result<bool> {
        Ok(self.document_path(kind, id)?.is_file())
    }

    fn read(&self, kind: RecordKind, id: &str) -> Result<Value> {
        let path = self.document_path(kind, id)?;
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => InvoiceError::NotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            },
            _ => io_error(e, &path),
        })?;
        serde_json::from_slice(&bytes).map_err(|source| InvoiceError::Corrupt { path, source })
    }

    fn write(
        &self,
        kind: RecordKind,
        id: &str,
        document: &Value,
        overwrite: bool,
    ) -> Result<bool> {
        let path = self.document_path(kind, id)?;
        if !overwrite && path.exists() {
            return Ok(false);
        }

        let dir = self.collection_dir(kind);
        fs::create_dir_all(&dir).map_err(|e| io_error(e, &dir))?;

        // Atomic write: write to temp file in the same directory, then rename.
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| io_error(e, &dir))?;
        tmp.write_all(&encode(document)?)?;
        tmp.persist(&path).map_err(|e| io_error(e.error, &path))?;
        Ok(true)
    }

    fn list(&self, kind: RecordKind) -> Result<Vec<String>> {
        let dir = self.collection_dir(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                obs::emit_collection_unreadable(kind, &dir, &e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_document = path.is_file() && path.extension().is_some_and(|ext| ext == "json");
            if let (true, Some(stem)) = (is_document, path.file_stem()) {
                ids.push(stem.to_string_lossy().into_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete(&self, kind: RecordKind, id: &str) -> Result<()> {
        let path = self.document_path(kind, id)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => InvoiceError::NotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            },
            _ => io_error(e, &path),
        })?;
        obs::emit_record_deleted(kind, id);
        Ok(())
    }
}

/// Pretty JSON with four-space indentation and a trailing newline.
fn encode(document: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut ser)?;
    out.push(b'\n');
    Ok(out)
}

fn io_error(err: std::io::Error, path: &Path) -> InvoiceError {
    if err.kind() == ErrorKind::PermissionDenied {
        InvoiceError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        InvoiceError::Io(err)
    }
}
