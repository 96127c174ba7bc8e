//! Record workflows behind the command-line commands.
//!
//! A [`Session`] borrows the catalog, a store and a prompt for the length of
//! one command. Every operation is scoped with a [`RecordSpan`].

use serde_json::Value;

use crate::catalog::{Catalog, RecordKind};
use crate::domain::{InvoiceError, Result};
use crate::obs::{self, RecordSpan};
use crate::prompt::Prompt;
use crate::record::Record;
use crate::store::RecordStore;
use crate::traverse::walk;
use crate::visitors::{serialize, Populate, ReferenceResolver, Resolution};

/// How a populated record ended up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Overwritten,
    /// The operator declined to overwrite; the stored document is unchanged.
    Kept,
}

/// Result of `new` or `edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub kind: RecordKind,
    pub id: String,
    pub outcome: SaveOutcome,
    /// Foreign keys resolved while populating, in field order.
    pub resolutions: Vec<Resolution>,
}

/// A foreign key naming a record that is not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub field: &'static str,
    pub target: RecordKind,
    pub id: String,
}

/// Result of `show`.
#[derive(Debug, Clone, PartialEq)]
pub struct Shown {
    pub record: Record,
    pub document: Value,
    pub dangling: Vec<DanglingReference>,
}

pub struct Session<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) store: &'a dyn RecordStore,
    pub(crate) prompt: &'a mut dyn Prompt,
}

impl<'a> Session<'a> {
    pub fn new(catalog: &'a Catalog, store: &'a dyn RecordStore, prompt: &'a mut dyn Prompt) -> Self {
        Self {
            catalog,
            store,
            prompt,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    /// Stored ids of `kind`, sorted.
    pub fn list(&self, kind: RecordKind) -> Result<Vec<String>> {
        self.store.list(kind)
    }

    /// Load a stored record and check its foreign keys.
    pub fn show(&self, kind: RecordKind, id: &str) -> Result<Shown> {
        let _span = RecordSpan::enter(kind, id);
        let record = self.store.load(self.catalog, kind, id)?;
        let dangling = self.dangling_references(&record)?;
        let document = serialize(self.catalog, &record)?;
        Ok(Shown {
            record,
            document,
            dangling,
        })
    }

    /// Foreign keys of `record` whose targets are not stored.
    pub fn dangling_references(&self, record: &Record) -> Result<Vec<DanglingReference>> {
        let mut dangling = Vec::new();
        for (field, target) in self.catalog.references(record.kind()) {
            let id = record.str_field(field).unwrap_or_default();
            let exists = match self.store.exists(target, id) {
                Ok(exists) => exists,
                Err(InvoiceError::Validation(_)) => false,
                Err(err) => return Err(err),
            };
            if !exists {
                obs::emit_reference_dangling(field, target, id);
                dangling.push(DanglingReference {
                    field,
                    target,
                    id: id.to_string(),
                });
            }
        }
        Ok(dangling)
    }

    /// Create a record, starting from the default instance.
    ///
    /// When `seed` names a stored record the operator may switch to editing
    /// it instead.
    pub fn create(&mut self, kind: RecordKind, seed: Option<&str>) -> Result<Saved> {
        if let Some(id) = seed {
            if self.store.exists(kind, id)? {
                let label = format!(
                    "{} '{id}' already exists. would you like to edit it?",
                    kind.tag()
                );
                if self.prompt.confirm(&label, true)? {
                    return self.edit_existing(kind, id);
                }
            }
        }
        self.create_new(kind, seed)
    }

    /// Edit a stored record; changing its id renames it. When `id` is missing
    /// the operator may switch to creating it instead; otherwise the result
    /// is `NotFound`.
    pub fn edit(&mut self, kind: RecordKind, id: &str) -> Result<Saved> {
        if !self.store.exists(kind, id)? {
            let label = format!(
                "no {} with id '{id}' found. would you like to create it?",
                kind.tag()
            );
            if self.prompt.confirm(&label, true)? {
                return self.create_new(kind, Some(id));
            }
            return Err(InvoiceError::NotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            });
        }
        self.edit_existing(kind, id)
    }

    pub fn delete(&self, kind: RecordKind, id: &str) -> Result<()> {
        let _span = RecordSpan::enter(kind, id);
        self.store.delete(kind, id)
    }

    /// Create `kind` seeded with `id` through plain population and return the
    /// id it was saved under. Used for records created from a foreign key.
    pub(crate) fn create_populated(&mut self, kind: RecordKind, id: &str) -> Result<String> {
        let _span = RecordSpan::enter(kind, id);
        let base = self.catalog.default_record(kind).with_id(id);
        let record = walk(self.catalog, &base, &mut Populate::new(&mut *self.prompt))?;
        let saved_id = self.persist(&record)?.0;
        Ok(saved_id)
    }

    fn create_new(&mut self, kind: RecordKind, seed: Option<&str>) -> Result<Saved> {
        let base = self.catalog.default_record(kind);
        let base = match seed {
            Some(id) => base.with_id(id),
            None => base,
        };
        let _span = RecordSpan::enter(kind, base.id().unwrap_or_default());
        let (record, resolutions) = self.populate(&base)?;
        let (id, outcome) = self.persist(&record)?;
        Ok(Saved {
            kind,
            id,
            outcome,
            resolutions,
        })
    }

    fn edit_existing(&mut self, kind: RecordKind, id: &str) -> Result<Saved> {
        let _span = RecordSpan::enter(kind, id);
        let current = self.store.load(self.catalog, kind, id)?;
        let (record, resolutions) = self.populate(&current)?;

        // Saving under the same id replaces the loaded document; a new id
        // moves it once the new document is written.
        let (id, outcome) = if record.id() == Some(id) {
            self.store.save(self.catalog, &record, true)?;
            (id.to_string(), SaveOutcome::Overwritten)
        } else {
            let (new_id, outcome) = self.persist(&record)?;
            if outcome != SaveOutcome::Kept {
                self.store.delete(kind, id)?;
            }
            (new_id, outcome)
        };
        Ok(Saved {
            kind,
            id,
            outcome,
            resolutions,
        })
    }

    fn populate(&mut self, base: &Record) -> Result<(Record, Vec<Resolution>)> {
        let catalog = self.catalog;
        let kind = base.kind();
        if catalog.has_references(kind) {
            let mut resolver = ReferenceResolver::new(self, kind);
            let record = walk(catalog, base, &mut resolver)?;
            Ok((record, resolver.into_resolutions()))
        } else {
            let record = walk(catalog, base, &mut Populate::new(&mut *self.prompt))?;
            Ok((record, Vec::new()))
        }
    }

    /// Save without overwriting; if the id is taken, ask before replacing it.
    fn persist(&mut self, record: &Record) -> Result<(String, SaveOutcome)> {
        let kind = record.kind();
        let id = record
            .id()
            .ok_or_else(|| InvoiceError::MissingId {
                kind: kind.to_string(),
            })?
            .to_string();

        if self.store.save(self.catalog, record, false)? {
            return Ok((id, SaveOutcome::Created));
        }
        let label = format!(
            "{} '{id}' already exists. would you like to overwrite it?",
            kind.tag()
        );
        if !self.prompt.confirm(&label, false)? {
            return Ok((id, SaveOutcome::Kept));
        }
        self.store.save(self.catalog, record, true)?;
        Ok((id, SaveOutcome::Overwritten))
    }
}
