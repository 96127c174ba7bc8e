//! Process-wide registry of record types.
//!
//! The catalog maps every [`RecordKind`] to its classified schema, its default
//! instance and its storage collection. It is built once ([`Catalog::global`])
//! and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::domain::{InvoiceError, Result, SchemaError};
use crate::model::{Address, Company, Contact, Options, Preset, RecordType, Taxes};
use crate::record::{FieldValue, Record};
use crate::schema::{FieldDecl, FieldShape, ScalarKind, Schema};
use crate::visitors::deserialize;

static GLOBAL: OnceCell<Catalog> = OnceCell::new();

/// Tag of a record type.
///
/// Variants are ordered leaves first: a kind only embeds kinds declared
/// before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Address,
    Taxes,
    Contact,
    Company,
    Options,
    Preset,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::Address,
        RecordKind::Taxes,
        RecordKind::Contact,
        RecordKind::Company,
        RecordKind::Options,
        RecordKind::Preset,
    ];

    /// Kinds persisted in their own collection.
    pub const STORED: [RecordKind; 4] = [
        RecordKind::Company,
        RecordKind::Contact,
        RecordKind::Options,
        RecordKind::Preset,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            RecordKind::Address => "Address",
            RecordKind::Taxes => "Taxes",
            RecordKind::Contact => "Contact",
            RecordKind::Company => "Company",
            RecordKind::Options => "Options",
            RecordKind::Preset => "Preset",
        }
    }

    /// Lower-case tag used on the command line and as foreign-key field name.
    pub fn tag(self) -> &'static str {
        match self {
            RecordKind::Address => "address",
            RecordKind::Taxes => "taxes",
            RecordKind::Contact => "contact",
            RecordKind::Company => "company",
            RecordKind::Options => "options",
            RecordKind::Preset => "preset",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    pub fn is_stored(self) -> bool {
        Self::STORED.contains(&self)
    }

    /// Directory name of the collection holding this kind.
    pub fn collection(self) -> String {
        pluralize(self.type_name()).to_lowercase()
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for RecordKind {
    type Err = InvoiceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_tag(&s.to_ascii_lowercase())
            .ok_or_else(|| InvoiceError::UnknownRecordType(s.to_string()))
    }
}

/// Plural of a type name: `s` stays, `y` becomes `ies`, otherwise `s` is added.
pub fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        word.to_string()
    } else if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else {
        format!("{word}s")
    }
}

struct Declaration {
    fields: Vec<FieldDecl>,
    has_references: bool,
    default_document: fn() -> serde_json::Result<Value>,
}

fn declaration<T: RecordType>() -> Declaration {
    Declaration {
        fields: T::declare(),
        has_references: T::HAS_REFERENCES,
        default_document: || serde_json::to_value(T::default()),
    }
}

fn declare(kind: RecordKind) -> Declaration {
    match kind {
        RecordKind::Address => declaration::<Address>(),
        RecordKind::Taxes => declaration::<Taxes>(),
        RecordKind::Contact => declaration::<Contact>(),
        RecordKind::Company => declaration::<Company>(),
        RecordKind::Options => declaration::<Options>(),
        RecordKind::Preset => declaration::<Preset>(),
    }
}

#[derive(Debug)]
struct Entry {
    schema: Schema,
    default: Record,
    collection: String,
    has_references: bool,
}

/// Immutable record-type registry.
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    /// Classify every declaration and compute default instances.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`] in a declaration, plus:
    /// - `SchemaError::MissingId` for a stored kind without a string `id`.
    /// - `SchemaError::UnknownReference` for a foreign key that does not name
    ///   a stored kind.
    /// - `SchemaError::ChainedReference` when a foreign key targets a kind
    ///   that has references itself.
    pub fn build() -> Result<Self> {
        let mut default_documents = Vec::with_capacity(RecordKind::ALL.len());
        let mut entries = Vec::with_capacity(RecordKind::ALL.len());
        for kind in RecordKind::ALL {
            let decl = declare(kind);
            let schema = Schema::build(kind, decl.fields)?;
            if kind.is_stored() && !schema.has_string_id() {
                return Err(SchemaError::MissingId {
                    record: kind.to_string(),
                }
                .into());
            }
            entries.push(Entry {
                default: blank(kind, &schema),
                schema,
                collection: kind.collection(),
                has_references: decl.has_references,
            });
            default_documents.push(decl.default_document);
        }

        let mut catalog = Self { entries };
        catalog.check_references()?;

        // Leaves first, so nested defaults are final before their owners.
        for (kind, default_document) in RecordKind::ALL.into_iter().zip(default_documents) {
            let document = default_document()?;
            let default = deserialize(&catalog, kind, &document)?;
            catalog.entries[kind.index()].default = default;
        }
        Ok(catalog)
    }

    /// The process-wide catalog, built on first use.
    pub fn global() -> Result<&'static Catalog> {
        GLOBAL.get_or_try_init(Catalog::build)
    }

    fn entry(&self, kind: RecordKind) -> &Entry {
        &self.entries[kind.index()]
    }

    pub fn schema(&self, kind: RecordKind) -> &Schema {
        &self.entry(kind).schema
    }

    /// A fresh default instance of `kind`.
    pub fn default_record(&self, kind: RecordKind) -> Record {
        self.entry(kind).default.clone()
    }

    pub fn collection(&self, kind: RecordKind) -> &str {
        &self.entry(kind).collection
    }

    /// Whether `kind`'s non-`id` fields are foreign keys.
    pub fn has_references(&self, kind: RecordKind) -> bool {
        self.entry(kind).has_references
    }

    /// Record type referenced by `field` of `kind`, if `field` is a foreign key.
    pub fn reference_target(&self, kind: RecordKind, field: &str) -> Option<RecordKind> {
        if !self.has_references(kind) || field == "id" {
            return None;
        }
        RecordKind::from_tag(field).filter(|target| target.is_stored())
    }

    /// Foreign-key fields of `kind` with their target kinds, in declaration order.
    pub fn references(&self, kind: RecordKind) -> Vec<(&'static str, RecordKind)> {
        self.schema(kind)
            .fields()
            .iter()
            .filter_map(|f| self.reference_target(kind, f.name).map(|t| (f.name, t)))
            .collect()
    }

    fn check_references(&self) -> std::result::Result<(), SchemaError> {
        for kind in RecordKind::ALL {
            if !self.has_references(kind) {
                continue;
            }
            for field in self.schema(kind).fields() {
                if field.name == "id" {
                    continue;
                }
                let target = match (field.shape, RecordKind::from_tag(field.name)) {
                    (FieldShape::Scalar(ScalarKind::Str), Some(target)) if target.is_stored() => {
                        target
                    }
                    _ => {
                        return Err(SchemaError::UnknownReference {
                            record: kind.to_string(),
                            field: field.name.to_string(),
                        })
                    }
                };
                if self.has_references(target) {
                    return Err(SchemaError::ChainedReference {
                        record: kind.to_string(),
                        field: field.name.to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Zero-valued instance used as the deserialization base for defaults.
fn blank(kind: RecordKind, schema: &Schema) -> Record {
    let fields = schema
        .fields()
        .iter()
        .map(|field| {
            let value = match field.shape {
                FieldShape::Scalar(scalar) => FieldValue::Scalar(scalar.blank()),
                // Nested kinds precede their owner in `RecordKind::ALL`, and the
                // deserialize pass fills them in from the typed default.
                FieldShape::Record(nested) => {
                    FieldValue::Record(Record::from_parts(nested, Vec::new()))
                }
                FieldShape::List(_) => FieldValue::List(Vec::new()),
            };
            (field.name, value)
        })
        .collect();
    Record::from_parts(kind, fields)
}
