//! easy-invoices core library
//!
//! Schema-driven record management: record types are declared once, walked
//! by a generic traversal engine, and persisted as one JSON document per
//! record.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod model;
pub mod obs;
pub mod prompt;
pub mod record;
pub mod schema;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod traverse;
pub mod visitors;

pub use catalog::{pluralize, Catalog, RecordKind};
pub use config::Config;
pub use domain::{InvoiceError, Result, SchemaError, ValidationError};
pub use model::{Address, Company, Contact, Options, PaymentTerms, Preset, RecordType, Taxes};
pub use prompt::{Prompt, ScriptedPrompt, TerminalPrompt};
pub use record::{FieldPath, FieldValue, Record, Scalar, Segment};
pub use schema::{FieldDecl, FieldDescriptor, FieldShape, FieldType, ItemShape, ScalarKind, Schema};
pub use session::{DanglingReference, SaveOutcome, Saved, Session, Shown};
pub use store::fs::FsRecordStore;
pub use store::RecordStore;
pub use traverse::{walk, NestedAction, Visitor};
pub use visitors::{
    deserialize, deserialize_onto, serialize, Deserializer, Origin, Populate, ReferenceResolver,
    Resolution, ResolveState, Serializer,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
