//! Typed record structs.
//!
//! Each struct declares its field list through [`RecordType`]; the catalog
//! classifies those declarations into schemas once per process. Serde
//! attributes on the structs must keep the declared field names, since those
//! names are the on-disk contract.

pub mod contact;
pub mod options;
pub mod preset;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::RecordKind;
use crate::schema::FieldDecl;

pub use contact::{Address, Company, Contact};
pub use options::{Options, PaymentTerms, Taxes};
pub use preset::Preset;

/// A struct with a static field declaration.
pub trait RecordType: Serialize + DeserializeOwned + Default {
    const KIND: RecordKind;

    /// Non-`id` fields hold ids of other stored records rather than data.
    const HAS_REFERENCES: bool = false;

    /// Fields in declaration order.
    fn declare() -> Vec<FieldDecl>;
}
