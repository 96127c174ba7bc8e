//! Saved combination of a company, a contact and billing options.

use serde::{Deserialize, Serialize};

use super::RecordType;
use crate::catalog::RecordKind;
use crate::schema::FieldDecl;

/// Every field except `id` names the id of another stored record; the field
/// name is the tag of the referenced record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub id: String,
    pub company: String,
    pub contact: String,
    pub options: String,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            company: "default".to_string(),
            contact: "default".to_string(),
            options: "default".to_string(),
        }
    }
}

impl RecordType for Preset {
    const KIND: RecordKind = RecordKind::Preset;
    const HAS_REFERENCES: bool = true;

    fn declare() -> Vec<FieldDecl> {
        vec![
            FieldDecl::str("id"),
            FieldDecl::str("company"),
            FieldDecl::str("contact"),
            FieldDecl::str("options"),
        ]
    }
}
