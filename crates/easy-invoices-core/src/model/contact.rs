//! Contact details for invoice parties.

use serde::{Deserialize, Serialize};

use super::RecordType;
use crate::catalog::RecordKind;
use crate::schema::FieldDecl;

/// Postal address. Only ever embedded in a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub post_code: String,
}

impl RecordType for Address {
    const KIND: RecordKind = RecordKind::Address;

    fn declare() -> Vec<FieldDecl> {
        vec![
            FieldDecl::str("street_address"),
            FieldDecl::str("city"),
            FieldDecl::str("state"),
            FieldDecl::str("country"),
            FieldDecl::str("post_code"),
        ]
    }
}

/// A client or other invoice party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: String::new(),
            company_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: Address::default(),
        }
    }
}

impl RecordType for Contact {
    const KIND: RecordKind = RecordKind::Contact;

    fn declare() -> Vec<FieldDecl> {
        vec![
            FieldDecl::str("id"),
            FieldDecl::str("name"),
            FieldDecl::str("company_name"),
            FieldDecl::str("email"),
            FieldDecl::str("phone"),
            FieldDecl::record("address", RecordKind::Address),
        ]
    }
}

/// The invoicing business itself: a contact plus its business number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    #[serde(flatten)]
    pub contact: Contact,
    pub business_number: String,
}

impl RecordType for Company {
    const KIND: RecordKind = RecordKind::Company;

    fn declare() -> Vec<FieldDecl> {
        let mut fields = Contact::declare();
        fields.push(FieldDecl::str("business_number"));
        fields
    }
}
