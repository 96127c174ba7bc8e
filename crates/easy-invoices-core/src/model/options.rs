//! Billing options: payment terms, hourly rate and taxes.

use serde::{Deserialize, Serialize};

use super::RecordType;
use crate::catalog::RecordKind;
use crate::schema::{FieldDecl, FieldType};

/// Payment terms printed on an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTerms {
    #[serde(rename = "PIA")]
    PaymentInAdvance,
    #[serde(rename = "NET7")]
    #[default]
    Net7,
    #[serde(rename = "NET10")]
    Net10,
    #[serde(rename = "NET30")]
    Net30,
    #[serde(rename = "NET60")]
    Net60,
    #[serde(rename = "NET90")]
    Net90,
    #[serde(rename = "EOM")]
    EndOfMonth,
    #[serde(rename = "21MFI")]
    TwentyFirstOfMonthFollowing,
}

impl PaymentTerms {
    /// Wire codes, in declaration order.
    pub const CODES: &'static [&'static str] = &[
        "PIA", "NET7", "NET10", "NET30", "NET60", "NET90", "EOM", "21MFI",
    ];

    pub fn code(self) -> &'static str {
        match self {
            PaymentTerms::PaymentInAdvance => "PIA",
            PaymentTerms::Net7 => "NET7",
            PaymentTerms::Net10 => "NET10",
            PaymentTerms::Net30 => "NET30",
            PaymentTerms::Net60 => "NET60",
            PaymentTerms::Net90 => "NET90",
            PaymentTerms::EndOfMonth => "EOM",
            PaymentTerms::TwentyFirstOfMonthFollowing => "21MFI",
        }
    }
}

/// A tax line applied to invoice totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxes {
    #[serde(rename = "type")]
    pub kind: String,
    pub percent: i64,
}

impl RecordType for Taxes {
    const KIND: RecordKind = RecordKind::Taxes;

    fn declare() -> Vec<FieldDecl> {
        vec![FieldDecl::str("type"), FieldDecl::int("percent")]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub id: String,
    pub payment_terms: PaymentTerms,
    pub rate: f64,
    pub taxes: Vec<Taxes>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            payment_terms: PaymentTerms::default(),
            rate: 0.0,
            taxes: Vec::new(),
        }
    }
}

impl RecordType for Options {
    const KIND: RecordKind = RecordKind::Options;

    fn declare() -> Vec<FieldDecl> {
        vec![
            FieldDecl::str("id"),
            FieldDecl::enumeration("payment_terms", PaymentTerms::CODES),
            FieldDecl::float("rate"),
            FieldDecl::list("taxes", FieldType::Record(RecordKind::Taxes)),
        ]
    }
}
