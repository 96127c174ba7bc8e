//! Plain JSON → record.
//!
//! Decoding walks the default instance of the target type and looks each
//! field up in the document:
//! - fields missing from the document keep their default,
//! - keys that match no declared field are ignored,
//! - a present value of the wrong JSON type is logged and the default kept.

use serde_json::Value;
use tracing::warn;

use crate::catalog::{Catalog, RecordKind};
use crate::domain::Result;
use crate::record::{FieldPath, FieldValue, Record, Scalar, Segment};
use crate::schema::ScalarKind;
use crate::traverse::{walk, NestedAction, Visitor};

/// Reads leaves out of a previously serialized document.
#[derive(Debug)]
pub struct Deserializer<'d> {
    document: &'d Value,
}

impl<'d> Deserializer<'d> {
    pub fn new(document: &'d Value) -> Self {
        Self { document }
    }

    fn lookup(&self, path: &FieldPath) -> Option<&'d Value> {
        path.segments()
            .iter()
            .try_fold(self.document, |value, segment| match segment {
                Segment::Field(name) => value.as_object()?.get(*name),
                Segment::Index(index) => value.as_array()?.get(*index),
            })
    }
}

impl Visitor for Deserializer<'_> {
    fn leaf(&mut self, path: &FieldPath, kind: ScalarKind, current: &Scalar) -> Result<Scalar> {
        let Some(value) = self.lookup(path) else {
            return Ok(current.clone());
        };
        match decode_scalar(kind, value) {
            Some(scalar) => Ok(scalar),
            None => {
                warn!(path = %path, value = %value, "unexpected value; keeping default");
                Ok(current.clone())
            }
        }
    }

    fn list_length(&mut self, path: &FieldPath, current: &[FieldValue]) -> Result<i64> {
        match self.lookup(path) {
            Some(Value::Array(items)) => Ok(items.len() as i64),
            None => Ok(current.len() as i64),
            Some(other) => {
                warn!(path = %path, value = %other, "expected a list; keeping default");
                Ok(current.len() as i64)
            }
        }
    }

    fn before_nested(
        &mut self,
        path: &FieldPath,
        _kind: RecordKind,
        _current: &Record,
    ) -> Result<NestedAction> {
        match self.lookup(path) {
            Some(Value::Object(_)) => Ok(NestedAction::Descend),
            None => Ok(NestedAction::Keep),
            Some(other) => {
                warn!(path = %path, value = %other, "expected an object; keeping default");
                Ok(NestedAction::Keep)
            }
        }
    }
}

/// Rebuild a `kind` record from `document`.
pub fn deserialize(catalog: &Catalog, kind: RecordKind, document: &Value) -> Result<Record> {
    deserialize_onto(catalog, &catalog.default_record(kind), document)
}

/// Rebuild a record from `document`, taking absent fields from `base`.
pub fn deserialize_onto(catalog: &Catalog, base: &Record, document: &Value) -> Result<Record> {
    if !document.is_object() {
        warn!(kind = %base.kind(), "document is not an object; using defaults");
    }
    walk(catalog, base, &mut Deserializer::new(document))
}

fn decode_scalar(kind: ScalarKind, value: &Value) -> Option<Scalar> {
    match kind {
        ScalarKind::Str => value.as_str().map(|s| Scalar::Str(s.to_string())),
        ScalarKind::Int => value
            .as_i64()
            .or_else(|| value.as_f64().and_then(integral_f64))
            .map(Scalar::Int),
        ScalarKind::Float => value.as_f64().map(Scalar::Float),
        ScalarKind::Enum(variants) => value
            .as_str()
            .filter(|s| variants.contains(s))
            .map(|s| Scalar::Str(s.to_string())),
    }
}

/// `x` as an `i64` when it is a whole number inside the `i64` range.
fn integral_f64(x: f64) -> Option<i64> {
    // 2^63 is exactly representable; every finite f64 below it fits.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (x.fract() == 0.0 && (-LIMIT..LIMIT).contains(&x)).then_some(x as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contact, Options, Taxes};
    use serde_json::json;

    #[test]
    fn test_missing_fields_take_defaults() {
        let catalog = Catalog::build().unwrap();
        let record = deserialize(
            &catalog,
            RecordKind::Options,
            &json!({"id": "short", "rate": 40}),
        )
        .unwrap();
        let options: Options = record.to_typed(&catalog).unwrap();

        assert_eq!(options.id, "short");
        assert_eq!(options.rate, 40.0);
        assert_eq!(options.payment_terms.code(), "NET7");
        assert!(options.taxes.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let catalog = Catalog::build().unwrap();
        let record = deserialize(
            &catalog,
            RecordKind::Contact,
            &json!({"id": "jo", "fax": "555", "address": {"city": "Oslo", "planet": "Earth"}}),
        )
        .unwrap();
        let contact: Contact = record.to_typed(&catalog).unwrap();

        assert_eq!(contact.id, "jo");
        assert_eq!(contact.address.city, "Oslo");
        assert_eq!(contact.address.street_address, "");
    }

    #[test]
    fn test_wrong_types_keep_defaults() {
        let catalog = Catalog::build().unwrap();
        let record = deserialize(
            &catalog,
            RecordKind::Options,
            &json!({
                "id": 12,
                "payment_terms": "NET45",
                "rate": "fast",
                "taxes": [{"type": "GST", "percent": "five"}]
            }),
        )
        .unwrap();
        let options: Options = record.to_typed(&catalog).unwrap();

        assert_eq!(options.id, "default");
        assert_eq!(options.payment_terms.code(), "NET7");
        assert_eq!(options.rate, 0.0);
        assert_eq!(
            options.taxes,
            vec![Taxes {
                kind: "GST".to_string(),
                percent: 0
            }]
        );
    }

    #[test]
    fn test_non_object_document_yields_defaults() {
        let catalog = Catalog::build().unwrap();
        let record = deserialize(&catalog, RecordKind::Preset, &json!([1, 2])).unwrap();
        assert_eq!(record, catalog.default_record(RecordKind::Preset));
    }

    #[test]
    fn test_absent_fields_come_from_base() {
        let catalog = Catalog::build().unwrap();
        let base = catalog.default_record(RecordKind::Company).with_id("acme");
        let record = deserialize_onto(&catalog, &base, &json!({"name": "Acme"})).unwrap();
        assert_eq!(record.id(), Some("acme"));
        assert_eq!(record.str_field("name"), Some("Acme"));
    }

    #[test]
    fn test_integral_float_decodes_as_int() {
        assert_eq!(
            decode_scalar(ScalarKind::Int, &json!(5.0)),
            Some(Scalar::Int(5))
        );
        assert_eq!(decode_scalar(ScalarKind::Int, &json!(5.5)), None);
        assert_eq!(decode_scalar(ScalarKind::Int, &json!(1e30)), None);
        assert_eq!(decode_scalar(ScalarKind::Int, &json!(-1e30)), None);
        assert_eq!(
            decode_scalar(ScalarKind::Float, &json!(3)),
            Some(Scalar::Float(3.0))
        );
    }
}
