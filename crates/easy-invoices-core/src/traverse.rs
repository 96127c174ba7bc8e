//! Generic schema-driven record walk.
//!
//! [`walk`] visits every field of a record in declaration order and asks a
//! [`Visitor`] for the new value of each leaf and the length of each list.
//! The input record is never modified; the result is assembled from the
//! visitor's answers.
//!
//! # Invariants
//! - Field order follows the schema, recursively, so two walks of the same
//!   record produce the same sequence of visitor calls.
//! - A list walked with length `n` yields exactly `n` items. Index `i` uses
//!   the current item `i` as its template when there is one and a default
//!   item otherwise.
//! - A negative length, or one above [`MAX_LIST_LENGTH`], is a
//!   `ValidationError`; it is never clamped.

use std::borrow::Cow;

use crate::catalog::{Catalog, RecordKind};
use crate::domain::{Result, ValidationError};
use crate::record::{FieldPath, FieldValue, Record, Scalar};
use crate::schema::{FieldShape, ItemShape, ScalarKind};

/// Longest list the walk will build.
pub const MAX_LIST_LENGTH: usize = 1_000;

/// What the walk should do with a nested record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedAction {
    /// Walk the nested record's fields.
    Descend,
    /// Keep the current nested value untouched.
    Keep,
}

/// Strategy plugged into [`walk`].
pub trait Visitor {
    /// New value for the scalar at `path`.
    fn leaf(&mut self, path: &FieldPath, kind: ScalarKind, current: &Scalar) -> Result<Scalar>;

    /// Number of items the list at `path` should have.
    fn list_length(&mut self, path: &FieldPath, current: &[FieldValue]) -> Result<i64>;

    /// Called before walking into a nested record (field or list item).
    fn before_nested(
        &mut self,
        _path: &FieldPath,
        _kind: RecordKind,
        _current: &Record,
    ) -> Result<NestedAction> {
        Ok(NestedAction::Descend)
    }
}

/// Walk `record` with `visitor`, returning the newly assembled record.
pub fn walk<V>(catalog: &Catalog, record: &Record, visitor: &mut V) -> Result<Record>
where
    V: Visitor + ?Sized,
{
    let mut path = FieldPath::root();
    walk_record(catalog, record, visitor, &mut path)
}

fn walk_record<V>(
    catalog: &Catalog,
    record: &Record,
    visitor: &mut V,
    path: &mut FieldPath,
) -> Result<Record>
where
    V: Visitor + ?Sized,
{
    let schema = catalog.schema(record.kind());
    let mut fields = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        path.push_field(field.name);
        let current = record.get(field.name);
        let value = match field.shape {
            FieldShape::Scalar(kind) => {
                let scalar = current_scalar(current, kind);
                FieldValue::Scalar(visitor.leaf(path, kind, &scalar)?)
            }
            FieldShape::Record(kind) => {
                let nested = current_record(catalog, current, kind);
                FieldValue::Record(walk_nested(catalog, &nested, kind, visitor, path)?)
            }
            FieldShape::List(item) => {
                let items: &[FieldValue] = match current {
                    Some(FieldValue::List(items)) => items.as_slice(),
                    _ => &[],
                };
                FieldValue::List(walk_list(catalog, items, item, visitor, path)?)
            }
        };
        path.pop();
        fields.push((field.name, value));
    }

    Ok(Record::from_parts(record.kind(), fields))
}

fn walk_nested<V>(
    catalog: &Catalog,
    nested: &Record,
    kind: RecordKind,
    visitor: &mut V,
    path: &mut FieldPath,
) -> Result<Record>
where
    V: Visitor + ?Sized,
{
    match visitor.before_nested(path, kind, nested)? {
        NestedAction::Keep => Ok(nested.clone()),
        NestedAction::Descend => walk_record(catalog, nested, visitor, path),
    }
}

fn walk_list<V>(
    catalog: &Catalog,
    items: &[FieldValue],
    shape: ItemShape,
    visitor: &mut V,
    path: &mut FieldPath,
) -> Result<Vec<FieldValue>>
where
    V: Visitor + ?Sized,
{
    let requested = visitor.list_length(path, items)?;
    let length = usize::try_from(requested).map_err(|_| ValidationError::NegativeLength {
        path: path.to_string(),
        length: requested,
    })?;
    if length > MAX_LIST_LENGTH {
        return Err(ValidationError::ListTooLong {
            path: path.to_string(),
            length: requested,
            max: MAX_LIST_LENGTH,
        }
        .into());
    }

    let mut out = Vec::with_capacity(length.min(items.len()));
    for index in 0..length {
        path.push_index(index);
        let template = items.get(index);
        let value = match shape {
            ItemShape::Scalar(kind) => {
                let scalar = current_scalar(template, kind);
                FieldValue::Scalar(visitor.leaf(path, kind, &scalar)?)
            }
            ItemShape::Record(kind) => {
                let nested = current_record(catalog, template, kind);
                FieldValue::Record(walk_nested(catalog, &nested, kind, visitor, path)?)
            }
        };
        path.pop();
        out.push(value);
    }
    Ok(out)
}

fn current_scalar(value: Option<&FieldValue>, kind: ScalarKind) -> Scalar {
    match value {
        Some(FieldValue::Scalar(scalar)) => scalar.clone(),
        _ => kind.blank(),
    }
}

fn current_record<'r>(
    catalog: &Catalog,
    value: Option<&'r FieldValue>,
    kind: RecordKind,
) -> Cow<'r, Record> {
    match value {
        Some(FieldValue::Record(record)) if record.kind() == kind => Cow::Borrowed(record),
        _ => Cow::Owned(catalog.default_record(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Options, Taxes};

    /// Records every call and answers with fixed values.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        length: i64,
    }

    impl Visitor for Recorder {
        fn leaf(&mut self, path: &FieldPath, _kind: ScalarKind, current: &Scalar) -> Result<Scalar> {
            self.calls.push(format!("leaf {path}"));
            Ok(current.clone())
        }

        fn list_length(&mut self, path: &FieldPath, _current: &[FieldValue]) -> Result<i64> {
            self.calls.push(format!("len {path}"));
            Ok(self.length)
        }

        fn before_nested(
            &mut self,
            path: &FieldPath,
            kind: RecordKind,
            _current: &Record,
        ) -> Result<NestedAction> {
            self.calls.push(format!("nested {path} {kind}"));
            Ok(NestedAction::Descend)
        }
    }

    fn options_with_taxes(n: usize) -> Options {
        Options {
            id: "std".to_string(),
            taxes: (0..n)
                .map(|i| Taxes {
                    kind: format!("T{i}"),
                    percent: i as i64,
                })
                .collect(),
            ..Options::default()
        }
    }

    #[test]
    fn test_visit_order_follows_declaration() {
        let catalog = Catalog::build().unwrap();
        let record = Record::from_typed(&catalog, &options_with_taxes(1)).unwrap();
        let mut visitor = Recorder {
            length: 1,
            ..Recorder::default()
        };

        walk(&catalog, &record, &mut visitor).unwrap();

        assert_eq!(
            visitor.calls,
            [
                "leaf id",
                "leaf payment_terms",
                "leaf rate",
                "len taxes",
                "nested taxes[0] Taxes",
                "leaf taxes[0].type",
                "leaf taxes[0].percent",
            ]
        );
    }

    #[test]
    fn test_growing_list_keeps_existing_items() {
        let catalog = Catalog::build().unwrap();
        let record = Record::from_typed(&catalog, &options_with_taxes(2)).unwrap();
        let mut visitor = Recorder {
            length: 4,
            ..Recorder::default()
        };

        let walked = walk(&catalog, &record, &mut visitor).unwrap();
        let options: Options = walked.to_typed(&catalog).unwrap();

        assert_eq!(options.taxes.len(), 4);
        assert_eq!(options.taxes[0].kind, "T0");
        assert_eq!(options.taxes[1].kind, "T1");
        assert_eq!(options.taxes[2], Taxes::default());
        assert_eq!(options.taxes[3], Taxes::default());
    }

    #[test]
    fn test_shrinking_list_truncates() {
        let catalog = Catalog::build().unwrap();
        let record = Record::from_typed(&catalog, &options_with_taxes(5)).unwrap();
        let mut visitor = Recorder {
            length: 2,
            ..Recorder::default()
        };

        let options: Options = walk(&catalog, &record, &mut visitor)
            .unwrap()
            .to_typed(&catalog)
            .unwrap();
        let kinds: Vec<_> = options.taxes.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, ["T0", "T1"]);
    }

    #[test]
    fn test_negative_length_fails() {
        let catalog = Catalog::build().unwrap();
        let record = catalog.default_record(RecordKind::Options);
        let mut visitor = Recorder {
            length: -1,
            ..Recorder::default()
        };

        let err = walk(&catalog, &record, &mut visitor).unwrap_err();
        assert!(matches!(
            err,
            crate::InvoiceError::Validation(ValidationError::NegativeLength { length: -1, .. })
        ));
    }

    #[test]
    fn test_oversized_length_fails_without_allocating() {
        let catalog = Catalog::build().unwrap();
        let record = catalog.default_record(RecordKind::Options);
        let mut visitor = Recorder {
            length: 1_000_000_000_000_000_000,
            ..Recorder::default()
        };

        let err = walk(&catalog, &record, &mut visitor).unwrap_err();
        assert!(matches!(
            err,
            crate::InvoiceError::Validation(ValidationError::ListTooLong { max: MAX_LIST_LENGTH, .. })
        ));
    }

    #[test]
    fn test_keep_skips_nested_fields() {
        struct KeepAll;
        impl Visitor for KeepAll {
            fn leaf(&mut self, _: &FieldPath, _: ScalarKind, _: &Scalar) -> Result<Scalar> {
                Ok(Scalar::Str("changed".to_string()))
            }
            fn list_length(&mut self, _: &FieldPath, current: &[FieldValue]) -> Result<i64> {
                Ok(current.len() as i64)
            }
            fn before_nested(&mut self, _: &FieldPath, _: RecordKind, _: &Record) -> Result<NestedAction> {
                Ok(NestedAction::Keep)
            }
        }

        let catalog = Catalog::build().unwrap();
        let record = catalog.default_record(RecordKind::Contact);
        let walked = walk(&catalog, &record, &mut KeepAll).unwrap();

        assert_eq!(walked.str_field("name"), Some("changed"));
        assert_eq!(walked.get("address"), record.get("address"));
    }
}
