//! Schema-shaped record instances.
//!
//! A [`Record`] is the value the traversal engine walks: an ordered list of
//! named [`FieldValue`]s whose shapes follow the record type's schema.
//! Typed structs in [`crate::model`] convert to and from records through the
//! serialize/deserialize visitors.

use std::fmt;

use crate::catalog::{Catalog, RecordKind};
use crate::domain::{InvoiceError, Result};
use crate::model::RecordType;
use crate::visitors::{deserialize, serialize};

/// A scalar leaf value. Enumerated codes are carried as strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Scalar),
    Record(Record),
    List(Vec<FieldValue>),
}

/// An instance of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: RecordKind,
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub(crate) fn from_parts(kind: RecordKind, fields: Vec<(&'static str, FieldValue)>) -> Self {
        Self { kind, fields }
    }

    /// Build a record from a typed struct.
    pub fn from_typed<T: RecordType>(catalog: &Catalog, value: &T) -> Result<Self> {
        let document = serde_json::to_value(value)?;
        deserialize(catalog, T::KIND, &document)
    }

    /// Convert back into the typed struct for this record's kind.
    pub fn to_typed<T: RecordType>(&self, catalog: &Catalog) -> Result<T> {
        if self.kind != T::KIND {
            return Err(InvoiceError::KindMismatch {
                expected: T::KIND.to_string(),
                found: self.kind.to_string(),
            });
        }
        let document = serialize(catalog, self)?;
        Ok(serde_json::from_value(document)?)
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn scalar(&self, name: &str) -> Option<&Scalar> {
        match self.get(name) {
            Some(FieldValue::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.scalar(name).and_then(Scalar::as_str)
    }

    /// The record's own storage key, for stored record types.
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// Copy of this record with scalar `name` replaced. Unknown names leave
    /// the record unchanged.
    pub fn with_scalar(&self, name: &str, value: Scalar) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|(field, current)| match current {
                FieldValue::Scalar(_) if *field == name => (*field, FieldValue::Scalar(value.clone())),
                _ => (*field, current.clone()),
            })
            .collect();
        Self::from_parts(self.kind, fields)
    }

    pub fn with_id(&self, id: &str) -> Self {
        self.with_scalar("id", Scalar::Str(id.to_string()))
    }
}

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Field(&'static str),
    Index(usize),
}

/// Location of a field inside the record being walked, e.g. `taxes[1].percent`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Name of the innermost field on the path.
    pub fn name(&self) -> &'static str {
        self.segments
            .iter()
            .rev()
            .find_map(|s| match s {
                Segment::Field(name) => Some(*name),
                Segment::Index(_) => None,
            })
            .unwrap_or("")
    }

    /// True for fields of the record the walk started from.
    pub fn is_top_level(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::Field(_)])
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Index(_)))
    }

    pub(crate) fn push_field(&mut self, name: &'static str) {
        self.segments.push(Segment::Field(name));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::from_parts(
            RecordKind::Preset,
            vec![
                ("id", FieldValue::Scalar(Scalar::Str("q3".to_string()))),
                ("company", FieldValue::Scalar(Scalar::Str("acme".to_string()))),
            ],
        )
    }

    #[test]
    fn test_path_display() {
        let mut path = FieldPath::root();
        path.push_field("taxes");
        path.push_index(1);
        path.push_field("percent");
        assert_eq!(path.to_string(), "taxes[1].percent");
        assert_eq!(path.name(), "percent");
        assert!(!path.is_top_level());

        path.pop();
        assert!(path.is_list_item());
        assert_eq!(path.name(), "taxes");
    }

    #[test]
    fn test_top_level_path() {
        let mut path = FieldPath::root();
        path.push_field("id");
        assert!(path.is_top_level());
        assert_eq!(path.to_string(), "id");
    }

    #[test]
    fn test_with_id_builds_new_record() {
        let original = sample();
        let renamed = original.with_id("q4");
        assert_eq!(original.id(), Some("q3"));
        assert_eq!(renamed.id(), Some("q4"));
        assert_eq!(renamed.str_field("company"), Some("acme"));
    }

    #[test]
    fn test_with_scalar_ignores_unknown_field() {
        let original = sample();
        let same = original.with_scalar("missing", Scalar::Int(1));
        assert_eq!(original, same);
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Int(7).to_string(), "7");
        assert_eq!(Scalar::Float(12.5).to_string(), "12.5");
        assert_eq!(Scalar::Str("NET7".to_string()).to_string(), "NET7");
    }
}
