//! Static field schemas for record types.
//!
//! A record type declares its fields as a list of [`FieldDecl`]s. The
//! declaration is allowed to say anything a Rust type could; [`Schema::build`]
//! classifies each field into one of the shapes the traversal engine knows
//! how to walk and rejects the rest.

use std::fmt;

use crate::catalog::RecordKind;
use crate::domain::{SchemaError, ValidationError};
use crate::record::Scalar;

/// Declared type of a field, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Int,
    Float,
    /// String restricted to a fixed set of codes.
    Enum(&'static [&'static str]),
    Record(RecordKind),
    List(Box<FieldType>),
}

/// One declared field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldDecl {
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }

    pub fn str(name: &'static str) -> Self {
        Self::new(name, FieldType::Str)
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn float(name: &'static str) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn enumeration(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self::new(name, FieldType::Enum(variants))
    }

    pub fn record(name: &'static str, kind: RecordKind) -> Self {
        Self::new(name, FieldType::Record(kind))
    }

    pub fn list(name: &'static str, item: FieldType) -> Self {
        Self::new(name, FieldType::List(Box::new(item)))
    }
}

/// Kind of a scalar leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Str,
    Int,
    Float,
    Enum(&'static [&'static str]),
}

impl ScalarKind {
    /// Zero value used when nothing better is known.
    pub fn blank(self) -> Scalar {
        match self {
            ScalarKind::Str => Scalar::Str(String::new()),
            ScalarKind::Int => Scalar::Int(0),
            ScalarKind::Float => Scalar::Float(0.0),
            ScalarKind::Enum(variants) => {
                Scalar::Str(variants.first().copied().unwrap_or_default().to_string())
            }
        }
    }

    /// Parse operator input for a leaf at `path`.
    ///
    /// Enumeration codes match case-insensitively and come back in their
    /// canonical spelling.
    pub fn parse(self, path: &str, input: &str) -> Result<Scalar, ValidationError> {
        match self {
            ScalarKind::Str => Ok(Scalar::Str(input.to_string())),
            ScalarKind::Int => input
                .trim()
                .parse::<i64>()
                .map(Scalar::Int)
                .map_err(|_| ValidationError::NotAnInteger {
                    path: path.to_string(),
                    input: input.to_string(),
                }),
            ScalarKind::Float => match input.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Scalar::Float(value)),
                _ => Err(ValidationError::NotANumber {
                    path: path.to_string(),
                    input: input.to_string(),
                }),
            },
            ScalarKind::Enum(variants) => variants
                .iter()
                .find(|v| v.eq_ignore_ascii_case(input.trim()))
                .map(|v| Scalar::Str((*v).to_string()))
                .ok_or_else(|| ValidationError::NotAVariant {
                    path: path.to_string(),
                    input: input.to_string(),
                    allowed: variants.join(", "),
                }),
        }
    }

    /// Whether `value` is a legal value of this kind.
    pub fn accepts(self, value: &Scalar) -> bool {
        match (self, value) {
            (ScalarKind::Str, Scalar::Str(_)) => true,
            (ScalarKind::Int, Scalar::Int(_)) => true,
            (ScalarKind::Float, Scalar::Float(_)) => true,
            (ScalarKind::Enum(variants), Scalar::Str(s)) => variants.contains(&s.as_str()),
            _ => false,
        }
    }
}

/// Shape of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
    Scalar(ScalarKind),
    Record(RecordKind),
}

/// Classified shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Scalar(ScalarKind),
    Record(RecordKind),
    List(ItemShape),
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldShape::Scalar(_) => f.write_str("scalar"),
            FieldShape::Record(kind) => write!(f, "record({kind})"),
            FieldShape::List(ItemShape::Scalar(_)) => f.write_str("list(scalar)"),
            FieldShape::List(ItemShape::Record(kind)) => write!(f, "list(record({kind}))"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub shape: FieldShape,
}

/// Ordered, classified field list of one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    kind: RecordKind,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Classify `decls` for `kind`.
    ///
    /// # Errors
    ///
    /// - `SchemaError::NestedList` for a list whose items are lists.
    /// - `SchemaError::DuplicateField` when a name is declared twice.
    /// - `SchemaError::EmptyEnum` for an enumeration without codes.
    pub fn build(kind: RecordKind, decls: Vec<FieldDecl>) -> Result<Self, SchemaError> {
        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(decls.len());
        for decl in decls {
            if fields.iter().any(|f| f.name == decl.name) {
                return Err(SchemaError::DuplicateField {
                    record: kind.to_string(),
                    field: decl.name.to_string(),
                });
            }
            let shape = classify(kind, decl.name, &decl.ty)?;
            fields.push(FieldDescriptor {
                name: decl.name,
                shape,
            });
        }
        Ok(Self { kind, fields })
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True when the schema has a plain string `id` field.
    pub fn has_string_id(&self) -> bool {
        matches!(
            self.field("id"),
            Some(FieldDescriptor {
                shape: FieldShape::Scalar(ScalarKind::Str),
                ..
            })
        )
    }
}

fn classify(kind: RecordKind, name: &str, ty: &FieldType) -> Result<FieldShape, SchemaError> {
    match ty {
        FieldType::List(item) => match item.as_ref() {
            FieldType::List(_) => Err(SchemaError::NestedList {
                record: kind.to_string(),
                field: name.to_string(),
            }),
            FieldType::Record(nested) => Ok(FieldShape::List(ItemShape::Record(*nested))),
            scalar => Ok(FieldShape::List(ItemShape::Scalar(scalar_kind(
                kind, name, scalar,
            )?))),
        },
        FieldType::Record(nested) => Ok(FieldShape::Record(*nested)),
        scalar => Ok(FieldShape::Scalar(scalar_kind(kind, name, scalar)?)),
    }
}

fn scalar_kind(kind: RecordKind, name: &str, ty: &FieldType) -> Result<ScalarKind, SchemaError> {
    match ty {
        FieldType::Str => Ok(ScalarKind::Str),
        FieldType::Int => Ok(ScalarKind::Int),
        FieldType::Float => Ok(ScalarKind::Float),
        FieldType::Enum(variants) if variants.is_empty() => Err(SchemaError::EmptyEnum {
            record: kind.to_string(),
            field: name.to_string(),
        }),
        FieldType::Enum(variants) => Ok(ScalarKind::Enum(variants)),
        FieldType::Record(_) | FieldType::List(_) => unreachable!("classified by caller"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODES: &[&str] = &["NET7", "NET30"];

    #[test]
    fn test_build_keeps_declaration_order() {
        let schema = Schema::build(
            RecordKind::Options,
            vec![
                FieldDecl::str("id"),
                FieldDecl::enumeration("payment_terms", CODES),
                FieldDecl::float("rate"),
                FieldDecl::list("taxes", FieldType::Record(RecordKind::Taxes)),
            ],
        )
        .unwrap();

        let names: Vec<_> = schema.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["id", "payment_terms", "rate", "taxes"]);
        assert_eq!(
            schema.field("taxes").unwrap().shape,
            FieldShape::List(ItemShape::Record(RecordKind::Taxes))
        );
        assert!(schema.has_string_id());
    }

    #[test]
    fn test_list_of_lists_is_rejected() {
        let err = Schema::build(
            RecordKind::Options,
            vec![FieldDecl::list(
                "grid",
                FieldType::List(Box::new(FieldType::Int)),
            )],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::NestedList {
                record: "Options".to_string(),
                field: "grid".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let err = Schema::build(
            RecordKind::Address,
            vec![FieldDecl::str("city"), FieldDecl::str("city")],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_empty_enum_is_rejected() {
        let err = Schema::build(
            RecordKind::Options,
            vec![FieldDecl::enumeration("payment_terms", &[])],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyEnum { .. }));
    }

    #[test]
    fn test_scalar_list_is_classified() {
        let schema = Schema::build(
            RecordKind::Contact,
            vec![FieldDecl::list("aliases", FieldType::Str)],
        )
        .unwrap();
        assert_eq!(
            schema.fields()[0].shape,
            FieldShape::List(ItemShape::Scalar(ScalarKind::Str))
        );
        assert!(!schema.has_string_id());
    }

    #[test]
    fn test_parse_int_and_float() {
        assert_eq!(ScalarKind::Int.parse("p", " 42 ").unwrap(), Scalar::Int(42));
        assert!(ScalarKind::Int.parse("p", "4.2").is_err());
        assert_eq!(
            ScalarKind::Float.parse("p", "12.5").unwrap(),
            Scalar::Float(12.5)
        );
        assert!(ScalarKind::Float.parse("p", "NaN").is_err());
        assert!(ScalarKind::Float.parse("p", "abc").is_err());
    }

    #[test]
    fn test_parse_enum_is_case_insensitive() {
        let kind = ScalarKind::Enum(CODES);
        assert_eq!(
            kind.parse("payment_terms", "net30").unwrap(),
            Scalar::Str("NET30".to_string())
        );
        let err = kind.parse("payment_terms", "NET45").unwrap_err();
        assert!(err.to_string().contains("NET7, NET30"));
    }

    #[test]
    fn test_blank_values() {
        assert_eq!(ScalarKind::Str.blank(), Scalar::Str(String::new()));
        assert_eq!(ScalarKind::Enum(CODES).blank(), Scalar::Str("NET7".to_string()));
        assert!(ScalarKind::Enum(CODES).accepts(&Scalar::Str("NET30".to_string())));
        assert!(!ScalarKind::Int.accepts(&Scalar::Float(1.0)));
    }
}
