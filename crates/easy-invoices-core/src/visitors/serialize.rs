//! Record → plain JSON.

use serde_json::{Map, Number, Value};

use crate::catalog::{Catalog, RecordKind};
use crate::domain::Result;
use crate::record::{FieldPath, FieldValue, Record, Scalar, Segment};
use crate::schema::ScalarKind;
use crate::traverse::{walk, NestedAction, Visitor};

/// Builds the plain structure of a record while the walk passes leaves
/// through unchanged.
#[derive(Debug)]
pub struct Serializer {
    document: Value,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            document: Value::Object(Map::new()),
        }
    }

    pub fn into_document(self) -> Value {
        self.document
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for Serializer {
    fn leaf(&mut self, path: &FieldPath, _kind: ScalarKind, current: &Scalar) -> Result<Scalar> {
        place(&mut self.document, path.segments(), scalar_to_json(current));
        Ok(current.clone())
    }

    fn list_length(&mut self, path: &FieldPath, current: &[FieldValue]) -> Result<i64> {
        place(&mut self.document, path.segments(), Value::Array(Vec::new()));
        Ok(current.len() as i64)
    }

    fn before_nested(
        &mut self,
        path: &FieldPath,
        _kind: RecordKind,
        _current: &Record,
    ) -> Result<NestedAction> {
        place(&mut self.document, path.segments(), Value::Object(Map::new()));
        Ok(NestedAction::Descend)
    }
}

/// Serialize `record` into nested JSON objects, arrays and primitives.
pub fn serialize(catalog: &Catalog, record: &Record) -> Result<Value> {
    let mut serializer = Serializer::new();
    walk(catalog, record, &mut serializer)?;
    Ok(serializer.into_document())
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Str(s) => Value::String(s.clone()),
        Scalar::Int(i) => Value::Number((*i).into()),
        Scalar::Float(x) => Number::from_f64(*x).map_or(Value::Null, Value::Number),
    }
}

/// Store `value` at `segments`, creating intermediate containers.
fn place(target: &mut Value, segments: &[Segment], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };
    if target.is_null() {
        *target = match head {
            Segment::Field(_) => Value::Object(Map::new()),
            Segment::Index(_) => Value::Array(Vec::new()),
        };
    }
    let child = match (head, target) {
        (Segment::Field(name), Value::Object(map)) => {
            map.entry(name.to_string()).or_insert(Value::Null)
        }
        (Segment::Index(index), Value::Array(items)) => {
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
            }
            &mut items[*index]
        }
        _ => return,
    };
    place(child, rest, value);
}
