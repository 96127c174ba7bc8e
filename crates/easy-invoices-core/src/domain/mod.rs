//! Domain-level error types shared by every layer.

pub mod error;

pub use error::{InvoiceError, Result, SchemaError, ValidationError};
