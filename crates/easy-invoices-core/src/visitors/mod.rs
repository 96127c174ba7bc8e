//! Strategies plugged into the record walk.

pub mod deserialize;
pub mod populate;
pub mod resolve;
pub mod serialize;

pub use deserialize::{deserialize, deserialize_onto, Deserializer};
pub use populate::Populate;
pub use resolve::{Origin, ReferenceResolver, Resolution, ResolveState};
pub use serialize::{serialize, Serializer};
