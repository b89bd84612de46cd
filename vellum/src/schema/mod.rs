pub mod field;
pub mod schema;

pub use field::{DefaultValue, FieldDescriptor, FieldKind, Predicate, Requirement};
pub use schema::Schema;
