pub mod query_builder;
pub mod query_spec;

pub use query_builder::QueryBuilder;
pub use query_spec::QuerySpec;
