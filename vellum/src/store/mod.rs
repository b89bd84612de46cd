pub mod document_store;
pub mod memory;

pub use document_store::{DocumentStore, UpdateResult};
