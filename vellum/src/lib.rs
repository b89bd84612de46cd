//! # Vellum - Schema-Validated Document Mapper
//!
//! Vellum maps schema-bound documents onto an external document store. It
//! provides constraint validation, a fluent operator-based query builder, and
//! an asynchronous create/read/update/delete pipeline, while the store itself
//! (connection handling, storage engine, indexing) stays behind a small
//! capability trait.
//!
//! ## Key Features
//!
//! - **Typed Schemas**: Field descriptors with static and conditional
//!   constraints, defaults, and string normalization
//! - **Total Validation**: Every violation is collected and reported in one
//!   pass, never just the first
//! - **Fluent Queries**: Composable filter/sort/projection/pagination clauses
//!   compiled to an immutable query spec
//! - **Closed Filter Grammar**: A tagged expression tree with comparison,
//!   membership, logical, and regex operators
//! - **Two Update Paths**: Load-mutate-save with re-validation, or direct
//!   atomic patches that skip the read round-trip
//! - **Pluggable Stores**: Any backend implementing the async `DocumentStore`
//!   trait; an in-memory reference store is included
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vellum::mapper::DocumentMapper;
//! use vellum::schema::{FieldDescriptor, Schema};
//! use vellum::store::memory::InMemoryStore;
//! use vellum::document::DocumentInstance;
//! use vellum::record;
//!
//! # async fn example() -> vellum::errors::VellumResult<()> {
//! let schema = Schema::new(vec![
//!     FieldDescriptor::string("name").required(true).min_length(5),
//!     FieldDescriptor::number("price").min(10.0).max(200.0),
//! ])?;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let mapper = DocumentMapper::new(store);
//! let courses = mapper.collection("courses", schema.clone())?;
//!
//! let mut course = DocumentInstance::new(schema, record! { name: "Rust 101", price: 15 });
//! let id = courses.create(&mut course).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - The CRUD executor and document cursor
//! - [`common`] - Values, records, sort order, and shared utilities
//! - [`document`] - Document instances and identities
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - The filter expression grammar and fluent constructors
//! - [`mapper`] - The top-level mapper facade
//! - [`mapper_config`] - Mapper configuration
//! - [`query`] - Query builder and compiled query specs
//! - [`schema`] - Schemas and field descriptors
//! - [`store`] - The document store capability and the in-memory store

pub mod collection;
pub mod common;
pub mod document;
pub mod errors;
pub mod filter;
pub mod mapper;
pub mod mapper_config;
pub mod query;
pub mod schema;
pub mod store;

pub use common::{Record, SortOrder, Value, DOC_ID};
pub use document::{DocumentId, DocumentInstance};
pub use mapper::DocumentMapper;
pub use mapper_config::MapperConfig;
