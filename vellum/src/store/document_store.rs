use async_trait::async_trait;

use crate::common::Record;
use crate::document::DocumentId;
use crate::errors::VellumResult;
use crate::filter::FilterExpr;
use crate::query::QuerySpec;

/// The result of a bulk update against a store.
///
/// `matched_count` is the number of documents selected by the filter;
/// `modified_count` is the number whose content actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    matched_count: u64,
    modified_count: u64,
}

impl UpdateResult {
    /// Creates a new `UpdateResult` with the specified counts.
    ///
    /// # Arguments
    ///
    /// * `matched_count` - The number of documents matched by the filter
    /// * `modified_count` - The number of documents whose content changed
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        UpdateResult {
            matched_count,
            modified_count,
        }
    }

    pub fn matched_count(&self) -> u64 {
        self.matched_count
    }

    pub fn modified_count(&self) -> u64 {
        self.modified_count
    }
}

/// The document store capability the mapper is built against.
///
/// # Purpose
/// Defines the contract every backend must satisfy: insert, query, bulk
/// update, single-document lookup, and single-document delete over named
/// collections. Everything else (connection lifecycle, retry policy, storage
/// engine, indexing) belongs to the store implementation, not this boundary.
///
/// # Contract
/// - Every returned row carries the reserved `_id` field, even under a
///   projection
/// - `query` honors the spec's filter, sort, projection, skip, and limit,
///   in that conceptual order
/// - `delete_one` removes at most one matching document and reports whether
///   one was removed
/// - Transport failures surface as `StoreError`; unreachable or timed-out
///   backends surface as `StoreUnavailable`. Implementations own their retry
///   policy; the mapper never retries
///
/// # Thread Safety
/// Implementers must be `Send + Sync`; handles are shared behind `Arc`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a record into the named collection and returns the identity
    /// the store assigned to it.
    async fn insert(&self, collection_name: &str, record: Record) -> VellumResult<DocumentId>;

    /// Runs a compiled query against the named collection.
    ///
    /// The returned rows are ordered according to the spec's sort keys.
    async fn query(&self, collection_name: &str, spec: &QuerySpec) -> VellumResult<Vec<Record>>;

    /// Applies a patch to every document matching the filter, without
    /// returning the documents.
    async fn update_many(
        &self,
        collection_name: &str,
        filter: &FilterExpr,
        patch: &Record,
    ) -> VellumResult<UpdateResult>;

    /// Returns the first document matching the filter, if any.
    async fn find_one(
        &self,
        collection_name: &str,
        filter: &FilterExpr,
    ) -> VellumResult<Option<Record>>;

    /// Deletes at most one document matching the filter.
    ///
    /// # Returns
    ///
    /// `true` when a document was deleted, `false` when nothing matched.
    async fn delete_one(&self, collection_name: &str, filter: &FilterExpr) -> VellumResult<bool>;
}
