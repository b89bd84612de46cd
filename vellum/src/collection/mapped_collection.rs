use std::sync::Arc;

use crate::collection::DocumentCursor;
use crate::common::Record;
use crate::document::{DocumentId, DocumentInstance};
use crate::errors::{ErrorKind, VellumError, VellumResult};
use crate::filter::{by_id, FilterExpr};
use crate::mapper_config::MapperConfig;
use crate::query::{QueryBuilder, QuerySpec};
use crate::schema::Schema;
use crate::store::{DocumentStore, UpdateResult};

/// The CRUD executor for one named collection.
///
/// A `MappedCollection` binds a [Schema] and a collection name to a shared
/// [DocumentStore] handle and drives every document operation through it.
/// Validation always runs locally, and always completes, before any store
/// I/O is issued; store failures are surfaced to the caller unchanged and
/// never retried here.
///
/// The executor borrows documents only for the duration of one operation and
/// keeps each instance's `persisted` flag in agreement with what actually
/// happened in the store.
///
/// # Examples
///
/// ```rust,ignore
/// let courses = mapper.collection("courses", schema.clone())?;
///
/// // create
/// let mut course = DocumentInstance::new(schema, record! { name: "Rust 101", price: 15 });
/// courses.create(&mut course).await?;
///
/// // read
/// let spec = courses.query()
///     .filter(field("price").gt(10))
///     .sort_by("price", SortOrder::Ascending)
///     .compile();
/// for doc in courses.find(&spec).await? {
///     println!("{}", doc?.get("name"));
/// }
/// ```
#[derive(Clone)]
pub struct MappedCollection {
    name: String,
    schema: Schema,
    store: Arc<dyn DocumentStore>,
    config: MapperConfig,
}

impl std::fmt::Debug for MappedCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedCollection")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MappedCollection {
    pub(crate) fn new(
        name: String,
        schema: Schema,
        store: Arc<dyn DocumentStore>,
        config: MapperConfig,
    ) -> Self {
        MappedCollection {
            name,
            schema,
            store,
            config,
        }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the schema this collection maps.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Starts a query builder bound to this collection's schema.
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.schema.clone())
    }

    /// Persists a new document.
    ///
    /// Defaults and string normalization are applied first, then the
    /// document is validated. On validation failure the store is never
    /// contacted and the error carries the complete violation list. On
    /// success the instance receives its store identity and becomes
    /// persisted.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for constraint violations, `InvalidOperation` for
    /// an already-persisted or deleted instance, or the store's own error.
    pub async fn create(&self, doc: &mut DocumentInstance) -> VellumResult<DocumentId> {
        if doc.is_deleted() {
            log::error!("Cannot create a deleted document in '{}'", self.name);
            return Err(VellumError::new(
                "Cannot create a deleted document",
                ErrorKind::InvalidOperation,
            ));
        }
        if doc.is_persisted() {
            log::error!("Document is already persisted in '{}'", self.name);
            return Err(VellumError::new(
                "Document is already persisted; use an update instead",
                ErrorKind::InvalidOperation,
            ));
        }

        doc.normalize();
        if let Err(issues) = doc.validate() {
            log::error!(
                "Validation of a new '{}' document failed with {} violation(s)",
                self.name,
                issues.len()
            );
            return Err(VellumError::validation_failed(issues));
        }

        let id = self.store.insert(&self.name, doc.to_record()).await?;
        doc.mark_persisted(id.clone());
        Ok(id)
    }

    /// Runs a compiled query and returns a cursor over the results.
    ///
    /// Rows arrive in the spec's sort order and bind lazily to persisted
    /// instances as the cursor is pulled. When the spec is unbounded and the
    /// mapper was configured with a default limit, that limit is applied
    /// here.
    pub async fn find(&self, spec: &QuerySpec) -> VellumResult<DocumentCursor> {
        let rows = match (spec.limit(), self.config.default_limit) {
            (None, Some(default_limit)) => {
                let mut bounded = spec.clone();
                bounded.limit = Some(default_limit);
                self.store.query(&self.name, &bounded).await?
            }
            _ => self.store.query(&self.name, spec).await?,
        };
        Ok(DocumentCursor::new(self.schema.clone(), rows))
    }

    /// Fetches a single document by identity.
    pub async fn find_by_id(&self, id: &DocumentId) -> VellumResult<Option<DocumentInstance>> {
        match self.store.find_one(&self.name, &by_id(id)).await? {
            Some(record) => Ok(Some(DocumentInstance::from_record(
                self.schema.clone(),
                record,
            )?)),
            None => Ok(None),
        }
    }

    /// Counts the documents a compiled query selects.
    pub async fn count(&self, spec: &QuerySpec) -> VellumResult<u64> {
        let rows = self.store.query(&self.name, spec).await?;
        Ok(rows.len() as u64)
    }

    /// Updates a document through the load-mutate-save path.
    ///
    /// The document is fetched by identity, handed to `mutator`, normalized,
    /// re-validated, and saved back. The in-memory document reflects the
    /// pre-update store state during mutation; there is no isolation against
    /// concurrent writers of the same identity (last write wins), so callers
    /// needing stronger guarantees must serialize externally.
    ///
    /// # Returns
    ///
    /// `Ok(true)` when the document was updated, `Ok(false)` when no
    /// document with that identity exists (skip-if-absent, not an error).
    pub async fn update_loaded<F>(&self, id: &DocumentId, mutator: F) -> VellumResult<bool>
    where
        F: FnOnce(&mut DocumentInstance),
    {
        let Some(mut doc) = self.find_by_id(id).await? else {
            log::debug!("No '{}' document with id {}; skipping update", self.name, id);
            return Ok(false);
        };

        mutator(&mut doc);

        doc.normalize();
        if let Err(issues) = doc.validate() {
            log::error!(
                "Validation of updated '{}' document {} failed with {} violation(s)",
                self.name,
                id,
                issues.len()
            );
            return Err(VellumError::validation_failed(issues));
        }

        let result = self
            .store
            .update_many(&self.name, &by_id(id), &doc.to_record())
            .await?;
        doc.mark_saved();
        Ok(result.matched_count() > 0)
    }

    /// Applies a patch to every document matching the filter, in the store,
    /// without loading documents client-side.
    ///
    /// This path trades safety for the saved read round-trip: the patched
    /// state is **not** re-validated against the schema. A patch can
    /// therefore leave stored documents outside their declared constraints;
    /// use [`MappedCollection::update_loaded`] when that matters.
    ///
    /// # Returns
    ///
    /// The matched and modified document counts reported by the store.
    pub async fn update_direct(
        &self,
        filter: FilterExpr,
        patch: Record,
    ) -> VellumResult<UpdateResult> {
        self.store.update_many(&self.name, &filter, &patch).await
    }

    /// Deletes at most one document matching the filter.
    ///
    /// Which document is removed when several match is up to the store; the
    /// contract only promises "at most one". Use an identity filter for
    /// precise deletes.
    ///
    /// # Returns
    ///
    /// `true` when a document was deleted, `false` when nothing matched
    /// (not an error).
    pub async fn delete_one(&self, filter: FilterExpr) -> VellumResult<bool> {
        self.store.delete_one(&self.name, &filter).await
    }

    /// Deletes a persisted document by its identity and marks the instance
    /// deleted (a terminal state) on success.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when the instance was never persisted.
    pub async fn delete(&self, doc: &mut DocumentInstance) -> VellumResult<bool> {
        let id = match doc.identity() {
            Some(id) => id.clone(),
            None => {
                log::error!("Cannot delete an unpersisted document from '{}'", self.name);
                return Err(VellumError::new(
                    "Cannot delete an unpersisted document",
                    ErrorKind::InvalidOperation,
                ));
            }
        };

        let deleted = self.store.delete_one(&self.name, &by_id(&id)).await?;
        if deleted {
            doc.mark_deleted();
        }
        Ok(deleted)
    }
}
