use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexMap;

use crate::common::{atomic, Atomic, ReadExecutor, Record, WriteExecutor, DOC_ID};
use crate::document::DocumentId;
use crate::errors::{ErrorKind, VellumError, VellumResult};
use crate::filter::FilterExpr;
use crate::query::QuerySpec;
use crate::store::{DocumentStore, UpdateResult};

/// In-memory implementation of the [DocumentStore] capability.
///
/// # Purpose
/// `InMemoryStore` provides a complete store implementation suitable for
/// tests, examples, and temporary data. Collections live in a concurrent
/// registry; each collection keeps its rows in insertion order, which is the
/// order unsorted queries observe.
///
/// # Characteristics
/// - **Thread-Safe**: Fully concurrent with safe sharing across tasks
/// - **Faithful**: Evaluates the whole filter grammar and honors sort,
///   projection, skip, and limit exactly as the capability contract states
/// - **No Persistence**: All data is lost when the store is dropped
/// - **Failure Injection**: [`InMemoryStore::set_unavailable`] makes every
///   subsequent operation fail with `StoreUnavailable`, so callers can test
///   their error surfacing
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    collections: DashMap<String, Atomic<IndexMap<String, Record>>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner {
                collections: DashMap::new(),
                unavailable: AtomicBool::new(false),
            }),
        }
    }

    /// Toggles simulated unavailability.
    ///
    /// While unavailable, every store operation fails with
    /// `StoreUnavailable` without touching any data.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of documents in a collection.
    pub fn collection_size(&self, collection_name: &str) -> usize {
        match self.inner.collections.get(collection_name) {
            Some(rows) => rows.value().read_with(|map| map.len()),
            None => 0,
        }
    }

    fn ensure_available(&self) -> VellumResult<()> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            log::error!("In-memory store is marked unavailable");
            return Err(VellumError::new(
                "Store is unavailable",
                ErrorKind::StoreUnavailable,
            ));
        }
        Ok(())
    }

    fn rows(&self, collection_name: &str) -> Atomic<IndexMap<String, Record>> {
        self.inner
            .collections
            .entry(collection_name.to_string())
            .or_insert_with(|| atomic(IndexMap::new()))
            .value()
            .clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, collection_name: &str, record: Record) -> VellumResult<DocumentId> {
        self.ensure_available()?;

        let mut record = record;
        if record.contains(DOC_ID) {
            log::warn!("Discarding caller-supplied {} field on insert", DOC_ID);
            record.remove(DOC_ID);
        }

        let id = DocumentId::new();
        record.put(DOC_ID, id.clone())?;

        let rows = self.rows(collection_name);
        rows.write_with(|map| {
            map.insert(id.to_string(), record);
        });

        log::debug!("Inserted document {} into '{}'", id, collection_name);
        Ok(id)
    }

    async fn query(&self, collection_name: &str, spec: &QuerySpec) -> VellumResult<Vec<Record>> {
        self.ensure_available()?;

        let rows = self.rows(collection_name);
        let mut matches = rows.read_with(|map| -> VellumResult<Vec<Record>> {
            let mut matches = Vec::new();
            for record in map.values() {
                if spec.filter().matches(record)? {
                    matches.push(record.clone());
                }
            }
            Ok(matches)
        })?;

        if !spec.sort().is_empty() {
            // stable sort: ties keep insertion order
            matches.sort_by(|a, b| {
                for (field_name, order) in spec.sort() {
                    let ordering = a.get(field_name).cmp(&b.get(field_name));
                    let ordering = match order {
                        crate::common::SortOrder::Ascending => ordering,
                        crate::common::SortOrder::Descending => ordering.reverse(),
                    };
                    if ordering != std::cmp::Ordering::Equal {
                        return ordering;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        if let Some(projection) = spec.projection() {
            for record in &mut matches {
                record.retain(|key, _| key == DOC_ID || projection.contains(key));
            }
        }

        let skip = spec.skip() as usize;
        let limit = spec.limit().map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(matches.into_iter().skip(skip).take(limit).collect())
    }

    async fn update_many(
        &self,
        collection_name: &str,
        filter: &FilterExpr,
        patch: &Record,
    ) -> VellumResult<UpdateResult> {
        self.ensure_available()?;

        let rows = self.rows(collection_name);
        rows.write_with(|map| -> VellumResult<UpdateResult> {
            let mut matched = 0u64;
            let mut modified = 0u64;

            for record in map.values_mut() {
                if !filter.matches(record)? {
                    continue;
                }
                matched += 1;

                let mut changed = false;
                for (key, value) in patch.iter() {
                    if key == DOC_ID {
                        log::warn!("Ignoring {} field in update patch", DOC_ID);
                        continue;
                    }
                    if record.get(key) != *value {
                        record.put(key, value.clone())?;
                        changed = true;
                    }
                }
                if changed {
                    modified += 1;
                }
            }

            Ok(UpdateResult::new(matched, modified))
        })
    }

    async fn find_one(
        &self,
        collection_name: &str,
        filter: &FilterExpr,
    ) -> VellumResult<Option<Record>> {
        self.ensure_available()?;

        let rows = self.rows(collection_name);
        rows.read_with(|map| -> VellumResult<Option<Record>> {
            for record in map.values() {
                if filter.matches(record)? {
                    return Ok(Some(record.clone()));
                }
            }
            Ok(None)
        })
    }

    async fn delete_one(&self, collection_name: &str, filter: &FilterExpr) -> VellumResult<bool> {
        self.ensure_available()?;

        let rows = self.rows(collection_name);
        rows.write_with(|map| -> VellumResult<bool> {
            let mut target = None;
            for (index, record) in map.values().enumerate() {
                if filter.matches(record)? {
                    target = Some(index);
                    break;
                }
            }
            match target {
                Some(index) => {
                    map.shift_remove_index(index);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }
}
