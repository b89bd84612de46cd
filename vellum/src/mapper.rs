use std::sync::Arc;

use crate::collection::MappedCollection;
use crate::errors::{ErrorKind, VellumError, VellumResult};
use crate::mapper_config::MapperConfig;
use crate::schema::Schema;
use crate::store::DocumentStore;

/// The top-level entry point of the mapper.
///
/// A `DocumentMapper` wraps an already-connected [DocumentStore] handle and
/// hands out [MappedCollection]s bound to it. Connection establishment,
/// retry, and disconnection are a bootstrap concern: whoever owns the
/// process connects the store and passes the handle in.
///
/// # Design Pattern
///
/// The mapper uses a shared-inner design: clones are cheap and all share the
/// same store handle and configuration through `Arc`.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use vellum::mapper::DocumentMapper;
/// use vellum::store::memory::InMemoryStore;
///
/// let store = Arc::new(InMemoryStore::new());
/// let mapper = DocumentMapper::new(store);
/// let courses = mapper.collection("courses", course_schema)?;
/// ```
#[derive(Clone)]
pub struct DocumentMapper {
    inner: Arc<DocumentMapperInner>,
}

struct DocumentMapperInner {
    store: Arc<dyn DocumentStore>,
    config: MapperConfig,
}

impl DocumentMapper {
    /// Creates a mapper over a connected store with default configuration.
    ///
    /// # Arguments
    ///
    /// * `store` - An already-connected store handle
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        DocumentMapper::with_config(store, MapperConfig::new())
    }

    /// Creates a mapper over a connected store with the given configuration.
    pub fn with_config(store: Arc<dyn DocumentStore>, config: MapperConfig) -> Self {
        DocumentMapper {
            inner: Arc::new(DocumentMapperInner { store, config }),
        }
    }

    /// Returns the mapper configuration.
    pub fn config(&self) -> &MapperConfig {
        &self.inner.config
    }

    /// Binds a schema to a named collection and returns its CRUD executor.
    ///
    /// # Arguments
    ///
    /// * `name` - The collection name in the store. Cannot be empty.
    /// * `schema` - The schema every document in the collection maps to
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` when the collection name is empty.
    pub fn collection(&self, name: &str, schema: Schema) -> VellumResult<MappedCollection> {
        if name.trim().is_empty() {
            log::error!("Collection name cannot be empty");
            return Err(VellumError::new(
                "Collection name cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }

        Ok(MappedCollection::new(
            name.to_string(),
            schema,
            self.inner.store.clone(),
            self.inner.config.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDescriptor;
    use crate::store::memory::InMemoryStore;

    #[ctor::ctor]
    fn init_logger() {
        colog::init();
    }

    fn test_schema() -> Schema {
        Schema::new(vec![FieldDescriptor::string("name")]).unwrap()
    }

    #[test]
    fn test_collection_binds_name_and_schema() {
        let mapper = DocumentMapper::new(Arc::new(InMemoryStore::new()));
        let collection = mapper.collection("courses", test_schema()).unwrap();
        assert_eq!(collection.name(), "courses");
        assert_eq!(collection.schema().len(), 1);
    }

    #[test]
    fn test_empty_collection_name_is_rejected() {
        let mapper = DocumentMapper::new(Arc::new(InMemoryStore::new()));
        let result = mapper.collection("  ", test_schema());
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_config_is_threaded_through() {
        let mapper = DocumentMapper::with_config(
            Arc::new(InMemoryStore::new()),
            MapperConfig::new().default_limit(50),
        );
        assert_eq!(mapper.config().default_limit, Some(50));
    }

    #[test]
    fn test_clones_share_the_store() {
        let store = Arc::new(InMemoryStore::new());
        let mapper = DocumentMapper::new(store);
        let clone = mapper.clone();
        assert!(Arc::ptr_eq(&mapper.inner, &clone.inner));
    }
}
