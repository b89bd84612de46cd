use std::sync::Arc;

use chrono::Utc;
use vellum::collection::MappedCollection;
use vellum::common::Value;
use vellum::document::{DocumentId, DocumentInstance};
use vellum::errors::VellumResult;
use vellum::mapper::DocumentMapper;
use vellum::record;
use vellum::schema::{FieldDescriptor, Schema};
use vellum::store::memory::InMemoryStore;

/// A mapper wired to a fresh in-memory store, shared by the scenario tests.
#[derive(Clone)]
pub struct TestContext {
    store: InMemoryStore,
    mapper: DocumentMapper,
}

impl TestContext {
    /// The raw store handle, for asserting on store-side state and for
    /// toggling simulated unavailability.
    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    pub fn mapper(&self) -> &DocumentMapper {
        &self.mapper
    }

    /// The `courses` collection bound to the catalog schema.
    pub fn courses(&self) -> VellumResult<MappedCollection> {
        self.mapper.collection("courses", course_schema())
    }
}

/// The course catalog schema used across the integration tests.
///
/// Publishing a course makes its price mandatory; categories are normalized
/// to a fixed lowercase vocabulary; the creation timestamp defaults to now.
pub fn course_schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor::string("name")
            .required(true)
            .min_length(5)
            .max_length(255),
        FieldDescriptor::string("category")
            .enum_values(["web", "mobile", "network"])
            .trim()
            .lowercase(),
        FieldDescriptor::string("author"),
        FieldDescriptor::string_array("tags"),
        FieldDescriptor::date("created_at").default_with(|| Value::Date(Utc::now())),
        FieldDescriptor::boolean("is_published").default_value(false),
        FieldDescriptor::number("price")
            .required_if(|doc| doc.get("is_published") == Value::Bool(true))
            .min(10.0)
            .max(200.0),
    ])
    .expect("course schema is well-formed")
}

pub fn create_test_context() -> TestContext {
    let store = InMemoryStore::new();
    let mapper = DocumentMapper::new(Arc::new(store.clone()));
    TestContext { store, mapper }
}

/// Seeds the catalog with three published courses by the same author and one
/// draft by another, returning the identities in insertion order.
pub async fn seed_courses(collection: &MappedCollection) -> VellumResult<Vec<DocumentId>> {
    let mut ids = Vec::new();

    for (name, category, price) in [
        ("Node Fundamentals", "web", 15),
        ("Angular Fundamentals", "web", 30),
        ("React Fundamentals", "web", 20),
    ] {
        let mut course = DocumentInstance::new(
            course_schema(),
            record! {
                name: name,
                category: category,
                author: "marcus",
                tags: ["frontend", "backend"],
                is_published: true,
                price: price,
            },
        );
        ids.push(collection.create(&mut course).await?);
    }

    let mut draft = DocumentInstance::new(
        course_schema(),
        record! {
            name: "Networking Basics",
            category: "network",
            author: "helena",
        },
    );
    ids.push(collection.create(&mut draft).await?);

    Ok(ids)
}
