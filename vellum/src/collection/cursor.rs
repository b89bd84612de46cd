use crate::common::Record;
use crate::document::DocumentInstance;
use crate::errors::VellumResult;
use crate::schema::Schema;

/// A finite, non-restartable sequence of read results.
///
/// The cursor holds the rows the store returned, in store order, and binds
/// each one to a persisted [DocumentInstance] only when it is pulled.
/// Dropping the cursor early is the cooperative cancellation point for a
/// read: remaining rows are never bound.
///
/// # Examples
///
/// ```ignore
/// let cursor = collection.find(&spec).await?;
/// for doc in cursor {
///     let doc = doc?;
///     println!("{}", doc.get("name"));
/// }
/// ```
#[derive(Debug)]
pub struct DocumentCursor {
    schema: Schema,
    records: std::vec::IntoIter<Record>,
}

impl DocumentCursor {
    pub(crate) fn new(schema: Schema, records: Vec<Record>) -> Self {
        DocumentCursor {
            schema,
            records: records.into_iter(),
        }
    }

    /// The number of rows not yet pulled from the cursor.
    pub fn size(&self) -> usize {
        self.records.len()
    }
}

impl Iterator for DocumentCursor {
    type Item = VellumResult<DocumentInstance>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records
            .next()
            .map(|record| DocumentInstance::from_record(self.schema.clone(), record))
    }
}
