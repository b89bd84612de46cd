use crate::common::{Record, Value, DOC_ID};
use crate::document::DocumentId;
use crate::errors::{ErrorKind, ValidationIssue, VellumError, VellumResult};
use crate::schema::Schema;

/// An in-memory document bound to a [Schema], tracking its persistence state.
///
/// # Lifecycle
///
/// A fresh instance starts in the `new` state with no identity. A successful
/// create moves it to `persisted` and assigns the store identity. Mutating a
/// persisted instance marks it dirty until the next successful save. A
/// successful delete moves it to `deleted`, which is terminal: a deleted
/// instance rejects further mutation.
///
/// ```text
/// New --create ok--> Persisted --set--> Persisted (dirty)
///                        |                    |
///                        |              save ok: Persisted (clean)
///                        +--delete ok--> Deleted (terminal)
/// ```
///
/// Construction performs no validation; validation runs explicitly through
/// [`DocumentInstance::validate`] or implicitly at save time.
#[derive(Clone, Debug)]
pub struct DocumentInstance {
    schema: Schema,
    values: Record,
    identity: Option<DocumentId>,
    persisted: bool,
    dirty: bool,
    deleted: bool,
}

impl DocumentInstance {
    /// Creates a new unpersisted instance from an initial value mapping.
    ///
    /// Any `_id` field in the initial mapping is discarded: identity is
    /// assigned by the store, never by the caller.
    ///
    /// # Arguments
    ///
    /// * `schema` - The schema this document is bound to
    /// * `initial` - The initial field values (not validated here)
    pub fn new(schema: Schema, mut initial: Record) -> Self {
        if initial.contains(DOC_ID) {
            log::warn!("Discarding caller-supplied {} field; identity is store-assigned", DOC_ID);
            initial.remove(DOC_ID);
        }

        DocumentInstance {
            schema,
            values: initial,
            identity: None,
            persisted: false,
            dirty: false,
            deleted: false,
        }
    }

    /// Binds a store row to a persisted instance.
    ///
    /// The reserved `_id` field is lifted out of the record into the
    /// instance's identity.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` when the row carries no identity, which means
    /// the store violated its contract.
    pub fn from_record(schema: Schema, mut record: Record) -> VellumResult<Self> {
        let identity = match record.remove(DOC_ID) {
            Some(Value::Id(id)) => id,
            other => {
                log::error!("Store returned a row without a usable {} field: {:?}", DOC_ID, other);
                return Err(VellumError::new(
                    "Store returned a row without an identity",
                    ErrorKind::StoreError,
                ));
            }
        };

        Ok(DocumentInstance {
            schema,
            values: record,
            identity: Some(identity),
            persisted: true,
            dirty: false,
            deleted: false,
        })
    }

    /// Returns the value of a field, or [Value::Null] if unset.
    pub fn get(&self, field: &str) -> Value {
        self.values.get(field)
    }

    /// Sets a field value and marks the instance dirty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` for a deleted instance or for the reserved
    /// `_id` field.
    pub fn set<T: Into<Value>>(&mut self, field: &str, value: T) -> VellumResult<()> {
        if self.deleted {
            log::error!("Cannot mutate a deleted document");
            return Err(VellumError::new(
                "Cannot mutate a deleted document",
                ErrorKind::InvalidOperation,
            ));
        }
        if field == DOC_ID {
            log::error!("The {} field is store-assigned and cannot be set", DOC_ID);
            return Err(VellumError::new(
                "The _id field is store-assigned and cannot be set",
                ErrorKind::InvalidOperation,
            ));
        }

        self.values.put(field, value)?;
        self.dirty = true;
        Ok(())
    }

    /// Applies the schema's defaults and string normalization to the values.
    ///
    /// Runs before validation so that a default must itself satisfy the
    /// field's constraints.
    pub fn normalize(&mut self) {
        self.schema.normalize(&mut self.values);
    }

    /// Validates the current values against the schema.
    ///
    /// Collects every violation instead of stopping at the first.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        self.schema.validate(&self.values)
    }

    /// Returns an immutable snapshot of the current values, without the
    /// identity field.
    pub fn to_record(&self) -> Record {
        self.values.clone()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn identity(&self) -> Option<&DocumentId> {
        self.identity.as_ref()
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn mark_persisted(&mut self, identity: DocumentId) {
        self.identity = Some(identity);
        self.persisted = true;
        self.dirty = false;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}
