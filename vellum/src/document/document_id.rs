use std::fmt::{Debug, Display, Formatter};

use uuid::Uuid;

use crate::errors::{ErrorKind, VellumError, VellumResult};

/// An opaque unique identifier for a persisted document.
///
/// Identities are assigned by the document store when a document is first
/// inserted; callers never construct the value of an existing document by
/// hand. On the wire the identity travels in the reserved `_id` record field.
///
/// # Examples
///
/// ```ignore
/// let id = DocumentId::new();
/// let parsed = DocumentId::parse(&id.to_string())?;
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentId {
    inner: Uuid,
}

impl DocumentId {
    /// Creates a new random identity.
    pub fn new() -> Self {
        DocumentId {
            inner: Uuid::new_v4(),
        }
    }

    /// Parses an identity from its canonical string form.
    ///
    /// # Arguments
    ///
    /// * `value` - A hyphenated UUID string
    ///
    /// # Errors
    ///
    /// Returns an `InvalidOperation` error when the string is not a valid
    /// identity.
    pub fn parse(value: &str) -> VellumResult<Self> {
        match Uuid::parse_str(value) {
            Ok(inner) => Ok(DocumentId { inner }),
            Err(err) => {
                log::error!("Invalid document identity '{}': {}", value, err);
                Err(VellumError::new(
                    &format!("Invalid document identity: {}", value),
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        DocumentId::new()
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.hyphenated())
    }
}

impl Debug for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentId({})", self.inner.hyphenated())
    }
}
