/// The reserved record field carrying a document's store identity.
///
/// The field is populated by the store on insert and must never be set
/// manually through [`crate::common::Record::put`] with a non-identity value.
pub const DOC_ID: &str = "_id";

/// Record fields reserved by the mapper.
pub const RESERVED_FIELDS: [&str; 1] = [DOC_ID];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_is_reserved() {
        assert!(RESERVED_FIELDS.contains(&DOC_ID));
    }
}
