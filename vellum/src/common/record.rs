use indexmap::IndexMap;

use crate::common::{Value, DOC_ID};
use crate::errors::{ErrorKind, VellumError, VellumResult};

/// The plain field-to-value mapping exchanged with a document store.
///
/// Records are composed of key-value pairs. The key is always a [String] and
/// the value is a [Value]. Insertion order is preserved and defines the
/// canonical serialization order of a document; it never affects validation.
///
/// The `_id` field is reserved: it carries the store-assigned
/// [`crate::document::DocumentId`] and cannot be set to anything else.
///
/// # Examples
///
/// ```ignore
/// let mut record = Record::new();
/// record.put("name", "Rust 101")?;
/// record.put("price", 15)?;
/// assert_eq!(record.get("price"), Value::I64(15));
/// assert_eq!(record.get("missing"), Value::Null);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    data: IndexMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Record {
            data: IndexMap::new(),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of fields in the record.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Checks whether the record carries the given field, even if its value
    /// is [Value::Null].
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Associates the specified [Value] with the specified key.
    ///
    /// If the key already exists its value is updated in place, keeping the
    /// original field position.
    ///
    /// # Arguments
    ///
    /// * `key` - The field name. Cannot be empty.
    /// * `value` - Any type convertible into a [Value].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty, or if the key is the reserved
    /// `_id` field and the value is not an identity.
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> VellumResult<()> {
        if key.is_empty() {
            log::error!("Record does not support empty field names");
            return Err(VellumError::new(
                "Record does not support empty field names",
                ErrorKind::InvalidFieldName,
            ));
        }

        let value = value.into();
        if key == DOC_ID && value.as_id().is_none() {
            log::error!("The {} field is store-assigned and cannot be set manually", DOC_ID);
            return Err(VellumError::new(
                "The _id field is store-assigned and cannot be set manually",
                ErrorKind::InvalidOperation,
            ));
        }

        self.data.insert(key.to_string(), value);
        Ok(())
    }

    /// Returns the [Value] associated with the key, or [Value::Null] if the
    /// record contains no mapping for it.
    pub fn get(&self, key: &str) -> Value {
        self.data.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Removes the key and its value from the record, preserving the order of
    /// the remaining fields.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if the key was absent.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    /// Keeps only the fields for which the predicate returns `true`.
    pub fn retain<F: FnMut(&str, &Value) -> bool>(&mut self, mut keep: F) {
        self.data.retain(|key, value| keep(key, value));
    }

    /// Iterates over the fields in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }

    /// Returns the field names in insertion order.
    pub fn field_names(&self) -> Vec<&str> {
        self.data.keys().map(|k| k.as_str()).collect()
    }
}

/// Normalizes a stringified macro key into a field name.
///
/// `stringify!` keeps surrounding quotes for string-literal keys; this strips
/// them along with any incidental whitespace.
pub fn normalize(key: &str) -> String {
    key.trim().trim_matches('"').to_string()
}

/// Creates a [Record] from field-value pairs.
///
/// Values go through [`Value::from`], arrays are bracketed, and parenthesized
/// expressions are evaluated:
///
/// ```ignore
/// let record = record! {
///     name: "Rust 101",
///     price: 15,
///     tags: ["systems", "backend"],
///     total: (7 * 2),
/// };
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::common::Record::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::record_value;

            let mut record = $crate::common::Record::new();
            $(
                record.put(&$crate::common::record::normalize(stringify!($key)), $crate::record_value!($value))
                    .expect(&format!("Failed to put value {} in record", stringify!($value)));
            )*
            record
        }
    };
}

/// Helper macro to convert values for the record! macro.
#[macro_export]
macro_rules! record_value {
    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::record_value!($value)),*])
    };

    // match an expression (variable, function call, arithmetic in parens, literals, etc.)
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentId;
    use crate::record;

    #[test]
    fn test_new_record_is_empty() {
        let record = Record::new();
        assert!(record.is_empty());
        assert_eq!(record.size(), 0);
    }

    #[test]
    fn test_put_and_get() {
        let mut record = Record::new();
        record.put("name", "Rust 101").unwrap();
        record.put("price", 15).unwrap();
        assert_eq!(record.get("name"), Value::from("Rust 101"));
        assert_eq!(record.get("price"), Value::I64(15));
    }

    #[test]
    fn test_get_missing_returns_null() {
        let record = Record::new();
        assert_eq!(record.get("missing"), Value::Null);
    }

    #[test]
    fn test_put_empty_key_fails() {
        let mut record = Record::new();
        let result = record.put("", 1);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidFieldName);
    }

    #[test]
    fn test_put_doc_id_with_non_identity_fails() {
        let mut record = Record::new();
        let result = record.put(DOC_ID, "not-an-id");
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_put_doc_id_with_identity_succeeds() {
        let mut record = Record::new();
        let id = DocumentId::new();
        record.put(DOC_ID, Value::Id(id.clone())).unwrap();
        assert_eq!(record.get(DOC_ID), Value::Id(id));
    }

    #[test]
    fn test_put_overwrites_in_place() {
        let mut record = Record::new();
        record.put("a", 1).unwrap();
        record.put("b", 2).unwrap();
        record.put("a", 3).unwrap();
        assert_eq!(record.field_names(), vec!["a", "b"]);
        assert_eq!(record.get("a"), Value::I64(3));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut record = Record::new();
        record.put("z", 1).unwrap();
        record.put("a", 2).unwrap();
        record.put("m", 3).unwrap();
        assert_eq!(record.field_names(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_remove_preserves_remaining_order() {
        let mut record = Record::new();
        record.put("a", 1).unwrap();
        record.put("b", 2).unwrap();
        record.put("c", 3).unwrap();
        assert_eq!(record.remove("b"), Some(Value::I64(2)));
        assert_eq!(record.field_names(), vec!["a", "c"]);
        assert_eq!(record.remove("b"), None);
    }

    #[test]
    fn test_contains_sees_null_values() {
        let mut record = Record::new();
        record.put("maybe", Value::Null).unwrap();
        assert!(record.contains("maybe"));
        assert!(!record.contains("missing"));
    }

    #[test]
    fn test_retain() {
        let mut record = Record::new();
        record.put("a", 1).unwrap();
        record.put("b", 2).unwrap();
        record.put("c", 3).unwrap();
        record.retain(|key, _| key != "b");
        assert_eq!(record.field_names(), vec!["a", "c"]);
    }

    #[test]
    fn test_equality_ignores_field_order() {
        let mut left = Record::new();
        left.put("a", 1).unwrap();
        left.put("b", 2).unwrap();

        let mut right = Record::new();
        right.put("b", 2).unwrap();
        right.put("a", 1).unwrap();

        assert_eq!(left, right);
    }

    #[test]
    fn test_record_macro() {
        let record = record! {
            name: "Rust 101",
            price: 15,
            is_published: true,
            tags: ["systems", "backend"],
        };
        assert_eq!(record.get("name"), Value::from("Rust 101"));
        assert_eq!(record.get("price"), Value::I64(15));
        assert_eq!(record.get("is_published"), Value::Bool(true));
        assert_eq!(record.get("tags").as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_record_macro_with_expressions() {
        let base = 100;
        let record = record! {
            score: (base * 2),
            "quoted key": "works",
        };
        assert_eq!(record.get("score"), Value::I64(200));
        assert_eq!(record.get("quoted key"), Value::from("works"));
    }

    #[test]
    fn test_empty_record_macro() {
        let record = record! {};
        assert!(record.is_empty());
    }

    #[test]
    fn test_normalize_strips_quotes() {
        assert_eq!(normalize("\"first name\""), "first name");
        assert_eq!(normalize("plain"), "plain");
    }
}
