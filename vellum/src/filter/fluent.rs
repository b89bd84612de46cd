use crate::common::Value;

use super::{CmpOp, FilterExpr};

/// Creates a fluent filter builder for the specified field name.
///
/// This function initializes a filter builder that allows chaining of
/// comparison and membership operations on a specific field:
///
/// ```ignore
/// let filter = field("price").gt(10).and(field("category").eq("web"));
/// ```
///
/// # Arguments
///
/// * `field_name` - The name of the field to filter on
///
/// # Returns
///
/// A `FluentFilter` builder for constructing field-specific filters
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for constructing filters on a specific field.
///
/// `FluentFilter` provides chainable methods for creating filters with
/// various conditions including equality, comparison operators, membership,
/// and regex matching. Each method returns a [FilterExpr] that can be used
/// directly in a query or combined with other filters.
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    /// Creates a filter matching documents where the field equals the value.
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> FilterExpr {
        FilterExpr::Eq(self.field_name, value.into())
    }

    /// Creates a filter matching documents where the field differs from the
    /// value.
    #[inline]
    pub fn ne<T: Into<Value>>(self, value: T) -> FilterExpr {
        FilterExpr::Cmp(self.field_name, CmpOp::Ne, value.into())
    }

    /// Creates a filter matching documents where the field is greater than
    /// the value.
    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> FilterExpr {
        FilterExpr::Cmp(self.field_name, CmpOp::Gt, value.into())
    }

    /// Creates a filter matching documents where the field is greater than or
    /// equal to the value.
    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> FilterExpr {
        FilterExpr::Cmp(self.field_name, CmpOp::Gte, value.into())
    }

    /// Creates a filter matching documents where the field is less than the
    /// value.
    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> FilterExpr {
        FilterExpr::Cmp(self.field_name, CmpOp::Lt, value.into())
    }

    /// Creates a filter matching documents where the field is less than or
    /// equal to the value.
    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> FilterExpr {
        FilterExpr::Cmp(self.field_name, CmpOp::Lte, value.into())
    }

    /// Creates a filter matching documents where the field value is a member
    /// of the given list.
    pub fn one_of<T: Into<Value>>(self, values: Vec<T>) -> FilterExpr {
        FilterExpr::In(
            self.field_name,
            values.into_iter().map(Into::into).collect(),
        )
    }

    /// Creates a filter matching documents where the field value is not a
    /// member of the given list.
    pub fn not_one_of<T: Into<Value>>(self, values: Vec<T>) -> FilterExpr {
        FilterExpr::NotIn(
            self.field_name,
            values.into_iter().map(Into::into).collect(),
        )
    }

    /// Creates a filter matching documents where the string field matches the
    /// regex pattern.
    ///
    /// The pattern is passed through to the store as-is; it is not escaped.
    pub fn matches_pattern(self, pattern: &str, case_insensitive: bool) -> FilterExpr {
        FilterExpr::Regex {
            field: self.field_name,
            pattern: pattern.to_string(),
            case_insensitive,
        }
    }
}

/// Creates a case-sensitive filter matching string fields that start with the
/// given prefix.
///
/// This is a constructor convention over the regex operator, not a separate
/// grammar primitive: the prefix is escaped and anchored.
pub fn starts_with(field_name: &str, prefix: &str) -> FilterExpr {
    FilterExpr::Regex {
        field: field_name.to_string(),
        pattern: format!("^{}", regex::escape(prefix)),
        case_insensitive: false,
    }
}

/// Creates a case-sensitive filter matching string fields that end with the
/// given suffix.
pub fn ends_with(field_name: &str, suffix: &str) -> FilterExpr {
    FilterExpr::Regex {
        field: field_name.to_string(),
        pattern: format!("{}$", regex::escape(suffix)),
        case_insensitive: false,
    }
}

/// Creates a case-sensitive filter matching string fields that contain the
/// given text.
pub fn contains(field_name: &str, needle: &str) -> FilterExpr {
    FilterExpr::Regex {
        field: field_name.to_string(),
        pattern: regex::escape(needle),
        case_insensitive: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn test_eq_builder() {
        let filter = field("author").eq("marcus");
        assert_eq!(
            filter,
            FilterExpr::Eq("author".to_string(), Value::from("marcus"))
        );
    }

    #[test]
    fn test_comparison_builders() {
        assert_eq!(
            field("price").gt(10),
            FilterExpr::Cmp("price".to_string(), CmpOp::Gt, Value::I64(10))
        );
        assert_eq!(
            field("price").gte(10),
            FilterExpr::Cmp("price".to_string(), CmpOp::Gte, Value::I64(10))
        );
        assert_eq!(
            field("price").lt(10),
            FilterExpr::Cmp("price".to_string(), CmpOp::Lt, Value::I64(10))
        );
        assert_eq!(
            field("price").lte(10),
            FilterExpr::Cmp("price".to_string(), CmpOp::Lte, Value::I64(10))
        );
        assert_eq!(
            field("price").ne(10),
            FilterExpr::Cmp("price".to_string(), CmpOp::Ne, Value::I64(10))
        );
    }

    #[test]
    fn test_membership_builders() {
        let filter = field("category").one_of(vec!["web", "mobile"]);
        assert_eq!(
            filter,
            FilterExpr::In(
                "category".to_string(),
                vec![Value::from("web"), Value::from("mobile")]
            )
        );
    }

    #[test]
    fn test_matches_pattern_builder() {
        let filter = field("author").matches_pattern("^mar", true);
        assert_eq!(
            filter,
            FilterExpr::Regex {
                field: "author".to_string(),
                pattern: "^mar".to_string(),
                case_insensitive: true,
            }
        );
    }

    #[test]
    fn test_starts_with_compiles_to_anchored_pattern() {
        let filter = starts_with("author", "marcus");
        assert_eq!(
            filter,
            FilterExpr::Regex {
                field: "author".to_string(),
                pattern: "^marcus".to_string(),
                case_insensitive: false,
            }
        );
    }

    #[test]
    fn test_starts_with_semantics() {
        let filter = starts_with("author", "marcus");
        assert!(filter.matches(&record! { author: "marcus rules" }).unwrap());
        assert!(!filter.matches(&record! { author: "notmarcus" }).unwrap());
        // case-sensitive by construction
        assert!(!filter.matches(&record! { author: "Marcus rules" }).unwrap());
    }

    #[test]
    fn test_starts_with_escapes_metacharacters() {
        let filter = starts_with("code", "a.b");
        assert!(filter.matches(&record! { code: "a.b-rest" }).unwrap());
        assert!(!filter.matches(&record! { code: "axb-rest" }).unwrap());
    }

    #[test]
    fn test_ends_with_semantics() {
        let filter = ends_with("author", "cus");
        assert!(filter.matches(&record! { author: "marcus" }).unwrap());
        assert!(!filter.matches(&record! { author: "cusmar" }).unwrap());
    }

    #[test]
    fn test_contains_semantics() {
        let filter = contains("author", "arc");
        assert!(filter.matches(&record! { author: "marcus" }).unwrap());
        assert!(!filter.matches(&record! { author: "helena" }).unwrap());
    }
}
