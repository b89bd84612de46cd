use std::sync::Arc;

use indexmap::IndexMap;

use crate::common::{Record, Value, RESERVED_FIELDS};
use crate::errors::{ErrorKind, ValidationIssue, VellumError, VellumResult, ViolationKind};
use crate::schema::field::{FieldDescriptor, FieldKind};

/// An ordered collection of unique [FieldDescriptor]s defining the valid
/// shape of a document.
///
/// # Purpose
/// A schema declares what a document may contain and validates candidate
/// value mappings against those declarations. Declaration order is preserved
/// (it drives reporting order and canonical serialization), but it never
/// changes a validation outcome.
///
/// # Characteristics
/// - **Immutable**: Once constructed, a schema never changes
/// - **Shared**: Clones share the same underlying state through `Arc`, so a
///   schema can be handed to every document instance and query builder built
///   against it
/// - **Total validation**: [`Schema::validate`] collects every violation
///   rather than stopping at the first
///
/// # Examples
///
/// ```ignore
/// let schema = Schema::new(vec![
///     FieldDescriptor::string("name").required(true).min_length(5),
///     FieldDescriptor::string("category").enum_values(["web", "mobile", "network"]),
///     FieldDescriptor::boolean("is_published").default_value(false),
///     FieldDescriptor::number("price")
///         .required_if(|doc| doc.get("is_published") == Value::Bool(true))
///         .min(10.0)
///         .max(200.0),
/// ])?;
/// ```
#[derive(Clone, Debug)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

#[derive(Debug)]
struct SchemaInner {
    fields: IndexMap<String, FieldDescriptor>,
}

impl Schema {
    /// Creates a schema from an ordered list of field descriptors.
    ///
    /// # Arguments
    ///
    /// * `fields` - The descriptors, in declaration order
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldName` when two descriptors share a name, or when
    /// a descriptor uses a reserved field name.
    pub fn new(fields: Vec<FieldDescriptor>) -> VellumResult<Schema> {
        let mut map = IndexMap::with_capacity(fields.len());
        for descriptor in fields {
            let name = descriptor.name().to_string();
            if RESERVED_FIELDS.contains(&name.as_str()) {
                log::error!("Field name '{}' is reserved", name);
                return Err(VellumError::new(
                    &format!("Field name '{}' is reserved", name),
                    ErrorKind::InvalidFieldName,
                ));
            }
            if map.insert(name.clone(), descriptor).is_some() {
                log::error!("Duplicate field '{}' in schema", name);
                return Err(VellumError::new(
                    &format!("Duplicate field '{}' in schema", name),
                    ErrorKind::InvalidFieldName,
                ));
            }
        }
        Ok(Schema {
            inner: Arc::new(SchemaInner { fields: map }),
        })
    }

    /// Looks up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.inner.fields.get(name)
    }

    /// Iterates over the descriptors in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.inner.fields.values()
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Applies defaults and string normalization to a candidate record.
    ///
    /// For each absent field with a default, the default is materialized.
    /// String fields with `trim` or `lowercase` set are rewritten in place.
    /// This runs before [`Schema::validate`], so defaults and normalized
    /// values must themselves satisfy the declared constraints.
    pub fn normalize(&self, record: &mut Record) {
        for descriptor in self.fields() {
            let name = descriptor.name();

            if !record.contains(name) {
                if let Some(default) = descriptor.default() {
                    // put only fails for empty or reserved names, which the
                    // schema constructor has already ruled out
                    let _ = record.put(name, default.produce());
                }
            }

            if descriptor.kind() == FieldKind::String
                && (descriptor.trims() || descriptor.lowercases())
            {
                if let Value::String(text) = record.get(name) {
                    let mut text = text;
                    if descriptor.trims() {
                        text = text.trim().to_string();
                    }
                    if descriptor.lowercases() {
                        text = text.to_lowercase();
                    }
                    let _ = record.put(name, text);
                }
            }
        }
    }

    /// Validates a candidate record against every declared field, in order.
    ///
    /// Validation is total: all violations are collected and returned
    /// together. A field is considered absent when it is missing from the
    /// record or explicitly null. Conditional requirements are resolved
    /// against the full candidate record, so declaration order cannot change
    /// the outcome.
    ///
    /// # Returns
    ///
    /// `Ok(())` when every constraint is satisfied, otherwise the complete
    /// list of violations.
    pub fn validate(&self, record: &Record) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        for descriptor in self.fields() {
            let name = descriptor.name();
            let value = record.get(name);

            if value.is_null() {
                if descriptor.requirement().resolve(record) {
                    issues.push(ValidationIssue::new(
                        name,
                        ViolationKind::MissingRequiredField,
                        &format!("{} is required", name),
                    ));
                }
                continue;
            }

            if !descriptor.kind().accepts(&value) {
                issues.push(ValidationIssue::new(
                    name,
                    ViolationKind::TypeMismatch,
                    &format!(
                        "expected {}, found {}",
                        descriptor.kind().name(),
                        value.kind_name()
                    ),
                ));
                // further constraints are meaningless on the wrong type
                continue;
            }

            match &value {
                Value::String(text) => self.check_string(descriptor, text, &mut issues),
                Value::I64(_) | Value::F64(_) => {
                    // the kind check guarantees as_f64 succeeds here
                    if let Some(number) = value.as_f64() {
                        self.check_number(descriptor, number, &mut issues);
                    }
                }
                _ => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    fn check_string(
        &self,
        descriptor: &FieldDescriptor,
        text: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let name = descriptor.name();
        let length = text.chars().count();

        if let Some(min_length) = descriptor.min_length_bound() {
            if length < min_length {
                issues.push(ValidationIssue::new(
                    name,
                    ViolationKind::LengthOutOfRange,
                    &format!("length {} is below the minimum of {}", length, min_length),
                ));
            }
        }
        if let Some(max_length) = descriptor.max_length_bound() {
            if length > max_length {
                issues.push(ValidationIssue::new(
                    name,
                    ViolationKind::LengthOutOfRange,
                    &format!("length {} is above the maximum of {}", length, max_length),
                ));
            }
        }

        if let Some(allowed) = descriptor.allowed_values() {
            if !allowed.contains(text) {
                issues.push(ValidationIssue::new(
                    name,
                    ViolationKind::InvalidEnumValue,
                    &format!("'{}' is not one of the allowed values", text),
                ));
            }
        }

        if let Some(pattern) = descriptor.pattern_constraint() {
            match &pattern.compiled {
                Some(regex) => {
                    if !regex.is_match(text) {
                        issues.push(ValidationIssue::new(
                            name,
                            ViolationKind::PatternMismatch,
                            &format!("'{}' does not match pattern /{}/", text, pattern.raw),
                        ));
                    }
                }
                None => {
                    log::error!(
                        "Skipping unparseable pattern /{}/ on field '{}'",
                        pattern.raw,
                        name
                    );
                }
            }
        }
    }

    fn check_number(
        &self,
        descriptor: &FieldDescriptor,
        number: f64,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let name = descriptor.name();

        if let Some(min) = descriptor.min_bound() {
            if number < min {
                issues.push(ValidationIssue::new(
                    name,
                    ViolationKind::ValueOutOfRange,
                    &format!("{} is below the minimum of {}", number, min),
                ));
            }
        }
        if let Some(max) = descriptor.max_bound() {
            if number > max {
                issues.push(ValidationIssue::new(
                    name,
                    ViolationKind::ValueOutOfRange,
                    &format!("{} is above the maximum of {}", number, max),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use proptest::prelude::*;

    fn course_schema() -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name")
                .required(true)
                .min_length(5)
                .max_length(255),
            FieldDescriptor::string("category").enum_values(["web", "mobile", "network"]),
            FieldDescriptor::boolean("is_published").default_value(false),
            FieldDescriptor::number("price")
                .required_if(|doc| doc.get("is_published") == Value::Bool(true))
                .min(10.0)
                .max(200.0),
        ])
        .unwrap()
    }

    fn has_violation(issues: &[ValidationIssue], field: &str, kind: ViolationKind) -> bool {
        issues
            .iter()
            .any(|issue| issue.field() == field && issue.kind() == &kind)
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = Schema::new(vec![
            FieldDescriptor::string("name"),
            FieldDescriptor::number("name"),
        ]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidFieldName);
    }

    #[test]
    fn test_reserved_field_rejected() {
        let result = Schema::new(vec![FieldDescriptor::string("_id")]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidFieldName);
    }

    #[test]
    fn test_valid_document_passes() {
        let schema = course_schema();
        let record = record! {
            name: "Rust 101",
            category: "web",
            is_published: true,
            price: 15,
        };
        assert!(schema.validate(&record).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let schema = course_schema();
        let issues = schema.validate(&record! {}).unwrap_err();
        assert!(has_violation(&issues, "name", ViolationKind::MissingRequiredField));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let schema = course_schema();
        let record = record! { name: (Value::Null) };
        let issues = schema.validate(&record).unwrap_err();
        assert!(has_violation(&issues, "name", ViolationKind::MissingRequiredField));
    }

    #[test]
    fn test_conditional_required_triggers_when_published() {
        let schema = course_schema();
        let record = record! {
            name: "Rust 101",
            category: "web",
            is_published: true,
        };
        let issues = schema.validate(&record).unwrap_err();
        assert!(has_violation(&issues, "price", ViolationKind::MissingRequiredField));
    }

    #[test]
    fn test_conditional_required_quiet_when_draft() {
        let schema = course_schema();
        let record = record! {
            name: "Rust 101",
            category: "web",
            is_published: false,
        };
        assert!(schema.validate(&record).is_ok());
    }

    #[test]
    fn test_conditional_required_is_order_independent() {
        // same constraints, with the predicate target declared after the
        // field that depends on it
        let schema = Schema::new(vec![
            FieldDescriptor::number("price")
                .required_if(|doc| doc.get("is_published") == Value::Bool(true)),
            FieldDescriptor::boolean("is_published"),
        ])
        .unwrap();

        let published = record! { is_published: true };
        let issues = schema.validate(&published).unwrap_err();
        assert!(has_violation(&issues, "price", ViolationKind::MissingRequiredField));

        let draft = record! { is_published: false };
        assert!(schema.validate(&draft).is_ok());
    }

    #[test]
    fn test_type_mismatch() {
        let schema = course_schema();
        let record = record! { name: 42 };
        let issues = schema.validate(&record).unwrap_err();
        assert!(has_violation(&issues, "name", ViolationKind::TypeMismatch));
    }

    #[test]
    fn test_type_mismatch_suppresses_further_checks() {
        let schema = course_schema();
        let record = record! { name: 42 };
        let issues = schema.validate(&record).unwrap_err();
        let name_issues: Vec<_> = issues.iter().filter(|i| i.field() == "name").collect();
        assert_eq!(name_issues.len(), 1);
    }

    #[test]
    fn test_string_length_bounds() {
        let schema = course_schema();

        let short = record! { name: "abc" };
        let issues = schema.validate(&short).unwrap_err();
        assert!(has_violation(&issues, "name", ViolationKind::LengthOutOfRange));

        let long = record! { name: ("x".repeat(300)) };
        let issues = schema.validate(&long).unwrap_err();
        assert!(has_violation(&issues, "name", ViolationKind::LengthOutOfRange));
    }

    #[test]
    fn test_numeric_bounds() {
        let schema = course_schema();

        let cheap = record! { name: "Rust 101", price: 5 };
        let issues = schema.validate(&cheap).unwrap_err();
        assert!(has_violation(&issues, "price", ViolationKind::ValueOutOfRange));

        let expensive = record! { name: "Rust 101", price: 500 };
        let issues = schema.validate(&expensive).unwrap_err();
        assert!(has_violation(&issues, "price", ViolationKind::ValueOutOfRange));
    }

    #[test]
    fn test_enum_membership() {
        let schema = course_schema();
        let record = record! { name: "Rust 101", category: "cooking" };
        let issues = schema.validate(&record).unwrap_err();
        assert!(has_violation(&issues, "category", ViolationKind::InvalidEnumValue));
    }

    #[test]
    fn test_pattern_constraint() {
        let schema = Schema::new(vec![FieldDescriptor::string("code").pattern("^[A-Z]{3}$")])
            .unwrap();

        assert!(schema.validate(&record! { code: "ABC" }).is_ok());
        let issues = schema.validate(&record! { code: "abc" }).unwrap_err();
        assert!(has_violation(&issues, "code", ViolationKind::PatternMismatch));
    }

    #[test]
    fn test_unparseable_pattern_is_skipped() {
        let schema = Schema::new(vec![FieldDescriptor::string("code").pattern("(?P<broken>")])
            .unwrap();
        assert!(schema.validate(&record! { code: "anything" }).is_ok());
    }

    #[test]
    fn test_validation_collects_all_violations() {
        let schema = course_schema();
        let record = record! {
            name: "abc",
            category: "cooking",
            is_published: true,
            price: 5,
        };
        let issues = schema.validate(&record).unwrap_err();
        assert!(has_violation(&issues, "name", ViolationKind::LengthOutOfRange));
        assert!(has_violation(&issues, "category", ViolationKind::InvalidEnumValue));
        assert!(has_violation(&issues, "price", ViolationKind::ValueOutOfRange));
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_normalize_applies_static_default() {
        let schema = course_schema();
        let mut record = record! { name: "Rust 101" };
        schema.normalize(&mut record);
        assert_eq!(record.get("is_published"), Value::Bool(false));
    }

    #[test]
    fn test_normalize_applies_computed_default() {
        let schema = Schema::new(vec![
            FieldDescriptor::number("attempts").default_with(|| Value::I64(0)),
        ])
        .unwrap();
        let mut record = record! {};
        schema.normalize(&mut record);
        assert_eq!(record.get("attempts"), Value::I64(0));
    }

    #[test]
    fn test_normalize_does_not_overwrite_present_fields() {
        let schema = course_schema();
        let mut record = record! { name: "Rust 101", is_published: true };
        schema.normalize(&mut record);
        assert_eq!(record.get("is_published"), Value::Bool(true));
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let schema = Schema::new(vec![
            FieldDescriptor::string("category")
                .enum_values(["web", "mobile", "network"])
                .trim()
                .lowercase(),
        ])
        .unwrap();

        let mut record = record! { category: "  Web " };
        schema.normalize(&mut record);
        assert_eq!(record.get("category"), Value::from("web"));
        assert!(schema.validate(&record).is_ok());
    }

    #[test]
    fn test_default_is_validated_like_any_value() {
        // a default outside the declared bounds must be reported
        let schema = Schema::new(vec![
            FieldDescriptor::number("price").min(10.0).default_value(5),
        ])
        .unwrap();

        let mut record = record! {};
        schema.normalize(&mut record);
        let issues = schema.validate(&record).unwrap_err();
        assert!(has_violation(&issues, "price", ViolationKind::ValueOutOfRange));
    }

    #[test]
    fn test_declaration_order_drives_reporting_order() {
        let schema = course_schema();
        let record = record! { category: "cooking" };
        let issues = schema.validate(&record).unwrap_err();
        assert_eq!(issues[0].field(), "name");
        assert_eq!(issues[1].field(), "category");
    }

    proptest! {
        // validation succeeds exactly when every constraint holds after
        // defaults are applied, for arbitrary field subsets
        #[test]
        fn validation_passes_iff_constraints_hold(
            has_name in any::<bool>(),
            name_len in 0usize..12,
            has_price in any::<bool>(),
            price in -50i64..300,
            is_published in any::<bool>(),
        ) {
            let schema = course_schema();

            let mut record = Record::new();
            if has_name {
                record.put("name", "x".repeat(name_len)).unwrap();
            }
            if has_price {
                record.put("price", price).unwrap();
            }
            record.put("is_published", is_published).unwrap();

            schema.normalize(&mut record);
            let outcome = schema.validate(&record);

            let name_ok = has_name && name_len >= 5;
            let price_ok = if has_price {
                (10..=200).contains(&price)
            } else {
                !is_published
            };

            prop_assert_eq!(outcome.is_ok(), name_ok && price_ok);
        }
    }
}
