use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use regex::Regex;

use crate::common::{Record, Value};

/// A predicate over the candidate document, used for conditional constraints.
///
/// The candidate record is passed explicitly; predicates must not rely on
/// captured document state. A typical use is making one field mandatory based
/// on a sibling field:
///
/// ```ignore
/// FieldDescriptor::number("price")
///     .required_if(|doc| doc.get("is_published") == Value::Bool(true))
/// ```
pub type Predicate = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Whether a field must be present, either unconditionally or depending on
/// the sibling fields of the document being validated.
#[derive(Clone)]
pub enum Requirement {
    /// The field is always (or never) required.
    Static(bool),
    /// The field is required when the predicate holds for the candidate
    /// document.
    Conditional(Predicate),
}

impl Requirement {
    /// Resolves the requirement against a candidate document.
    pub fn resolve(&self, record: &Record) -> bool {
        match self {
            Requirement::Static(required) => *required,
            Requirement::Conditional(predicate) => predicate(record),
        }
    }
}

impl Debug for Requirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Requirement::Static(required) => write!(f, "Static({})", required),
            Requirement::Conditional(_) => write!(f, "Conditional(..)"),
        }
    }
}

/// A default applied to an absent field before validation.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value.
    Static(Value),
    /// A zero-argument producer, evaluated once per application.
    Computed(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Produces the default value.
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Static(value) => value.clone(),
            DefaultValue::Computed(producer) => producer(),
        }
    }
}

impl Debug for DefaultValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Static(value) => write!(f, "Static({:?})", value),
            DefaultValue::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

/// The declared type of a document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Date,
    StringArray,
}

impl FieldKind {
    /// Checks whether a runtime value inhabits this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => matches!(value, Value::String(_)),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => matches!(value, Value::Bool(_)),
            FieldKind::Date => matches!(value, Value::Date(_)),
            FieldKind::StringArray => match value {
                Value::Array(values) => values.iter().all(|v| matches!(v, Value::String(_))),
                _ => false,
            },
        }
    }

    /// A short name for this kind, used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::StringArray => "string array",
        }
    }
}

/// A string pattern constraint, compiled eagerly.
///
/// An invalid pattern is logged at construction and the constraint is skipped
/// during validation rather than panicking, mirroring how invalid regex
/// filters are handled.
#[derive(Clone)]
pub(crate) struct FieldPattern {
    pub(crate) raw: String,
    pub(crate) compiled: Option<Regex>,
}

impl FieldPattern {
    fn new(raw: &str) -> Self {
        let compiled = match Regex::new(raw) {
            Ok(regex) => Some(regex),
            Err(err) => {
                log::error!("Invalid field pattern '{}': {}", raw, err);
                None
            }
        };
        FieldPattern {
            raw: raw.to_string(),
            compiled,
        }
    }
}

impl Debug for FieldPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/", self.raw)
    }
}

/// Declares one field of a document schema: its kind, its constraints, and
/// how absent values are defaulted and normalized.
///
/// Descriptors are built fluently:
///
/// ```ignore
/// let name = FieldDescriptor::string("name")
///     .required(true)
///     .min_length(5)
///     .max_length(255);
///
/// let price = FieldDescriptor::number("price")
///     .required_if(|doc| doc.get("is_published") == Value::Bool(true))
///     .min(10.0)
///     .max(200.0);
///
/// let category = FieldDescriptor::string("category")
///     .enum_values(["web", "mobile", "network"])
///     .lowercase();
/// ```
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    required: Requirement,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min: Option<f64>,
    max: Option<f64>,
    enum_values: Option<BTreeSet<String>>,
    pattern: Option<FieldPattern>,
    default: Option<DefaultValue>,
    trim: bool,
    lowercase: bool,
}

impl FieldDescriptor {
    fn new(name: &str, kind: FieldKind) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            kind,
            required: Requirement::Static(false),
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            enum_values: None,
            pattern: None,
            default: None,
            trim: false,
            lowercase: false,
        }
    }

    /// Declares a string field.
    pub fn string(name: &str) -> Self {
        FieldDescriptor::new(name, FieldKind::String)
    }

    /// Declares a numeric field.
    pub fn number(name: &str) -> Self {
        FieldDescriptor::new(name, FieldKind::Number)
    }

    /// Declares a boolean field.
    pub fn boolean(name: &str) -> Self {
        FieldDescriptor::new(name, FieldKind::Boolean)
    }

    /// Declares a date field.
    pub fn date(name: &str) -> Self {
        FieldDescriptor::new(name, FieldKind::Date)
    }

    /// Declares a string-array field.
    pub fn string_array(name: &str) -> Self {
        FieldDescriptor::new(name, FieldKind::StringArray)
    }

    /// Marks the field unconditionally required (or not).
    pub fn required(mut self, required: bool) -> Self {
        self.required = Requirement::Static(required);
        self
    }

    /// Marks the field required when the predicate holds for the candidate
    /// document. The predicate receives the full candidate value mapping.
    pub fn required_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        self.required = Requirement::Conditional(Arc::new(predicate));
        self
    }

    /// Minimum string length (inclusive).
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Maximum string length (inclusive).
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Minimum numeric value (inclusive).
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Maximum numeric value (inclusive).
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Restricts a string field to a fixed set of values.
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Requires a string field to match the given regex pattern.
    ///
    /// An invalid pattern is logged and the constraint is skipped during
    /// validation.
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(FieldPattern::new(pattern));
        self
    }

    /// Supplies a fixed default, applied when the field is absent.
    pub fn default_value<T: Into<Value>>(mut self, value: T) -> Self {
        self.default = Some(DefaultValue::Static(value.into()));
        self
    }

    /// Supplies a computed default, evaluated when the field is absent.
    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Computed(Arc::new(producer)));
        self
    }

    /// Trims surrounding whitespace from string values before validation.
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Lowercases string values before validation.
    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn requirement(&self) -> &Requirement {
        &self.required
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub(crate) fn min_length_bound(&self) -> Option<usize> {
        self.min_length
    }

    pub(crate) fn max_length_bound(&self) -> Option<usize> {
        self.max_length
    }

    pub(crate) fn min_bound(&self) -> Option<f64> {
        self.min
    }

    pub(crate) fn max_bound(&self) -> Option<f64> {
        self.max
    }

    pub(crate) fn allowed_values(&self) -> Option<&BTreeSet<String>> {
        self.enum_values.as_ref()
    }

    pub(crate) fn pattern_constraint(&self) -> Option<&FieldPattern> {
        self.pattern.as_ref()
    }

    pub(crate) fn trims(&self) -> bool {
        self.trim
    }

    pub(crate) fn lowercases(&self) -> bool {
        self.lowercase
    }
}

impl Debug for FieldDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}
