use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for Vellum operations
///
/// This enum represents all possible error types that can occur while mapping
/// documents onto a store. Each kind describes a specific category of failure,
/// enabling precise error handling.
///
/// # Examples
///
/// ```rust,ignore
/// use vellum::errors::{VellumError, ErrorKind, VellumResult};
///
/// fn example() -> VellumResult<()> {
///     Err(VellumError::new("document not found", ErrorKind::NotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A document failed schema validation; the violation list travels with the error
    ValidationFailed,
    /// The requested document was not found
    NotFound,
    /// A pagination request was ill-formed (page or page size of zero)
    InvalidPagination,
    /// Error during filter construction or evaluation
    FilterError,
    /// Invalid field name (empty, reserved, or duplicated in a schema)
    InvalidFieldName,
    /// The operation is not valid in the current document lifecycle state
    InvalidOperation,
    /// The backing store reported a failure
    StoreError,
    /// The backing store could not be reached (timeouts included)
    StoreUnavailable,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ValidationFailed => write!(f, "Validation failed"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::InvalidPagination => write!(f, "Invalid pagination"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::StoreError => write!(f, "Store error"),
            ErrorKind::StoreUnavailable => write!(f, "Store unavailable"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// The category of a single schema-constraint violation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ViolationKind {
    /// A required field is absent or null
    MissingRequiredField,
    /// The value does not match the declared field kind
    TypeMismatch,
    /// A string value is shorter or longer than the declared bounds
    LengthOutOfRange,
    /// A numeric value falls outside the declared bounds
    ValueOutOfRange,
    /// A value is not a member of the declared enumeration
    InvalidEnumValue,
    /// A string value does not match the declared pattern
    PatternMismatch,
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationKind::MissingRequiredField => write!(f, "missing required field"),
            ViolationKind::TypeMismatch => write!(f, "type mismatch"),
            ViolationKind::LengthOutOfRange => write!(f, "length out of range"),
            ViolationKind::ValueOutOfRange => write!(f, "value out of range"),
            ViolationKind::InvalidEnumValue => write!(f, "invalid enum value"),
            ViolationKind::PatternMismatch => write!(f, "pattern mismatch"),
        }
    }
}

/// One schema-constraint violation found while validating a document.
///
/// Validation is total: a validation run reports every violation it finds, so
/// callers (and tests) can assert on the complete set rather than only the
/// first failure.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ValidationIssue {
    field: String,
    kind: ViolationKind,
    message: String,
}

impl ValidationIssue {
    /// Creates a new validation issue for the given field.
    ///
    /// # Arguments
    ///
    /// * `field` - The name of the offending field
    /// * `kind` - The violation category
    /// * `message` - A human-readable description
    pub fn new(field: &str, kind: ViolationKind, message: &str) -> Self {
        ValidationIssue {
            field: field.to_string(),
            kind,
            message: message.to_string(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> &ViolationKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.kind, self.message)
    }
}

/// Custom Vellum error type.
///
/// `VellumError` encapsulates error information including the error message,
/// kind, and optional cause. It supports error chaining and backtraces for
/// debugging. A `ValidationFailed` error additionally carries the full list
/// of [ValidationIssue]s, readable through [`VellumError::violations`].
///
/// # Examples
///
/// ```rust,ignore
/// use vellum::errors::{VellumError, ErrorKind};
///
/// // Create a simple error
/// let err = VellumError::new("store unreachable", ErrorKind::StoreUnavailable);
///
/// // Create an error with a cause
/// let cause = VellumError::new("connection reset", ErrorKind::StoreError);
/// let err = VellumError::new_with_cause("insert failed", ErrorKind::StoreError, cause);
/// ```
///
/// # Type alias
///
/// The `VellumResult<T>` type alias is equivalent to `Result<T, VellumError>`
/// and is used throughout the codebase for operations that can fail.
#[derive(Clone)]
pub struct VellumError {
    message: String,
    error_kind: ErrorKind,
    violations: Vec<ValidationIssue>,
    cause: Option<Box<VellumError>>,
    backtrace: Atomic<Backtrace>,
}

impl VellumError {
    /// Creates a new `VellumError` with the specified message and error kind.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    ///
    /// # Returns
    ///
    /// A new `VellumError` instance.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        VellumError {
            message: message.to_string(),
            error_kind,
            violations: Vec::new(),
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `VellumError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    /// * `cause` - The underlying error that caused this error
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: VellumError) -> Self {
        VellumError {
            message: message.to_string(),
            error_kind,
            violations: Vec::new(),
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a `ValidationFailed` error carrying the collected violations.
    ///
    /// # Arguments
    ///
    /// * `violations` - Every violation found by the validation pass
    pub fn validation_failed(violations: Vec<ValidationIssue>) -> Self {
        VellumError {
            message: format!(
                "document validation failed with {} violation(s)",
                violations.len()
            ),
            error_kind: ErrorKind::ValidationFailed,
            violations,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    /// The violations attached to a `ValidationFailed` error.
    ///
    /// Empty for every other error kind.
    pub fn violations(&self) -> &[ValidationIssue] {
        &self.violations
    }

    pub fn cause(&self) -> Option<&VellumError> {
        self.cause.as_deref()
    }
}

impl Display for VellumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for VellumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for VellumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Vellum operations.
///
/// `VellumResult<T>` is shorthand for `Result<T, VellumError>`.
/// All fallible Vellum operations return this type.
pub type VellumResult<T> = Result<T, VellumError>;

// From trait implementations for automatic error conversion
impl From<regex::Error> for VellumError {
    fn from(err: regex::Error) -> Self {
        VellumError::new(
            &format!("Invalid regex pattern: {}", err),
            ErrorKind::FilterError,
        )
    }
}

impl From<String> for VellumError {
    fn from(msg: String) -> Self {
        VellumError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for VellumError {
    fn from(msg: &str) -> Self {
        VellumError::new(msg, ErrorKind::InternalError)
    }
}
