use std::fmt::Display;

use regex::Regex;

use crate::common::{Record, Value, DOC_ID};
use crate::document::DocumentId;
use crate::errors::VellumResult;

/// A comparison operator for [FilterExpr::Cmp].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CmpOp {
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Not equal
    Ne,
}

impl CmpOp {
    fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
            CmpOp::Ne => "!=",
        }
    }
}

/// A composable predicate tree used to select documents.
///
/// `FilterExpr` is a closed grammar: every operator a store must understand
/// is one of these variants, so stores can match exhaustively and the serde
/// representation doubles as the wire form of a compiled filter.
///
/// # Filter Composition
///
/// Filters compose with logical operators:
/// - [`FilterExpr::and`] - combines with another filter using logical AND
/// - [`FilterExpr::or`] - combines with another filter using logical OR
///
/// # Semantics
///
/// - `Eq` and `Cmp(Ne)` compare against the field value, where an absent
///   field reads as [Value::Null]
/// - Ordering comparisons only match when both sides belong to the same
///   comparison class (numbers with numbers, strings with strings, dates
///   with dates); otherwise the document does not match
/// - `Regex` matches string fields against the pattern; non-string and
///   absent fields do not match
/// - An empty `And` matches every document; an empty `Or` matches none.
///   This is part of the contract, not an artifact of the evaluation loop
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterExpr {
    /// Matches documents where the field equals the value.
    Eq(String, Value),
    /// Matches documents where the field compares against the value.
    Cmp(String, CmpOp, Value),
    /// Matches documents where the field value is a member of the list.
    In(String, Vec<Value>),
    /// Matches documents where the field value is not a member of the list.
    NotIn(String, Vec<Value>),
    /// Matches documents where the string field matches the pattern.
    Regex {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },
    /// Matches documents satisfying every inner filter.
    And(Vec<FilterExpr>),
    /// Matches documents satisfying at least one inner filter.
    Or(Vec<FilterExpr>),
}

impl FilterExpr {
    /// Combines this filter with another using logical AND.
    ///
    /// An existing conjunction is extended in place rather than nested.
    pub fn and(self, other: FilterExpr) -> FilterExpr {
        match self {
            FilterExpr::And(mut filters) => {
                filters.push(other);
                FilterExpr::And(filters)
            }
            existing => FilterExpr::And(vec![existing, other]),
        }
    }

    /// Combines this filter with another using logical OR.
    pub fn or(self, other: FilterExpr) -> FilterExpr {
        match self {
            FilterExpr::Or(mut filters) => {
                filters.push(other);
                FilterExpr::Or(filters)
            }
            existing => FilterExpr::Or(vec![existing, other]),
        }
    }

    /// Applies the filter to a record and returns whether it matches.
    ///
    /// This is the local evaluation used by the in-memory store; remote
    /// stores receive the expression tree itself and evaluate it backend
    /// side.
    ///
    /// # Errors
    ///
    /// Returns a `FilterError` when a regex pattern cannot be compiled.
    pub fn matches(&self, record: &Record) -> VellumResult<bool> {
        match self {
            FilterExpr::Eq(field, value) => Ok(record.get(field) == *value),

            FilterExpr::Cmp(field, CmpOp::Ne, value) => Ok(record.get(field) != *value),

            FilterExpr::Cmp(field, op, value) => {
                let actual = record.get(field);
                if !actual.comparable_with(value) {
                    return Ok(false);
                }
                let ordering = actual.cmp(value);
                Ok(match op {
                    CmpOp::Gt => ordering.is_gt(),
                    CmpOp::Gte => ordering.is_ge(),
                    CmpOp::Lt => ordering.is_lt(),
                    CmpOp::Lte => ordering.is_le(),
                    CmpOp::Ne => unreachable!("handled above"),
                })
            }

            FilterExpr::In(field, values) => Ok(values.contains(&record.get(field))),

            FilterExpr::NotIn(field, values) => Ok(!values.contains(&record.get(field))),

            FilterExpr::Regex {
                field,
                pattern,
                case_insensitive,
            } => {
                let value = record.get(field);
                let Some(text) = value.as_string() else {
                    return Ok(false);
                };
                let full_pattern = if *case_insensitive {
                    format!("(?i){}", pattern)
                } else {
                    pattern.clone()
                };
                let regex = Regex::new(&full_pattern).map_err(|err| {
                    log::error!("Invalid regex pattern '{}': {}", pattern, err);
                    crate::errors::VellumError::from(err)
                })?;
                Ok(regex.is_match(&text))
            }

            // an empty conjunction matches everything
            FilterExpr::And(filters) => {
                for filter in filters {
                    if !filter.matches(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }

            // an empty disjunction matches nothing
            FilterExpr::Or(filters) => {
                for filter in filters {
                    if filter.matches(record)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Collects every field name referenced by the expression tree.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterExpr::Eq(field, _)
            | FilterExpr::Cmp(field, _, _)
            | FilterExpr::In(field, _)
            | FilterExpr::NotIn(field, _)
            | FilterExpr::Regex { field, .. } => out.push(field),
            FilterExpr::And(filters) | FilterExpr::Or(filters) => {
                for filter in filters {
                    filter.collect_fields(out);
                }
            }
        }
    }
}

impl Display for FilterExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterExpr::Eq(field, value) => write!(f, "({} == {})", field, value),
            FilterExpr::Cmp(field, op, value) => {
                write!(f, "({} {} {})", field, op.symbol(), value)
            }
            FilterExpr::In(field, values) => {
                write!(f, "({} in {})", field, Value::Array(values.clone()))
            }
            FilterExpr::NotIn(field, values) => {
                write!(f, "({} not in {})", field, Value::Array(values.clone()))
            }
            FilterExpr::Regex {
                field,
                pattern,
                case_insensitive,
            } => {
                if *case_insensitive {
                    write!(f, "({} =~ /{}/i)", field, pattern)
                } else {
                    write!(f, "({} =~ /{}/)", field, pattern)
                }
            }
            FilterExpr::And(filters) => {
                if filters.is_empty() {
                    return write!(f, "(all)");
                }
                let joined = filters
                    .iter()
                    .map(|filter| filter.to_string())
                    .collect::<Vec<_>>()
                    .join(" && ");
                write!(f, "({})", joined)
            }
            FilterExpr::Or(filters) => {
                if filters.is_empty() {
                    return write!(f, "(none)");
                }
                let joined = filters
                    .iter()
                    .map(|filter| filter.to_string())
                    .collect::<Vec<_>>()
                    .join(" || ");
                write!(f, "({})", joined)
            }
        }
    }
}

/// Creates a filter that matches all documents.
pub fn match_all() -> FilterExpr {
    FilterExpr::And(Vec::new())
}

/// Creates a filter that matches a document by its identity.
///
/// # Arguments
///
/// * `id` - The [DocumentId] to match
pub fn by_id(id: &DocumentId) -> FilterExpr {
    FilterExpr::Eq(DOC_ID.to_string(), Value::Id(id.clone()))
}

/// Combines multiple filters using logical AND.
///
/// An empty list produces the match-all filter.
pub fn and(filters: Vec<FilterExpr>) -> FilterExpr {
    FilterExpr::And(filters)
}

/// Combines multiple filters using logical OR.
///
/// An empty list produces the match-none filter.
pub fn or(filters: Vec<FilterExpr>) -> FilterExpr {
    FilterExpr::Or(filters)
}
