use std::collections::BTreeSet;

use crate::common::{SortOrder, DOC_ID};
use crate::errors::{ErrorKind, VellumError, VellumResult};
use crate::filter::FilterExpr;
use crate::query::QuerySpec;
use crate::schema::Schema;

/// A fluent accumulator of query clauses, compiled into a [QuerySpec].
///
/// # Purpose
/// Builds a query incrementally: filters, sort keys, a projection, and a
/// pagination window, in any order. The builder is bound to a [Schema] so it
/// can flag references to undeclared fields early (as warnings; stores may
/// hold fields the schema does not describe).
///
/// # Composition rules
/// - [`QueryBuilder::filter`] merges with any previously added filter via an
///   implicit AND
/// - [`QueryBuilder::sort_by`] appends a tie-break key; earlier keys are
///   never replaced
/// - [`QueryBuilder::select`] sets the projection; calling it again replaces
///   the previous projection entirely
/// - [`QueryBuilder::paginate`] converts a 1-based page number and page size
///   into skip/limit
///
/// # Examples
///
/// ```ignore
/// let spec = collection
///     .query()
///     .filter(field("author").eq("marcus"))
///     .filter(field("is_published").eq(true))
///     .sort_by("price", SortOrder::Descending)
///     .select(["name", "price"])
///     .paginate(2, 10)?
///     .compile();
/// assert_eq!(spec.skip(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    schema: Schema,
    filter: Option<FilterExpr>,
    sort: Vec<(String, SortOrder)>,
    projection: Option<BTreeSet<String>>,
    skip: u64,
    limit: Option<u64>,
}

impl QueryBuilder {
    /// Creates a builder bound to the given schema.
    pub fn new(schema: Schema) -> Self {
        QueryBuilder {
            schema,
            filter: None,
            sort: Vec::new(),
            projection: None,
            skip: 0,
            limit: None,
        }
    }

    /// Adds a filter, merging with any existing filter via an implicit AND.
    pub fn filter(mut self, expr: FilterExpr) -> Self {
        for name in expr.referenced_fields() {
            self.warn_unknown_field(name);
        }
        self.filter = Some(match self.filter.take() {
            None => expr,
            Some(existing) => existing.and(expr),
        });
        self
    }

    /// Appends a sort key. Later calls add tie-break keys; they do not
    /// replace earlier ones.
    pub fn sort_by(mut self, field_name: &str, order: SortOrder) -> Self {
        self.warn_unknown_field(field_name);
        self.sort.push((field_name.to_string(), order));
        self
    }

    /// Sets the projection to the given field set. Calling this twice
    /// replaces the projection; the last call wins.
    pub fn select<I, S>(mut self, field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let projection: BTreeSet<String> = field_names.into_iter().map(Into::into).collect();
        for name in &projection {
            self.warn_unknown_field(name);
        }
        self.projection = Some(projection);
        self
    }

    /// Sets the pagination window from a 1-based page number and a page
    /// size: `skip = (page - 1) * size`, `limit = size`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPagination` when `page` or `size` is zero.
    pub fn paginate(mut self, page: u64, size: u64) -> VellumResult<Self> {
        if page == 0 || size == 0 {
            log::error!("Invalid pagination: page {} size {}", page, size);
            return Err(VellumError::new(
                &format!("Invalid pagination: page {} size {}", page, size),
                ErrorKind::InvalidPagination,
            ));
        }
        self.skip = (page - 1) * size;
        self.limit = Some(size);
        Ok(self)
    }

    /// Compiles the accumulated state into an immutable [QuerySpec].
    ///
    /// Compilation is a pure function of the builder state: calling it
    /// repeatedly yields structurally equal specs. No accumulated filter
    /// compiles to the match-all conjunction.
    ///
    /// Paginating an unordered result set is flagged (the page boundaries
    /// are not deterministic without a sort) but still compiles.
    pub fn compile(&self) -> QuerySpec {
        if (self.skip > 0 || self.limit.is_some()) && self.sort.is_empty() {
            log::warn!("Paginating an unsorted query; page boundaries are not deterministic");
        }

        QuerySpec {
            filter: self.filter.clone().unwrap_or(FilterExpr::And(Vec::new())),
            sort: self.sort.clone(),
            projection: self.projection.clone(),
            skip: self.skip,
            limit: self.limit,
        }
    }

    fn warn_unknown_field(&self, field_name: &str) {
        if field_name != DOC_ID && self.schema.field(field_name).is_none() {
            log::warn!("Query references undeclared field '{}'", field_name);
        }
    }
}
