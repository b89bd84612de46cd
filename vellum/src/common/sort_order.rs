/// Specifies the direction for sorting documents.
///
/// # Purpose
/// Defines whether documents should be sorted in ascending (low to high) or
/// descending (high to low) order. Used in query specs to control result
/// ordering.
///
/// # Usage
/// Used with `sort_by()` when building a query:
/// ```text
/// let spec = collection.query()
///     .sort_by("price", SortOrder::Descending)
///     .compile();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest, A-Z, oldest to newest)
    Ascending,
    /// Sort in descending order (largest to smallest, Z-A, newest to oldest)
    Descending,
}
