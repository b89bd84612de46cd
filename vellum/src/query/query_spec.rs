use std::collections::BTreeSet;

use crate::common::SortOrder;
use crate::filter::FilterExpr;

/// An immutable, compiled query, ready to be sent to a document store.
///
/// A spec bundles everything a store needs to answer a read: the filter
/// tree, the ordered list of sort keys, an optional projection, and the
/// pagination window. `skip` and `limit` apply after `sort` is conceptually
/// applied; the projection never removes the identity field.
///
/// Specs compare structurally, so compiling the same builder state twice
/// yields equal specs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuerySpec {
    pub(crate) filter: FilterExpr,
    pub(crate) sort: Vec<(String, SortOrder)>,
    pub(crate) projection: Option<BTreeSet<String>>,
    pub(crate) skip: u64,
    pub(crate) limit: Option<u64>,
}

impl QuerySpec {
    /// The filter tree selecting the documents.
    pub fn filter(&self) -> &FilterExpr {
        &self.filter
    }

    /// The sort keys, in tie-break order.
    pub fn sort(&self) -> &[(String, SortOrder)] {
        &self.sort
    }

    /// The projected field set, or `None` for whole documents.
    pub fn projection(&self) -> Option<&BTreeSet<String>> {
        self.projection.as_ref()
    }

    /// The number of leading documents to skip.
    pub fn skip(&self) -> u64 {
        self.skip
    }

    /// The maximum number of documents to return, or `None` for unbounded.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::match_all;

    #[test]
    fn test_accessors() {
        let spec = QuerySpec {
            filter: match_all(),
            sort: vec![("price".to_string(), SortOrder::Ascending)],
            projection: None,
            skip: 10,
            limit: Some(5),
        };

        assert_eq!(spec.filter(), &match_all());
        assert_eq!(spec.sort().len(), 1);
        assert!(spec.projection().is_none());
        assert_eq!(spec.skip(), 10);
        assert_eq!(spec.limit(), Some(5));
    }

    #[test]
    fn test_structural_equality() {
        let build = || QuerySpec {
            filter: match_all(),
            sort: vec![("price".to_string(), SortOrder::Descending)],
            projection: Some(["name".to_string()].into_iter().collect()),
            skip: 0,
            limit: None,
        };
        assert_eq!(build(), build());
    }
}
