/// Configuration for a [`crate::mapper::DocumentMapper`].
///
/// The configuration travels with every collection the mapper hands out.
/// It supports method chaining for convenient construction:
///
/// ```ignore
/// let config = MapperConfig::new().default_limit(500);
/// let mapper = DocumentMapper::with_config(store, config);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapperConfig {
    pub(crate) default_limit: Option<u64>,
}

impl MapperConfig {
    /// Creates a configuration with default settings: no read bound.
    pub fn new() -> MapperConfig {
        MapperConfig {
            default_limit: None,
        }
    }

    /// Bounds unbounded reads.
    ///
    /// A query spec that carries no explicit limit is capped to this many
    /// rows when executed. Explicit limits always win. This keeps a read
    /// over a large collection from materializing it wholesale.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of rows an unbounded read may return
    pub fn default_limit(mut self, limit: u64) -> MapperConfig {
        self.default_limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_limit() {
        let config = MapperConfig::new();
        assert_eq!(config.default_limit, None);
    }

    #[test]
    fn test_default_limit() {
        let config = MapperConfig::new().default_limit(500);
        assert_eq!(config.default_limit, Some(500));
    }

    #[test]
    fn test_default_trait_matches_new() {
        assert_eq!(MapperConfig::default().default_limit, MapperConfig::new().default_limit);
    }
}
