use super::traits::PriceSource;

/// Registry of all available price sources.
///
/// Sources are tried in registration order: if the first fails, the next
/// one answers. New sources can be added without modifying existing code.
pub struct PriceSourceRegistry {
    sources: Vec<Box<dyn PriceSource>>,
}

impl PriceSourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register a new price source. Registration order is fallback order.
    pub fn register(&mut self, source: Box<dyn PriceSource>) {
        self.sources.push(source);
    }

    /// All registered sources, in fallback order.
    pub fn sources(&self) -> &[Box<dyn PriceSource>] {
        &self.sources
    }

    /// Names of the registered sources, in fallback order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for PriceSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
