//! Transformation options

/// Options controlling how the [`Transformer`](super::Transformer) degrades on bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformerConfig {
    /// Produce a generic placeholder for foreign types without a factory
    /// (false = fail with `TransformError::UnmappedType`)
    pub allow_generic_node: bool,
    /// Replace the subtree of a failing factory with an error node
    /// (false = propagate the factory's error)
    pub contain_factory_failures: bool,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            allow_generic_node: true,
            contain_factory_failures: true,
        }
    }
}

impl TransformerConfig {
    /// Fail fast on unmapped types and failing factories.
    pub fn strict() -> Self {
        Self {
            allow_generic_node: false,
            contain_factory_failures: false,
        }
    }

    pub fn with_allow_generic_node(mut self, allow: bool) -> Self {
        self.allow_generic_node = allow;
        self
    }

    pub fn with_contain_factory_failures(mut self, contain: bool) -> Self {
        self.contain_factory_failures = contain;
        self
    }
}
