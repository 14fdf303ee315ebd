// 🗂️ Validator Registry - Catalog of validator kinds
// Maps a kind tag ("positive_integer", ...) to a constructor for a fresh
// unbound validator. Populated with the built-ins at startup, queried by
// name when schemas are declared from configuration or user input.

use crate::validators::{
    boolean, float, integer, list, non_empty_string, positive_float, positive_integer, string,
    FieldValidator,
};
use std::collections::HashMap;

type Constructor = Box<dyn Fn() -> FieldValidator + Send + Sync>;

pub struct ValidatorRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ValidatorRegistry {
    /// Create a registry with all built-in validator kinds registered.
    pub fn new() -> Self {
        let mut registry = ValidatorRegistry {
            constructors: HashMap::new(),
        };
        registry.register("integer", integer);
        registry.register("float", float);
        registry.register("boolean", boolean);
        registry.register("string", string);
        registry.register("list", list);
        registry.register("positive_integer", positive_integer);
        registry.register("positive_float", positive_float);
        registry.register("non_empty_string", non_empty_string);
        registry
    }

    /// Register a validator kind under a tag. Re-registering a tag replaces
    /// the previous constructor.
    pub fn register(
        &mut self,
        tag: &str,
        constructor: impl Fn() -> FieldValidator + Send + Sync + 'static,
    ) {
        self.constructors
            .insert(tag.to_string(), Box::new(constructor));
    }

    /// Build a fresh unbound validator for a tag.
    pub fn get(&self, tag: &str) -> Option<FieldValidator> {
        self.constructors.get(tag).map(|constructor| constructor())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// All registered tags.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.constructors.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn count(&self) -> usize {
        self.constructors.len()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
