//! Character registry
//!
//! An explicit, injectable store of character definitions, split into a
//! regular and a micro namespace. Cloning the registry shares the store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{CharacterDefinition, CharacterError, CharacterKind, CharacterProvider};

#[derive(Debug, Default)]
struct Namespaces {
    regular: HashMap<String, CharacterDefinition>,
    micro: HashMap<String, CharacterDefinition>,
}

impl Namespaces {
    fn get(&self, kind: CharacterKind) -> &HashMap<String, CharacterDefinition> {
        match kind {
            CharacterKind::Regular => &self.regular,
            CharacterKind::Micro => &self.micro,
        }
    }

    fn get_mut(&mut self, kind: CharacterKind) -> &mut HashMap<String, CharacterDefinition> {
        match kind {
            CharacterKind::Regular => &mut self.regular,
            CharacterKind::Micro => &mut self.micro,
        }
    }
}

/// Thread-safe registry of character definitions
///
/// # Example
///
/// ```
/// use animator_core::character::{CharacterDefinition, CharacterRegistry, Frame};
///
/// let registry = CharacterRegistry::new();
/// registry
///     .register(
///         CharacterDefinition::new("dot", 1, 1)
///             .with_state("resting", vec![Frame::new(["•"])]),
///     )
///     .unwrap();
/// assert_eq!(registry.names(Default::default()), vec!["dot".to_string()]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CharacterRegistry {
    inner: Arc<RwLock<Namespaces>>,
}

impl CharacterRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a regular character, replacing any previous one with the same name
    ///
    /// # Errors
    ///
    /// Returns the validation error if the definition is malformed.
    pub fn register(&self, definition: CharacterDefinition) -> Result<(), CharacterError> {
        self.register_kind(definition, CharacterKind::Regular)
    }

    /// Register a micro character
    ///
    /// # Errors
    ///
    /// Returns the validation error if the definition is malformed.
    pub fn register_micro(&self, definition: CharacterDefinition) -> Result<(), CharacterError> {
        self.register_kind(definition, CharacterKind::Micro)
    }

    /// Register into an explicit namespace
    ///
    /// # Errors
    ///
    /// Returns the validation error if the definition is malformed.
    pub fn register_kind(
        &self,
        definition: CharacterDefinition,
        kind: CharacterKind,
    ) -> Result<(), CharacterError> {
        definition.validate()?;
        let name = definition.name.clone();
        let states = definition.states.len();
        let replaced = self
            .inner
            .write()
            .get_mut(kind)
            .insert(name.clone(), definition)
            .is_some();
        tracing::info!(
            character = %name,
            kind = %kind,
            states,
            replaced,
            "Character registered"
        );
        Ok(())
    }

    /// Remove a character; returns it if it was registered
    pub fn unregister(&self, name: &str, kind: CharacterKind) -> Option<CharacterDefinition> {
        let removed = self.inner.write().get_mut(kind).remove(name);
        if removed.is_some() {
            tracing::info!(character = %name, kind = %kind, "Character unregistered");
        }
        removed
    }

    /// Whether a character is registered
    #[must_use]
    pub fn contains(&self, name: &str, kind: CharacterKind) -> bool {
        self.inner.read().get(kind).contains_key(name)
    }

    /// Sorted names in a namespace
    #[must_use]
    pub fn names(&self, kind: CharacterKind) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().get(kind).keys().cloned().collect();
        names.sort();
        names
    }

    /// Total number of registered characters across namespaces
    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.read();
        inner.regular.len() + inner.micro.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CharacterProvider for CharacterRegistry {
    fn load(&self, name: &str, kind: CharacterKind) -> Result<CharacterDefinition, CharacterError> {
        self.inner
            .read()
            .get(kind)
            .get(name)
            .cloned()
            .ok_or_else(|| CharacterError::NotFound {
                name: name.to_string(),
                kind,
            })
    }
}
