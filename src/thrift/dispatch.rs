//! Generation dispatch: name -> kind -> leaf generator.

use std::collections::HashMap;

use serde_json::Value;

use super::error::SchemaError;
use super::kind::DefinitionKind;
use super::store::DefinitionStore;

/// A per-kind renderer producing the final JSON for one definition.
///
/// The dispatcher passes itself as `gen` so an implementation can resolve
/// any nested reference by name.
pub trait LeafGenerator {
    fn generate(
        &self,
        name: &str,
        definition: &Value,
        gen: &Dispatcher<'_>,
    ) -> Result<Value, SchemaError>;
}

/// Mapping from definition kind to its leaf generator.
///
/// [`standard`](Self::standard) covers every kind; a custom registry may
/// leave kinds out, which is exactly the gap [`SchemaError::MissingGenerator`]
/// reports.
pub struct GeneratorRegistry {
    generators: HashMap<DefinitionKind, Box<dyn LeafGenerator>>,
}

impl GeneratorRegistry {
    pub fn empty() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// The standard generator set shipped with this crate.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for kind in DefinitionKind::ALL {
            let generator: Box<dyn LeafGenerator> = match kind {
                DefinitionKind::Typedef => Box::new(crate::generator::TypedefGenerator),
                DefinitionKind::Struct | DefinitionKind::Union | DefinitionKind::Exception => {
                    Box::new(crate::generator::StructGenerator)
                }
                DefinitionKind::Enum => Box::new(crate::generator::EnumGenerator),
                DefinitionKind::Service => Box::new(crate::generator::ServiceGenerator),
                DefinitionKind::Const => Box::new(crate::generator::ConstGenerator),
            };
            registry.register(kind, generator);
        }
        registry
    }

    pub fn register(&mut self, kind: DefinitionKind, generator: Box<dyn LeafGenerator>) {
        self.generators.insert(kind, generator);
    }

    pub fn get(&self, kind: DefinitionKind) -> Option<&dyn LeafGenerator> {
        self.generators.get(&kind).map(Box::as_ref)
    }
}

/// Looks up a name's kind in the store and invokes the matching leaf
/// generator.
///
/// Results are deterministic but never memoized: every call re-runs the
/// full generation, nested lookups included. Callers may rely on an
/// idempotent result, not on an idempotent cost.
pub struct Dispatcher<'a> {
    store: &'a DefinitionStore,
    registry: &'a GeneratorRegistry,
}

impl<'a> Dispatcher<'a> {
    pub fn new(store: &'a DefinitionStore, registry: &'a GeneratorRegistry) -> Self {
        Self { store, registry }
    }

    pub fn store(&self) -> &DefinitionStore {
        self.store
    }

    pub fn generate(&self, name: &str) -> Result<Value, SchemaError> {
        let kind = self
            .store
            .find_kind(name)
            .ok_or_else(|| SchemaError::UnknownDefinition(name.to_owned()))?;
        let generator = self
            .registry
            .get(kind)
            .ok_or(SchemaError::MissingGenerator(kind))?;
        let definition = self
            .store
            .get(kind, name)
            .expect("find_kind only returns kinds whose table contains the name");
        generator.generate(name, definition, self)
    }
}
