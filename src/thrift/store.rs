use serde_json::{Map, Value};

use super::kind::DefinitionKind;

/// Categorized definition storage: one ordered table per [`DefinitionKind`].
///
/// A store is created with an empty table for every kind, populated by the
/// per-kind leaf parsers, and then rewritten in place by the def/union
/// resolver. It is owned by exactly one session and never shared.
#[derive(Debug, Clone)]
pub struct DefinitionStore {
    tables: [Map<String, Value>; DefinitionKind::ALL.len()],
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self {
            tables: std::array::from_fn(|_| Map::new()),
        }
    }

    /// The table for one kind. Names are unique within a kind but may
    /// collide across kinds.
    pub fn table(&self, kind: DefinitionKind) -> &Map<String, Value> {
        &self.tables[kind.index()]
    }

    pub fn table_mut(&mut self, kind: DefinitionKind) -> &mut Map<String, Value> {
        &mut self.tables[kind.index()]
    }

    pub fn get(&self, kind: DefinitionKind, name: &str) -> Option<&Value> {
        self.table(kind).get(name)
    }

    pub fn set(&mut self, kind: DefinitionKind, name: impl Into<String>, definition: Value) {
        self.table_mut(kind).insert(name.into(), definition);
    }

    /// Merges a leaf parser's output into a kind's table. Existing entries
    /// under other names are kept; the table is never replaced wholesale.
    pub fn merge(&mut self, kind: DefinitionKind, fragment: Map<String, Value>) {
        self.table_mut(kind).extend(fragment);
    }

    /// Finds the kind a name is declared under, scanning
    /// [`DefinitionKind::ALL`] in order. The first kind that contains the
    /// name wins; later kinds are never consulted once a match is found.
    pub fn find_kind(&self, name: &str) -> Option<DefinitionKind> {
        DefinitionKind::ALL
            .into_iter()
            .find(|kind| self.table(*kind).contains_key(name))
    }

    /// Snapshots the whole store as a JSON object keyed by kind keyword.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        for kind in DefinitionKind::ALL {
            out.insert(
                kind.keyword().to_owned(),
                Value::Object(self.table(kind).clone()),
            );
        }
        Value::Object(out)
    }
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}
