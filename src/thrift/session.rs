//! Per-parse session state and the top-level orchestrator.

use std::path::Path;

use serde_json::{Map, Value};

use crate::parser::ParserRegistry;

use super::dispatch::{Dispatcher, GeneratorRegistry};
use super::error::SchemaError;
use super::kind::DefinitionKind;
use super::resolver::resolve_def_union;
use super::store::DefinitionStore;
use super::syntax::{JsonAstParser, SyntaxParser, SyntaxTree};

/// The intermediate snapshots a session records while it runs. They exist
/// for diagnostics and tests, not for further processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The raw definitions array produced by the external parser.
    SyntaxTree,
    /// The store right after per-kind leaf parsing.
    Categorized,
    /// The store after the def/union resolver ran.
    Resolved,
}

/// Per-parse state: the definition store plus diagnostic snapshots.
///
/// One session is created per parse call and discarded with it; no state
/// outlives the session or is shared across sessions.
#[derive(Debug, Default)]
pub struct Session {
    store: DefinitionStore,
    snapshots: [Option<Value>; 3],
}

impl Session {
    fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &DefinitionStore {
        &self.store
    }

    pub fn snapshot(&self, step: Step) -> Option<&Value> {
        self.snapshots[step as usize].as_ref()
    }

    fn record(&mut self, step: Step, value: Value) {
        self.snapshots[step as usize] = Some(value);
    }
}

/// Top-level orchestrator: drives parse -> categorize -> resolve ->
/// dispatch-and-collect over one session per call.
pub struct ThriftTool {
    syntax: Box<dyn SyntaxParser>,
    parsers: ParserRegistry,
    generators: GeneratorRegistry,
}

impl ThriftTool {
    /// A tool with the standard capability set: the JSON AST frontend and
    /// the leaf parsers/generators shipped with this crate.
    pub fn new() -> Self {
        Self {
            syntax: Box::new(JsonAstParser),
            parsers: ParserRegistry::standard(),
            generators: GeneratorRegistry::standard(),
        }
    }

    /// A tool with caller-supplied capabilities.
    pub fn with_capabilities(
        syntax: Box<dyn SyntaxParser>,
        parsers: ParserRegistry,
        generators: GeneratorRegistry,
    ) -> Self {
        Self {
            syntax,
            parsers,
            generators,
        }
    }

    /// Parses `path` and generates either the named definition or, without
    /// a name, the complete kind -> name -> JSON mapping (every kind gets an
    /// entry, empty kinds map to an empty object).
    pub fn parse(&self, path: &Path, name: Option<&str>) -> Result<Value, SchemaError> {
        self.parse_session(path, name).map(|(value, _)| value)
    }

    /// Like [`parse`](Self::parse), additionally returning the [`Session`]
    /// for inspection of the store and the intermediate snapshots.
    pub fn parse_session(
        &self,
        path: &Path,
        name: Option<&str>,
    ) -> Result<(Value, Session), SchemaError> {
        let tree = self.syntax.parse(path)?;
        self.parse_tree(&tree, name)
    }

    /// Runs the pipeline over an already-built syntax tree.
    pub fn parse_tree(
        &self,
        tree: &SyntaxTree,
        name: Option<&str>,
    ) -> Result<(Value, Session), SchemaError> {
        let definitions = tree
            .definitions()
            .filter(|definitions| !definitions.is_empty())
            .ok_or_else(|| SchemaError::EmptyDefinitions {
                path: tree.entry_point.clone(),
            })?;

        let mut session = Session::new();
        session.record(Step::SyntaxTree, Value::Array(definitions.clone()));

        self.categorize(&mut session.store, definitions)?;
        session.record(Step::Categorized, session.store.to_value());

        resolve_def_union(&mut session.store, &self.generators)?;
        session.record(Step::Resolved, session.store.to_value());

        let dispatcher = Dispatcher::new(&session.store, &self.generators);
        let result = match name {
            Some(name) => dispatcher.generate(name)?,
            None => {
                let mut all = Map::new();
                for kind in DefinitionKind::ALL {
                    let mut generated = Map::new();
                    for definition_name in session.store.table(kind).keys() {
                        generated.insert(
                            definition_name.clone(),
                            dispatcher.generate(definition_name)?,
                        );
                    }
                    all.insert(kind.keyword().to_owned(), Value::Object(generated));
                }
                Value::Object(all)
            }
        };

        Ok((result, session))
    }

    fn categorize(
        &self,
        store: &mut DefinitionStore,
        definitions: &[Value],
    ) -> Result<(), SchemaError> {
        for node in definitions {
            let raw_kind = node.get("type").and_then(Value::as_str).unwrap_or_default();
            let kind = DefinitionKind::from_keyword(raw_kind)
                .ok_or_else(|| SchemaError::UnknownLeafKind(raw_kind.to_owned()))?;
            let parser = self
                .parsers
                .get(kind)
                .ok_or_else(|| SchemaError::UnknownLeafKind(kind.keyword().to_owned()))?;
            let fragment = parser.parse(node)?;
            store.merge(kind, fragment);
        }
        Ok(())
    }
}

impl Default for ThriftTool {
    fn default() -> Self {
        Self::new()
    }
}
