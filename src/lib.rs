//! Resolves Thrift-style IDL syntax trees into self-contained JSON schemas.
//!
//! The input is a parsed syntax tree (a thriftrw-style JSON AST dump; raw
//! IDL parsing is an external concern, see [`thrift::syntax`]). Definitions
//! are categorized into a per-kind store, typedef and union references are
//! inlined by the def/union resolver, and each definition is rendered to
//! JSON by a per-kind leaf generator. References to structs, exceptions,
//! enums, services, and consts stay live `identifier` descriptors.
//!
//! ```no_run
//! use std::path::Path;
//! use thrift_schema::ThriftTool;
//!
//! let tool = ThriftTool::new();
//! let user = tool.parse(Path::new("user.ast.json"), Some("User"))?;
//! println!("{user}");
//! # Ok::<(), thrift_schema::SchemaError>(())
//! ```

pub mod generator;
pub mod parser;
pub mod thrift;

pub use parser::{LeafParser, ParserRegistry};
pub use thrift::{
    DefinitionKind, DefinitionStore, Dispatcher, GeneratorRegistry, JsonAstParser, LeafGenerator,
    SchemaError, Session, Step, SyntaxError, SyntaxParser, SyntaxTree, ThriftTool, TypeDescriptor,
};

use serde_json::Value;

/// One-shot convenience: runs the standard pipeline over an already-built
/// syntax tree and returns either the named definition or the full
/// kind -> name -> JSON mapping.
pub fn read_definitions(tree: &SyntaxTree, name: Option<&str>) -> Result<Value, SchemaError> {
    ThriftTool::new()
        .parse_tree(tree, name)
        .map(|(value, _)| value)
}
