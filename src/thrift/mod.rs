//! Core symbol-resolution machinery: the categorized definition store, the
//! type and constant-value resolvers, the generation dispatcher, the
//! def/union resolver, and the per-parse session.

pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod kind;
pub mod resolver;
pub mod session;
pub mod store;
pub mod syntax;
pub mod value;

pub use descriptor::TypeDescriptor;
pub use dispatch::{Dispatcher, GeneratorRegistry, LeafGenerator};
pub use error::SchemaError;
pub use kind::DefinitionKind;
pub use resolver::{resolve_def_union, UNION_SEPARATOR};
pub use session::{Session, Step, ThriftTool};
pub use store::DefinitionStore;
pub use syntax::{JsonAstParser, SyntaxError, SyntaxParser, SyntaxTree};
pub use value::{resolve_const, DEFAULT_CONST_PREFIX};
