use thiserror::Error;

use super::kind::DefinitionKind;
use super::syntax::SyntaxError;

/// Failure taxonomy for parsing and generation.
///
/// Every variant is a deterministic function of the input, so nothing is
/// retried; failures are raised at the point of detection and surface
/// unmodified to the caller.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The upstream syntax parser failed to produce a tree.
    #[error("failed to build the IDL syntax tree: {0}")]
    SyntaxParse(#[from] SyntaxError),

    /// The parser ran but its definitions array is absent or empty.
    #[error("syntax tree for `{path}` contains no definitions")]
    EmptyDefinitions { path: String },

    /// A definition node's kind has no registered leaf parser. This is a
    /// configuration gap, not a property of the input.
    #[error("no leaf parser is registered for definition kind `{0}`")]
    UnknownLeafKind(String),

    /// A name the dispatcher was asked to generate is absent from every
    /// kind. Fatal for the request; independent lookups in a batch are
    /// unaffected.
    #[error("`{0}` was not found under any definition kind")]
    UnknownDefinition(String),

    /// A kind has no registered leaf generator. Configuration gap.
    #[error("no leaf generator is registered for definition kind `{0}`")]
    MissingGenerator(DefinitionKind),

    /// A definition node is structurally invalid for its kind.
    #[error("malformed {kind} definition: {reason}")]
    MalformedDefinition {
        kind: DefinitionKind,
        reason: String,
    },
}
