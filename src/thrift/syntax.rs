//! Seam to the external IDL frontend.
//!
//! Tokenizing and parsing raw IDL text is not this crate's job; it consumes
//! the frontend's output as a JSON syntax tree keyed by entry-point file
//! path (the format thriftrw-style tools dump). [`SyntaxParser`] is the
//! plug-in point for a different frontend; [`JsonAstParser`] is the standard
//! implementation reading such a dump from disk or from memory.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A parsed syntax tree, keyed by entry-point file path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxTree {
    pub entry_point: String,
    pub asts: Map<String, Value>,
}

impl SyntaxTree {
    /// The definitions array of the entry-point AST, if present.
    pub fn definitions(&self) -> Option<&Vec<Value>> {
        self.asts
            .get(&self.entry_point)?
            .get("definitions")?
            .as_array()
    }
}

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("could not read the syntax tree source: {0}")]
    Io(#[from] std::io::Error),
    #[error("the syntax tree is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An external frontend producing a [`SyntaxTree`] for an entry-point path.
pub trait SyntaxParser {
    fn parse(&self, path: &Path) -> Result<SyntaxTree, SyntaxError>;
}

/// Standard frontend: loads a JSON AST dump.
///
/// Accepts either the full `{"entryPoint": ..., "asts": {...}}` document or
/// a bare `{"definitions": [...]}` AST, which gets keyed under the given
/// origin path.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonAstParser;

impl JsonAstParser {
    /// Parses an in-memory JSON dump; `origin` names the source for the
    /// entry-point key and for error messages.
    pub fn parse_str(&self, source: &str, origin: &str) -> Result<SyntaxTree, SyntaxError> {
        let document: Value = serde_json::from_str(source)?;
        if document.get("asts").is_some() {
            Ok(serde_json::from_value(document)?)
        } else {
            let mut asts = Map::new();
            asts.insert(origin.to_owned(), document);
            Ok(SyntaxTree {
                entry_point: origin.to_owned(),
                asts,
            })
        }
    }
}

impl SyntaxParser for JsonAstParser {
    fn parse(&self, path: &Path) -> Result<SyntaxTree, SyntaxError> {
        let source = fs::read_to_string(path)?;
        self.parse_str(&source, &path.display().to_string())
    }
}
