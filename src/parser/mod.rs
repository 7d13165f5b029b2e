//! Standard per-kind leaf parsers.
//!
//! A leaf parser maps one raw definition node into the fragment that gets
//! merged into its kind's store table. The fragment shapes here are what
//! the def/union resolver and the standard generators expect; custom
//! parsers may be registered instead as long as they keep those shapes.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::thrift::descriptor::TypeDescriptor;
use crate::thrift::error::SchemaError;
use crate::thrift::kind::DefinitionKind;
use crate::thrift::value::{resolve_const, DEFAULT_CONST_PREFIX};

/// A per-kind parser producing the store fragment for one definition node.
pub trait LeafParser {
    fn parse(&self, node: &Value) -> Result<Map<String, Value>, SchemaError>;
}

/// Mapping from definition kind to its leaf parser.
pub struct ParserRegistry {
    parsers: HashMap<DefinitionKind, Box<dyn LeafParser>>,
}

impl ParserRegistry {
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// The standard parser set shipped with this crate.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for kind in DefinitionKind::ALL {
            let parser: Box<dyn LeafParser> = match kind {
                DefinitionKind::Typedef => Box::new(TypedefParser),
                DefinitionKind::Struct | DefinitionKind::Union | DefinitionKind::Exception => {
                    Box::new(FieldBlockParser(kind))
                }
                DefinitionKind::Enum => Box::new(EnumParser),
                DefinitionKind::Service => Box::new(ServiceParser),
                DefinitionKind::Const => Box::new(ConstParser),
            };
            registry.register(kind, parser);
        }
        registry
    }

    pub fn register(&mut self, kind: DefinitionKind, parser: Box<dyn LeafParser>) {
        self.parsers.insert(kind, parser);
    }

    pub fn get(&self, kind: DefinitionKind) -> Option<&dyn LeafParser> {
        self.parsers.get(&kind).map(Box::as_ref)
    }
}

fn node_name(node: &Value, kind: DefinitionKind) -> Result<String, SchemaError> {
    node.get("name")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| SchemaError::MalformedDefinition {
            kind,
            reason: "missing `name`".to_owned(),
        })
}

/// Renders a raw type node to descriptor JSON. Unrecognized or absent type
/// nodes become `null` rather than failing.
fn descriptor_value(node: Option<&Value>) -> Value {
    node.and_then(TypeDescriptor::resolve)
        .map(|descriptor| descriptor.to_value())
        .unwrap_or(Value::Null)
}

/// Builds a field object: the descriptor extended with `index`, `required`,
/// and the resolved `default` when the node carries them.
fn field_value(field: &Value) -> Value {
    let mut out = match descriptor_value(field.get("valueType")) {
        Value::Object(descriptor) => descriptor,
        other => return other,
    };
    if let Some(index) = field.get("index") {
        out.insert("index".to_owned(), index.clone());
    }
    if let Some(required) = field.get("required") {
        out.insert("required".to_owned(), required.clone());
    }
    if let Some(default) = field.get("defaultValue") {
        if let Some(value) = resolve_const(default, DEFAULT_CONST_PREFIX) {
            out.insert("default".to_owned(), value);
        }
    }
    Value::Object(out)
}

/// Collects a list of field nodes into a name -> field-object block.
fn field_block(
    fields: Option<&Value>,
    kind: DefinitionKind,
    owner: &str,
) -> Result<Map<String, Value>, SchemaError> {
    let mut block = Map::new();
    let Some(fields) = fields.and_then(Value::as_array) else {
        return Ok(block);
    };
    for field in fields {
        let field_name = field.get("name").and_then(Value::as_str).ok_or_else(|| {
            SchemaError::MalformedDefinition {
                kind,
                reason: format!("a field of `{owner}` is missing `name`"),
            }
        })?;
        block.insert(field_name.to_owned(), field_value(field));
    }
    Ok(block)
}

/// `typedef <type> <name>`: the fragment value is the bare descriptor.
pub struct TypedefParser;

impl LeafParser for TypedefParser {
    fn parse(&self, node: &Value) -> Result<Map<String, Value>, SchemaError> {
        let name = node_name(node, DefinitionKind::Typedef)?;
        let mut fragment = Map::new();
        fragment.insert(name, descriptor_value(node.get("valueType")));
        Ok(fragment)
    }
}

/// Shared parser for struct, union, and exception nodes; the three have the
/// same field-list shape.
pub struct FieldBlockParser(pub DefinitionKind);

impl LeafParser for FieldBlockParser {
    fn parse(&self, node: &Value) -> Result<Map<String, Value>, SchemaError> {
        let name = node_name(node, self.0)?;
        if node.get("fields").and_then(Value::as_array).is_none() {
            return Err(SchemaError::MalformedDefinition {
                kind: self.0,
                reason: format!("`{name}` has no `fields` array"),
            });
        }
        let block = field_block(node.get("fields"), self.0, &name)?;
        let mut fragment = Map::new();
        fragment.insert(name, Value::Object(block));
        Ok(fragment)
    }
}

/// Enum members without an explicit value continue from the previous value
/// plus one, starting at zero.
pub struct EnumParser;

impl LeafParser for EnumParser {
    fn parse(&self, node: &Value) -> Result<Map<String, Value>, SchemaError> {
        let name = node_name(node, DefinitionKind::Enum)?;
        let mut variants = Map::new();
        let mut next = 0i64;
        if let Some(members) = node.get("members").and_then(Value::as_array) {
            for member in members {
                let member_name =
                    member.get("name").and_then(Value::as_str).ok_or_else(|| {
                        SchemaError::MalformedDefinition {
                            kind: DefinitionKind::Enum,
                            reason: format!("a member of `{name}` is missing `name`"),
                        }
                    })?;
                let value = member
                    .get("value")
                    .and_then(Value::as_i64)
                    .unwrap_or(next);
                next = value + 1;
                variants.insert(member_name.to_owned(), Value::from(value));
            }
        }
        let mut fragment = Map::new();
        fragment.insert(name, Value::Object(variants));
        Ok(fragment)
    }
}

/// `const <type> <name> = <value>`: stores the declared type's descriptor
/// and the resolved plain value.
pub struct ConstParser;

impl LeafParser for ConstParser {
    fn parse(&self, node: &Value) -> Result<Map<String, Value>, SchemaError> {
        let name = node_name(node, DefinitionKind::Const)?;
        let mut body = Map::new();
        body.insert("type".to_owned(), descriptor_value(node.get("valueType")));
        body.insert(
            "value".to_owned(),
            node.get("value")
                .and_then(|value| resolve_const(value, DEFAULT_CONST_PREFIX))
                .unwrap_or(Value::Null),
        );
        let mut fragment = Map::new();
        fragment.insert(name, Value::Object(body));
        Ok(fragment)
    }
}

/// Service entries keep their methods under a `service` key; each method
/// carries `returns`, `arguments`, and `throws` as field blocks so the
/// resolver can walk them uniformly. `returns` is a singleton block keyed
/// `return` (empty for void/oneway methods).
pub struct ServiceParser;

impl LeafParser for ServiceParser {
    fn parse(&self, node: &Value) -> Result<Map<String, Value>, SchemaError> {
        let name = node_name(node, DefinitionKind::Service)?;
        let mut methods = Map::new();
        if let Some(functions) = node.get("functions").and_then(Value::as_array) {
            for function in functions {
                let method_name =
                    function.get("name").and_then(Value::as_str).ok_or_else(|| {
                        SchemaError::MalformedDefinition {
                            kind: DefinitionKind::Service,
                            reason: format!("a function of `{name}` is missing `name`"),
                        }
                    })?;

                let mut returns = Map::new();
                if let Some(return_type) = function.get("returns") {
                    if !return_type.is_null() {
                        returns.insert(
                            "return".to_owned(),
                            descriptor_value(Some(return_type)),
                        );
                    }
                }

                let mut body = Map::new();
                body.insert("returns".to_owned(), Value::Object(returns));
                body.insert(
                    "arguments".to_owned(),
                    Value::Object(field_block(
                        function.get("arguments"),
                        DefinitionKind::Service,
                        method_name,
                    )?),
                );
                body.insert(
                    "throws".to_owned(),
                    Value::Object(field_block(
                        function.get("throws"),
                        DefinitionKind::Service,
                        method_name,
                    )?),
                );
                body.insert(
                    "oneway".to_owned(),
                    Value::Bool(
                        function
                            .get("oneway")
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                    ),
                );
                methods.insert(method_name.to_owned(), Value::Object(body));
            }
        }

        let mut entry = Map::new();
        entry.insert("service".to_owned(), Value::Object(methods));
        entry.insert(
            "baseService".to_owned(),
            descriptor_value(node.get("baseService")),
        );
        let mut fragment = Map::new();
        fragment.insert(name, Value::Object(entry));
        Ok(fragment)
    }
}
