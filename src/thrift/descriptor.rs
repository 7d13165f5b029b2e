//! Canonical tagged representation of (possibly nested) type references.

use serde_json::{Map, Value};

/// A resolved type descriptor.
///
/// [`resolve`](TypeDescriptor::resolve) produces the first five variants
/// from raw type nodes. `Union` only comes into existence when the def/union
/// resolver flattens a union reference into a display string; it is terminal
/// and never recursed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Base(String),
    Identifier(String),
    List(Box<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Union(String),
}

impl TypeDescriptor {
    /// Maps a raw type node onto its descriptor.
    ///
    /// The node carries its own discriminator under `type`, matched
    /// case-insensitively: `basetype`, `identifier`, `list`, `set`, `map`.
    /// Container nodes recurse one descriptor level per wrapper. An
    /// unrecognized or malformed node yields `None` rather than an error;
    /// callers decide how to treat a missing descriptor.
    ///
    /// Pure: no side effects, same input always gives the same output.
    pub fn resolve(node: &Value) -> Option<TypeDescriptor> {
        let style = node.get("type")?.as_str()?.to_ascii_lowercase();
        match style.as_str() {
            "basetype" => Some(TypeDescriptor::Base(
                node.get("baseType")?.as_str()?.to_owned(),
            )),
            "identifier" => Some(TypeDescriptor::Identifier(
                node.get("name")?.as_str()?.to_owned(),
            )),
            "list" => Some(TypeDescriptor::List(Box::new(Self::resolve(
                node.get("valueType")?,
            )?))),
            "set" => Some(TypeDescriptor::Set(Box::new(Self::resolve(
                node.get("valueType")?,
            )?))),
            "map" => Some(TypeDescriptor::Map {
                key: Box::new(Self::resolve(node.get("keyType")?)?),
                value: Box::new(Self::resolve(node.get("valueType")?)?),
            }),
            _ => None,
        }
    }

    /// The style tag used in the JSON rendering.
    pub const fn style(&self) -> &'static str {
        match self {
            TypeDescriptor::Base(_) => "base",
            TypeDescriptor::Identifier(_) => "identifier",
            TypeDescriptor::List(_) => "list",
            TypeDescriptor::Set(_) => "set",
            TypeDescriptor::Map { .. } => "map",
            TypeDescriptor::Union(_) => "union",
        }
    }

    /// Canonical JSON rendering: `{"style": ..., "value": ...}`, with an
    /// additional `"key"` for map descriptors. Key order is `style`, `key`,
    /// `value`.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("style".to_owned(), Value::String(self.style().to_owned()));
        match self {
            TypeDescriptor::Base(name)
            | TypeDescriptor::Identifier(name)
            | TypeDescriptor::Union(name) => {
                out.insert("value".to_owned(), Value::String(name.clone()));
            }
            TypeDescriptor::List(element) | TypeDescriptor::Set(element) => {
                out.insert("value".to_owned(), element.to_value());
            }
            TypeDescriptor::Map { key, value } => {
                out.insert("key".to_owned(), key.to_value());
                out.insert("value".to_owned(), value.to_value());
            }
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_base_types() {
        let node = json!({"type": "BaseType", "baseType": "i32"});
        assert_eq!(
            TypeDescriptor::resolve(&node),
            Some(TypeDescriptor::Base("i32".to_owned()))
        );
    }

    #[test]
    fn resolves_identifiers() {
        let node = json!({"type": "Identifier", "name": "User"});
        assert_eq!(
            TypeDescriptor::resolve(&node),
            Some(TypeDescriptor::Identifier("User".to_owned()))
        );
    }

    #[test]
    fn recurses_one_level_per_container_wrapper() {
        let node = json!({
            "type": "List",
            "valueType": {
                "type": "Set",
                "valueType": {"type": "BaseType", "baseType": "string"},
            },
        });
        let descriptor = TypeDescriptor::resolve(&node).unwrap();
        assert_eq!(
            descriptor,
            TypeDescriptor::List(Box::new(TypeDescriptor::Set(Box::new(
                TypeDescriptor::Base("string".to_owned())
            ))))
        );
    }

    #[test]
    fn resolves_both_sides_of_a_map() {
        let node = json!({
            "type": "Map",
            "keyType": {"type": "BaseType", "baseType": "string"},
            "valueType": {"type": "Identifier", "name": "User"},
        });
        let rendered = TypeDescriptor::resolve(&node).unwrap().to_value();
        assert_eq!(
            rendered,
            json!({
                "style": "map",
                "key": {"style": "base", "value": "string"},
                "value": {"style": "identifier", "value": "User"},
            })
        );
    }

    #[test]
    fn unrecognized_discriminators_yield_no_descriptor() {
        assert_eq!(TypeDescriptor::resolve(&json!({"type": "Tuple"})), None);
        assert_eq!(TypeDescriptor::resolve(&json!({"baseType": "i32"})), None);
        assert_eq!(TypeDescriptor::resolve(&json!("i32")), None);
    }

    #[test]
    fn resolve_is_repeatable_on_the_same_node() {
        let node = json!({"type": "BaseType", "baseType": "bool"});
        assert_eq!(
            TypeDescriptor::resolve(&node),
            TypeDescriptor::resolve(&node)
        );
    }
}
