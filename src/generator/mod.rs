//! Standard leaf generators: render one definition into its final JSON.
//!
//! Generation works over the already-resolved store, so these renderers do
//! not chase references themselves; the dispatcher is available as `gen` for
//! implementations that want to.

use serde_json::{Map, Value};

use crate::thrift::dispatch::{Dispatcher, LeafGenerator};
use crate::thrift::error::SchemaError;
use crate::thrift::kind::DefinitionKind;

/// Rewrites a descriptor object into canonical key order — `style`, `key`,
/// `value`, then everything else in declaration order — recursing into
/// nested descriptors. Non-descriptor values pass through unchanged.
pub(crate) fn shape_field(value: &Value) -> Value {
    let Some(descriptor) = value.as_object() else {
        return value.clone();
    };
    if !descriptor.contains_key("style") {
        return value.clone();
    }

    let mut shaped = Map::new();
    if let Some(style) = descriptor.get("style") {
        shaped.insert("style".to_owned(), style.clone());
    }
    if let Some(key) = descriptor.get("key") {
        shaped.insert("key".to_owned(), shape_field(key));
    }
    if let Some(element) = descriptor.get("value") {
        shaped.insert("value".to_owned(), shape_field(element));
    }
    for (key, rest) in descriptor {
        if key == "style" || key == "key" || key == "value" {
            continue;
        }
        shaped.insert(key.clone(), rest.clone());
    }
    Value::Object(shaped)
}

/// Renders struct, union, and exception definitions: every field goes
/// through [`shape_field`].
pub struct StructGenerator;

impl LeafGenerator for StructGenerator {
    fn generate(
        &self,
        name: &str,
        definition: &Value,
        _gen: &Dispatcher<'_>,
    ) -> Result<Value, SchemaError> {
        let fields = definition
            .as_object()
            .ok_or_else(|| SchemaError::MalformedDefinition {
                kind: DefinitionKind::Struct,
                reason: format!("`{name}` is not a field mapping"),
            })?;
        let mut out = Map::new();
        for (field_name, field) in fields {
            out.insert(field_name.clone(), shape_field(field));
        }
        Ok(Value::Object(out))
    }
}

/// Renders a typedef: its entry is a bare descriptor.
pub struct TypedefGenerator;

impl LeafGenerator for TypedefGenerator {
    fn generate(
        &self,
        _name: &str,
        definition: &Value,
        _gen: &Dispatcher<'_>,
    ) -> Result<Value, SchemaError> {
        Ok(shape_field(definition))
    }
}

/// Renders an enum: the variant map is already its final shape.
pub struct EnumGenerator;

impl LeafGenerator for EnumGenerator {
    fn generate(
        &self,
        _name: &str,
        definition: &Value,
        _gen: &Dispatcher<'_>,
    ) -> Result<Value, SchemaError> {
        Ok(definition.clone())
    }
}

/// Renders a const: the declared type's descriptor plus the resolved value.
pub struct ConstGenerator;

impl LeafGenerator for ConstGenerator {
    fn generate(
        &self,
        _name: &str,
        definition: &Value,
        _gen: &Dispatcher<'_>,
    ) -> Result<Value, SchemaError> {
        let mut out = Map::new();
        out.insert(
            "type".to_owned(),
            shape_field(definition.get("type").unwrap_or(&Value::Null)),
        );
        out.insert(
            "value".to_owned(),
            definition.get("value").cloned().unwrap_or(Value::Null),
        );
        Ok(Value::Object(out))
    }
}

/// Renders a service: each method's `returns`, `arguments`, and `throws`
/// fields go through [`shape_field`]; `oneway` and `baseService` pass
/// through.
pub struct ServiceGenerator;

impl LeafGenerator for ServiceGenerator {
    fn generate(
        &self,
        _name: &str,
        definition: &Value,
        _gen: &Dispatcher<'_>,
    ) -> Result<Value, SchemaError> {
        let mut out = definition.clone();
        if let Some(methods) = out.get_mut("service").and_then(Value::as_object_mut) {
            for (_method, body) in methods.iter_mut() {
                let Some(body) = body.as_object_mut() else {
                    continue;
                };
                for slot in ["returns", "arguments", "throws"] {
                    if let Some(fields) = body.get_mut(slot).and_then(Value::as_object_mut) {
                        for (_field_name, field) in fields.iter_mut() {
                            let shaped = shape_field(field);
                            *field = shaped;
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::dispatch::GeneratorRegistry;
    use crate::thrift::store::DefinitionStore;
    use serde_json::json;

    fn generate(generator: &dyn LeafGenerator, definition: Value) -> Value {
        let store = DefinitionStore::new();
        let registry = GeneratorRegistry::standard();
        let dispatcher = Dispatcher::new(&store, &registry);
        generator.generate("T", &definition, &dispatcher).unwrap()
    }

    #[test]
    fn shape_field_puts_descriptor_keys_first() {
        let shaped = shape_field(&json!({
            "index": 1,
            "value": "string",
            "style": "base",
        }));
        let keys: Vec<_> = shaped.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["style", "value", "index"]);
    }

    #[test]
    fn shape_field_recurses_into_nested_descriptors() {
        let shaped = shape_field(&json!({
            "style": "map",
            "value": {"value": "i32", "style": "base"},
            "key": {"value": "string", "style": "base"},
        }));
        assert_eq!(
            shaped,
            json!({
                "style": "map",
                "key": {"style": "base", "value": "string"},
                "value": {"style": "base", "value": "i32"},
            })
        );
        let keys: Vec<_> = shaped.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["style", "key", "value"]);
    }

    #[test]
    fn shape_field_passes_non_descriptors_through() {
        assert_eq!(shape_field(&json!("string")), json!("string"));
        assert_eq!(shape_field(&json!({"index": 1})), json!({"index": 1}));
        assert_eq!(shape_field(&Value::Null), Value::Null);
    }

    #[test]
    fn struct_generator_shapes_every_field() {
        let out = generate(
            &StructGenerator,
            json!({"id": {"index": 1, "value": "i64", "style": "base"}}),
        );
        let keys: Vec<_> = out["id"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["style", "value", "index"]);
    }

    #[test]
    fn struct_generator_rejects_non_mappings() {
        let store = DefinitionStore::new();
        let registry = GeneratorRegistry::standard();
        let dispatcher = Dispatcher::new(&store, &registry);
        assert!(matches!(
            StructGenerator.generate("T", &json!(1), &dispatcher),
            Err(SchemaError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn const_generator_keeps_type_and_value() {
        let out = generate(
            &ConstGenerator,
            json!({"type": {"style": "base", "value": "i32"}, "value": 7}),
        );
        assert_eq!(
            out,
            json!({"type": {"style": "base", "value": "i32"}, "value": 7})
        );
    }

    #[test]
    fn service_generator_shapes_method_fields() {
        let out = generate(
            &ServiceGenerator,
            json!({
                "service": {
                    "ping": {
                        "returns": {"return": {"value": "bool", "style": "base"}},
                        "arguments": {},
                        "throws": {},
                        "oneway": false,
                    },
                },
                "baseService": null,
            }),
        );
        let keys: Vec<_> = out["service"]["ping"]["returns"]["return"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["style", "value"]);
        assert_eq!(out["baseService"], Value::Null);
    }
}
