//! Two-phase typedef/union resolution.
//!
//! Phase 1 normalizes every typedef entry and every union member by
//! round-tripping it through the struct leaf generator, so all of them share
//! the shape the struct generator gives its fields. Phase 2 walks exception,
//! struct, and service entries and rewrites `identifier` references whose
//! target is a typedef (shallow merge) or a union (flatten to one display
//! string). References to any other kind stay live.
//!
//! Cyclic typedef/union chains are not guarded; the resolver recurses
//! without bound on such input.

use serde_json::{Map, Value};

use super::dispatch::{Dispatcher, GeneratorRegistry};
use super::error::SchemaError;
use super::kind::DefinitionKind;
use super::store::DefinitionStore;

/// Separator between members when a union is flattened to a display string.
pub const UNION_SEPARATOR: &str = " | ";

/// Kinds whose entries are walked for inlinable references, in order.
const INLINE_KINDS: [DefinitionKind; 3] = [
    DefinitionKind::Exception,
    DefinitionKind::Struct,
    DefinitionKind::Service,
];

/// Runs both phases over the store. Must run exactly once per session,
/// after categorization and before any consumer reads results; a second
/// run on an already-resolved store is a no-op.
pub fn resolve_def_union(
    store: &mut DefinitionStore,
    generators: &GeneratorRegistry,
) -> Result<(), SchemaError> {
    normalize_aliases(store, generators)?;
    inline_references(store);
    Ok(())
}

/// Phase 1: typedef entries are bare descriptors, union entries are member
/// maps; each descriptor goes through the struct generator once.
fn normalize_aliases(
    store: &mut DefinitionStore,
    generators: &GeneratorRegistry,
) -> Result<(), SchemaError> {
    let typedefs: Vec<String> = store.table(DefinitionKind::Typedef).keys().cloned().collect();
    for name in typedefs {
        let raw = store
            .get(DefinitionKind::Typedef, &name)
            .cloned()
            .expect("typedef names were just read from the table");
        let shaped = shape_as_struct_field(store, generators, &name, raw)?;
        store.set(DefinitionKind::Typedef, name, shaped);
    }

    let unions: Vec<String> = store.table(DefinitionKind::Union).keys().cloned().collect();
    for union_name in unions {
        let members: Vec<String> = store
            .get(DefinitionKind::Union, &union_name)
            .and_then(Value::as_object)
            .map(|members| members.keys().cloned().collect())
            .unwrap_or_default();
        for member in members {
            let raw = store
                .get(DefinitionKind::Union, &union_name)
                .and_then(|entry| entry.get(&member))
                .cloned()
                .expect("member names were just read from the entry");
            let shaped = shape_as_struct_field(store, generators, &member, raw)?;
            if let Some(entry) = store
                .table_mut(DefinitionKind::Union)
                .get_mut(&union_name)
                .and_then(Value::as_object_mut)
            {
                entry.insert(member, shaped);
            }
        }
    }

    Ok(())
}

/// Round-trips one raw descriptor through the struct leaf generator as a
/// single-field struct and keeps that field's shaped result.
fn shape_as_struct_field(
    store: &DefinitionStore,
    generators: &GeneratorRegistry,
    key: &str,
    raw: Value,
) -> Result<Value, SchemaError> {
    let generator = generators
        .get(DefinitionKind::Struct)
        .ok_or(SchemaError::MissingGenerator(DefinitionKind::Struct))?;
    let mut single = Map::new();
    single.insert(key.to_owned(), raw);
    let dispatcher = Dispatcher::new(store, generators);
    let shaped = generator.generate(key, &Value::Object(single), &dispatcher)?;
    Ok(shaped.get(key).cloned().unwrap_or(Value::Null))
}

/// Phase 2: walks every entry of the inline kinds. Each entry is processed
/// on a working copy and written back before the next one, so later lookups
/// observe earlier rewrites exactly as sequential in-place mutation would.
fn inline_references(store: &mut DefinitionStore) {
    for kind in INLINE_KINDS {
        let names: Vec<String> = store.table(kind).keys().cloned().collect();
        for name in names {
            let Some(mut entry) = store.get(kind, &name).cloned() else {
                continue;
            };
            match kind {
                DefinitionKind::Service => inline_service(&mut entry, store),
                _ => {
                    if let Some(fields) = entry.as_object_mut() {
                        inline_fields(fields, store);
                    }
                }
            }
            store.set(kind, name, entry);
        }
    }
}

/// Walks each method's `returns`, `arguments`, and `throws` blocks
/// independently. Absent slots (a missing `returns`, `baseService: null`)
/// are skipped, not errors.
fn inline_service(entry: &mut Value, store: &DefinitionStore) {
    let Some(methods) = entry.get_mut("service").and_then(Value::as_object_mut) else {
        return;
    };
    for (_method, body) in methods.iter_mut() {
        let Some(body) = body.as_object_mut() else {
            continue;
        };
        for slot in ["returns", "arguments", "throws"] {
            if let Some(fields) = body.get_mut(slot).and_then(Value::as_object_mut) {
                inline_fields(fields, store);
            }
        }
    }
}

fn inline_fields(fields: &mut Map<String, Value>, store: &DefinitionStore) {
    for (_name, field) in fields.iter_mut() {
        inline_field(field, store);
    }
}

fn inline_field(field: &mut Value, store: &DefinitionStore) {
    let Some(descriptor) = field.as_object_mut() else {
        return;
    };
    if descriptor.get("style").and_then(Value::as_str) != Some("identifier") {
        return;
    }

    if let Some(target) = descriptor
        .get("value")
        .and_then(Value::as_str)
        .map(str::to_owned)
    {
        match store.find_kind(&target) {
            Some(DefinitionKind::Typedef) => {
                if let Some(alias) = store
                    .get(DefinitionKind::Typedef, &target)
                    .and_then(Value::as_object)
                {
                    // shallow merge; the typedef's keys win on collision
                    for (key, value) in alias {
                        descriptor.insert(key.clone(), value.clone());
                    }
                }
            }
            Some(DefinitionKind::Union) => {
                let joined = store
                    .get(DefinitionKind::Union, &target)
                    .and_then(Value::as_object)
                    .map(flatten_union)
                    .unwrap_or_default();
                descriptor.insert("style".to_owned(), Value::String("union".to_owned()));
                descriptor.insert("value".to_owned(), Value::String(joined));
            }
            // struct/exception/enum/service/const stay live references
            _ => {}
        }
    } else if matches!(descriptor.get("value"), Some(Value::Object(_))) {
        // a union reference nested one level inside a resolvable structure:
        // recurse the same walk instead of inlining
        if let Some(inner) = descriptor.get_mut("value").and_then(Value::as_object_mut) {
            inline_fields(inner, store);
        }
    }
}

/// Joins a union's normalized members into one display string. Members that
/// are not already plain strings are stringified first.
fn flatten_union(members: &Map<String, Value>) -> String {
    members
        .values()
        .map(|member| match member {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(UNION_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolved(store: &mut DefinitionStore) {
        let registry = GeneratorRegistry::standard();
        resolve_def_union(store, &registry).unwrap();
    }

    #[test]
    fn typedef_references_are_merged_in_place() {
        let mut store = DefinitionStore::new();
        store.set(
            DefinitionKind::Typedef,
            "UserId",
            json!({"style": "base", "value": "string"}),
        );
        store.set(
            DefinitionKind::Struct,
            "User",
            json!({"id": {"style": "identifier", "value": "UserId", "index": 1, "required": true}}),
        );

        resolved(&mut store);

        assert_eq!(
            store.get(DefinitionKind::Struct, "User").unwrap(),
            &json!({"id": {"style": "base", "value": "string", "index": 1, "required": true}})
        );
    }

    #[test]
    fn union_references_flatten_to_a_joined_string() {
        let mut store = DefinitionStore::new();
        store.set(
            DefinitionKind::Union,
            "Id",
            json!({
                "numeric": {"style": "base", "value": "i64"},
                "text": {"style": "base", "value": "string"},
            }),
        );
        store.set(
            DefinitionKind::Struct,
            "S",
            json!({"id": {"style": "identifier", "value": "Id", "index": 1}}),
        );

        resolved(&mut store);

        let expected = format!(
            "{}{}{}",
            json!({"style": "base", "value": "i64"}),
            UNION_SEPARATOR,
            json!({"style": "base", "value": "string"}),
        );
        assert_eq!(
            store.get(DefinitionKind::Struct, "S").unwrap(),
            &json!({"id": {"style": "union", "value": expected, "index": 1}})
        );
    }

    #[test]
    fn union_members_that_are_plain_strings_are_not_restringified() {
        let members: Map<String, Value> = serde_json::from_value(json!({
            "a": "string",
            "b": {"style": "base", "value": "i32"},
        }))
        .unwrap();
        assert_eq!(
            flatten_union(&members),
            format!("string{}{}", UNION_SEPARATOR, json!({"style": "base", "value": "i32"}))
        );
    }

    #[test]
    fn other_reference_targets_stay_live() {
        let mut store = DefinitionStore::new();
        store.set(DefinitionKind::Enum, "Color", json!({"RED": 0}));
        store.set(
            DefinitionKind::Struct,
            "Paint",
            json!({"color": {"style": "identifier", "value": "Color"}}),
        );
        store.set(
            DefinitionKind::Struct,
            "Node",
            json!({"next": {"style": "identifier", "value": "Node"}}),
        );

        resolved(&mut store);

        assert_eq!(
            store.get(DefinitionKind::Struct, "Paint").unwrap(),
            &json!({"color": {"style": "identifier", "value": "Color"}})
        );
        assert_eq!(
            store.get(DefinitionKind::Struct, "Node").unwrap(),
            &json!({"next": {"style": "identifier", "value": "Node"}})
        );
    }

    #[test]
    fn service_method_slots_are_walked_independently() {
        let mut store = DefinitionStore::new();
        store.set(
            DefinitionKind::Typedef,
            "UserId",
            json!({"style": "base", "value": "i64"}),
        );
        store.set(
            DefinitionKind::Service,
            "UserService",
            json!({
                "service": {
                    "getUser": {
                        "returns": {"return": {"style": "identifier", "value": "UserId"}},
                        "arguments": {"id": {"style": "identifier", "value": "UserId", "index": 1}},
                        "throws": {},
                        "oneway": false,
                    },
                },
                "baseService": null,
            }),
        );

        resolved(&mut store);

        let entry = store.get(DefinitionKind::Service, "UserService").unwrap();
        assert_eq!(
            entry["service"]["getUser"]["returns"]["return"],
            json!({"style": "base", "value": "i64"})
        );
        assert_eq!(
            entry["service"]["getUser"]["arguments"]["id"],
            json!({"style": "base", "value": "i64", "index": 1})
        );
        // baseService: null was skipped, not rejected
        assert_eq!(entry["baseService"], Value::Null);
    }

    #[test]
    fn resolving_twice_changes_nothing_further() {
        let mut store = DefinitionStore::new();
        store.set(
            DefinitionKind::Typedef,
            "UserId",
            json!({"style": "base", "value": "string"}),
        );
        store.set(
            DefinitionKind::Union,
            "Id",
            json!({"n": {"style": "base", "value": "i64"}}),
        );
        store.set(
            DefinitionKind::Struct,
            "User",
            json!({
                "id": {"style": "identifier", "value": "UserId"},
                "key": {"style": "identifier", "value": "Id"},
            }),
        );

        resolved(&mut store);
        let first = store.to_value();
        resolved(&mut store);
        assert_eq!(store.to_value(), first);
    }

    #[test]
    fn a_missing_struct_generator_fails_phase_one() {
        let mut store = DefinitionStore::new();
        store.set(
            DefinitionKind::Typedef,
            "UserId",
            json!({"style": "base", "value": "string"}),
        );

        let registry = GeneratorRegistry::empty();
        assert!(matches!(
            resolve_def_union(&mut store, &registry),
            Err(SchemaError::MissingGenerator(DefinitionKind::Struct))
        ));
    }
}
