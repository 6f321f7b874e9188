//! Schema inference from sample JSON bodies

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Subset of the OpenAPI schema object produced by inference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,
}

impl Schema {
    /// Schema with only a `type`
    #[must_use]
    #[inline]
    pub fn typed(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_owned()),
            ..Self::default()
        }
    }

    /// Schema with a `type` and a `format`
    #[must_use]
    #[inline]
    pub fn formatted(schema_type: &str, format: &str) -> Self {
        Self {
            format: Some(format.to_owned()),
            ..Self::typed(schema_type)
        }
    }

    /// Observed `null`, type still unknown
    fn null() -> Self {
        Self {
            nullable: Some(true),
            ..Self::default()
        }
    }

    fn is_bare_null(&self) -> bool {
        self.schema_type.is_none() && self.one_of.is_none() && self.nullable == Some(true)
    }
}

/// Infer a schema from one JSON sample
#[must_use]
#[inline]
pub fn infer(value: &Value) -> Schema {
    match *value {
        Value::Null => Schema::null(),
        Value::Bool(_) => Schema::typed("boolean"),
        Value::Number(ref number) if number.is_i64() || number.is_u64() => Schema::typed("integer"),
        Value::Number(_) => Schema::typed("number"),
        Value::String(_) => Schema::typed("string"),
        Value::Array(ref items) => Schema {
            items: items.iter().map(infer).reduce(merge).map(Box::new),
            ..Schema::typed("array")
        },
        Value::Object(ref map) => Schema {
            properties: Some(
                map.iter()
                    .map(|(key, value)| (key.clone(), infer(value)))
                    .collect(),
            ),
            ..Schema::typed("object")
        },
    }
}

/// Merge `next` into an optional accumulated schema
#[must_use]
#[inline]
pub fn merge_into(current: Option<Schema>, next: Schema) -> Schema {
    match current {
        Some(existing) => merge(existing, next),
        None => next,
    }
}

/// Merge two schemas describing samples of the same value
///
/// Objects merge property-wise, arrays merge their items. A `null` sample
/// only marks the other side nullable. Different types become `oneOf`.
#[must_use]
#[inline]
pub fn merge(first: Schema, second: Schema) -> Schema {
    if first.is_bare_null() {
        return Schema {
            nullable: Some(true),
            ..second
        };
    }
    if second.is_bare_null() {
        return Schema {
            nullable: Some(true),
            ..first
        };
    }
    if first == second {
        return first;
    }

    if first.schema_type.is_some() && first.schema_type == second.schema_type {
        let nullable = first.nullable.or(second.nullable);
        return match first.schema_type.as_deref() {
            Some("object") => {
                let mut properties = first.properties.unwrap_or_default();
                for (key, value) in second.properties.unwrap_or_default() {
                    let merged = match properties.remove(&key) {
                        Some(existing) => merge(existing, value),
                        None => value,
                    };
                    properties.insert(key, merged);
                }
                Schema {
                    properties: Some(properties),
                    nullable,
                    ..Schema::typed("object")
                }
            }
            Some("array") => Schema {
                items: match (first.items, second.items) {
                    (Some(a), Some(b)) => Some(Box::new(merge(*a, *b))),
                    (items, None) | (None, items) => items,
                },
                nullable,
                ..Schema::typed("array")
            },
            _ => Schema {
                nullable,
                format: first.format.filter(|format| second.format.as_ref() == Some(format)),
                ..first
            },
        };
    }

    // integer and number samples of the same field widen to number
    let numeric = |schema: &Schema| matches!(schema.schema_type.as_deref(), Some("integer" | "number"));
    if numeric(&first) && numeric(&second) {
        return Schema {
            nullable: first.nullable.or(second.nullable),
            ..Schema::typed("number")
        };
    }

    let mut variants = first.one_of.clone().unwrap_or_else(|| vec![first]);
    for variant in second.one_of.clone().unwrap_or_else(|| vec![second]) {
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    Schema {
        one_of: Some(variants),
        ..Schema::default()
    }
}
