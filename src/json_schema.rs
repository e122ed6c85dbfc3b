//! # JSON Schema Descriptions
//!
//! The [`JsonSchema`] trait describes a Rust type as a JSON schema value. Primitive and
//! container types are implemented here; record types derive it with
//! `#[derive(sectorguide_derive::JsonSchema)]`.
//!
//! ```rust
//! use sectorguide::JsonSchema;
//!
//! let schema = <Option<f64>>::json_schema();
//! assert_eq!(schema["oneOf"][0]["type"], "number");
//! assert_eq!(schema["oneOf"][1]["type"], "null");
//! ```

use serde_json::{Map, Value};

pub const TYPE_KEY: &str = "type";
pub const PROPERTIES_KEY: &str = "properties";
pub const REQUIRED_KEY: &str = "required";
pub const ITEMS_KEY: &str = "items";
pub const ENUM_KEY: &str = "enum";
pub const ONE_OF_KEY: &str = "oneOf";
pub const MINIMUM_KEY: &str = "minimum";
pub const MAXIMUM_KEY: &str = "maximum";
pub const MIN_LENGTH_KEY: &str = "minLength";
pub const FORMAT_KEY: &str = "format";

pub const TYPE_NULL: &str = "null";
pub const TYPE_BOOLEAN: &str = "boolean";
pub const TYPE_INTEGER: &str = "integer";
pub const TYPE_NUMBER: &str = "number";
pub const TYPE_STRING: &str = "string";
pub const TYPE_ARRAY: &str = "array";
pub const TYPE_OBJECT: &str = "object";

/// Types that can describe themselves as a JSON schema.
pub trait JsonSchema {
    /// Returns the JSON schema for this type.
    fn json_schema() -> Value;
}

fn primitive_schema(type_name: &str) -> Value {
    let mut schema = Map::new();
    schema.insert(TYPE_KEY.to_string(), Value::String(type_name.to_string()));
    Value::Object(schema)
}

macro_rules! primitive_json_schema {
    ($type_name:expr => $($ty:ty),+) => {
        $(
            impl JsonSchema for $ty {
                fn json_schema() -> Value {
                    primitive_schema($type_name)
                }
            }
        )+
    };
}

primitive_json_schema!(TYPE_BOOLEAN => bool);
primitive_json_schema!(TYPE_INTEGER => i8, i16, i32, i64, u8, u16, u32, u64, usize);
primitive_json_schema!(TYPE_NUMBER => f32, f64);
primitive_json_schema!(TYPE_STRING => String, str);

impl<T: JsonSchema> JsonSchema for Vec<T> {
    fn json_schema() -> Value {
        let mut schema = Map::new();
        schema.insert(TYPE_KEY.to_string(), Value::String(TYPE_ARRAY.to_string()));
        schema.insert(ITEMS_KEY.to_string(), T::json_schema());
        Value::Object(schema)
    }
}

impl<T: JsonSchema> JsonSchema for Option<T> {
    fn json_schema() -> Value {
        let mut schema = Map::new();
        schema.insert(
            ONE_OF_KEY.to_string(),
            Value::Array(vec![T::json_schema(), primitive_schema(TYPE_NULL)]),
        );
        Value::Object(schema)
    }
}

impl JsonSchema for Value {
    fn json_schema() -> Value {
        Value::Object(Map::new())
    }
}

/// Merges field constraints produced by the derive macro into a field schema.
///
/// `description` and `default` annotate the field itself. Validation keywords go to the
/// first non-null branch when the field is nullable, so `null` stays acceptable.
#[doc(hidden)]
pub fn apply_constraints(schema: &mut Value, constraints: Map<String, Value>) {
    for (key, value) in constraints {
        let annotates_field = key == "description" || key == "default";
        let nullable = schema.get(ONE_OF_KEY).is_some();
        let target = if annotates_field || !nullable {
            Some(&mut *schema)
        } else {
            schema
                .get_mut(ONE_OF_KEY)
                .and_then(Value::as_array_mut)
                .and_then(|branches| {
                    branches
                        .iter_mut()
                        .find(|b| b.get(TYPE_KEY).and_then(Value::as_str) != Some(TYPE_NULL))
                })
        };
        if let Some(Value::Object(obj)) = target {
            obj.insert(key, value);
        }
    }
}

/// Returns the JSON schema type name of a value.
pub fn get_value_type(value: &Value) -> String {
    match value {
        Value::Null => TYPE_NULL,
        Value::Bool(_) => TYPE_BOOLEAN,
        Value::Number(n) if n.is_i64() || n.is_u64() => TYPE_INTEGER,
        Value::Number(_) => TYPE_NUMBER,
        Value::String(_) => TYPE_STRING,
        Value::Array(_) => TYPE_ARRAY,
        Value::Object(_) => TYPE_OBJECT,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitive_schemas() {
        assert_eq!(String::json_schema(), json!({"type": "string"}));
        assert_eq!(bool::json_schema(), json!({"type": "boolean"}));
        assert_eq!(i64::json_schema(), json!({"type": "integer"}));
        assert_eq!(f64::json_schema(), json!({"type": "number"}));
    }

    #[test]
    fn vec_schema_wraps_items() {
        assert_eq!(
            <Vec<String>>::json_schema(),
            json!({"type": "array", "items": {"type": "string"}})
        );
    }

    #[test]
    fn option_schema_allows_null() {
        assert_eq!(
            <Option<String>>::json_schema(),
            json!({"oneOf": [{"type": "string"}, {"type": "null"}]})
        );
    }

    #[test]
    fn constraints_land_on_non_null_branch() {
        let mut schema = <Option<f64>>::json_schema();
        let mut constraints = Map::new();
        constraints.insert("minimum".to_string(), json!(0.0));
        constraints.insert("description".to_string(), json!("rating"));
        apply_constraints(&mut schema, constraints);
        assert_eq!(
            schema,
            json!({
                "description": "rating",
                "oneOf": [{"type": "number", "minimum": 0.0}, {"type": "null"}]
            })
        );
    }

    #[test]
    fn constraints_on_plain_schema() {
        let mut schema = String::json_schema();
        let mut constraints = Map::new();
        constraints.insert("minLength".to_string(), json!(1));
        apply_constraints(&mut schema, constraints);
        assert_eq!(schema, json!({"type": "string", "minLength": 1}));
    }

    #[test]
    fn value_types() {
        assert_eq!(get_value_type(&json!(null)), "null");
        assert_eq!(get_value_type(&json!(3)), "integer");
        assert_eq!(get_value_type(&json!(3.5)), "number");
        assert_eq!(get_value_type(&json!([1])), "array");
        assert_eq!(get_value_type(&json!({})), "object");
    }
}
