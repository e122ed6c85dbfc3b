//! # JSON Schema Validation
//!
//! This module validates JSON values against the schemas produced by [`crate::JsonSchema`].
//! It is the gate every record passes through before it reaches the document store.
//!
//! ## Supported Keywords
//!
//! - **Types**: null, boolean, integer, number, string, array, object
//! - **Structure**: `properties`, `required`, `items`, `enum`, `oneOf`
//! - **Constraints**: `minimum`, `maximum`, `minLength`, and `format: "uri"`
//!
//! ## Usage Examples
//!
//! ```rust
//! use sectorguide::validate_value;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string", "minLength": 1},
//!         "rating": {"type": "number", "minimum": 0, "maximum": 5}
//!     },
//!     "required": ["name"]
//! });
//!
//! assert!(validate_value(&json!({"name": "Gong", "rating": 4.5}), &schema).is_ok());
//! assert!(validate_value(&json!({"name": "Gong", "rating": 7}), &schema).is_err());
//! assert!(validate_value(&json!({"rating": 3}), &schema).is_err());
//! ```

use serde_json::{Map, Value};

use crate::json_schema::{
    ENUM_KEY, FORMAT_KEY, ITEMS_KEY, MAXIMUM_KEY, MIN_LENGTH_KEY, MINIMUM_KEY, ONE_OF_KEY,
    PROPERTIES_KEY, REQUIRED_KEY, TYPE_ARRAY, TYPE_BOOLEAN, TYPE_INTEGER, TYPE_KEY, TYPE_NULL,
    TYPE_NUMBER, TYPE_OBJECT, TYPE_STRING, get_value_type,
};

/// Errors that can occur during JSON schema validation.
///
/// Failures inside objects and arrays are wrapped in [`ValidationError::ObjectPropertyError`]
/// and [`ValidationError::ArrayItemError`], so the outermost error names the offending field
/// and the innermost names the violated constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The JSON schema itself is invalid or malformed
    InvalidSchema(String),
    /// The value type doesn't match what the schema expects
    TypeMismatch {
        /// The type that was expected by the schema
        expected: String,
        /// The actual type of the value being validated
        actual: String,
    },
    /// A required object property is missing
    MissingRequiredProperty {
        /// The name of the missing required property
        property: String,
    },
    /// The value doesn't match any of the allowed enum values
    EnumMismatch {
        /// The actual value that was provided
        value: String,
        /// The list of values that would have been valid
        allowed_values: Vec<String>,
    },
    /// The value matched none of the `oneOf` alternatives
    NoMatchingAlternative {
        /// The failure reported by each alternative, in order
        errors: Vec<ValidationError>,
    },
    /// A number is smaller than the schema's `minimum`
    BelowMinimum {
        /// The offending value
        value: f64,
        /// The inclusive lower bound
        minimum: f64,
    },
    /// A number is larger than the schema's `maximum`
    AboveMaximum {
        /// The offending value
        value: f64,
        /// The inclusive upper bound
        maximum: f64,
    },
    /// A string is shorter than the schema's `minLength`
    TooShort {
        /// The number of characters in the value
        length: usize,
        /// The minimum number of characters
        min_length: usize,
    },
    /// A string does not satisfy the schema's `format`
    InvalidFormat {
        /// The format that was required
        format: String,
        /// The offending value
        value: String,
    },
    /// An array item failed validation
    ArrayItemError {
        /// The index of the array item that failed
        index: usize,
        /// The underlying validation error for the item
        source: Box<ValidationError>,
    },
    /// The value passed schema validation but could not be decoded into its record type
    Malformed(String),
    /// An object property failed validation
    ObjectPropertyError {
        /// The name of the property that failed
        property: String,
        /// The underlying validation error for the property
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Returns the dotted path of the field that failed, if the failure is inside an object.
    ///
    /// ```rust
    /// use sectorguide::ValidationError;
    ///
    /// let err = ValidationError::ObjectPropertyError {
    ///     property: "rating".to_string(),
    ///     source: Box::new(ValidationError::AboveMaximum { value: 6.0, maximum: 5.0 }),
    /// };
    /// assert_eq!(err.field_path(), Some("rating".to_string()));
    /// ```
    pub fn field_path(&self) -> Option<String> {
        match self {
            ValidationError::ObjectPropertyError { property, source } => match source.field_path()
            {
                Some(rest) => Some(format!("{}.{}", property, rest)),
                None => Some(property.clone()),
            },
            ValidationError::ArrayItemError { index, source } => match source.field_path() {
                Some(rest) => Some(format!("{}.{}", index, rest)),
                None => Some(index.to_string()),
            },
            ValidationError::MissingRequiredProperty { property } => Some(property.clone()),
            _ => None,
        }
    }

    /// Returns the innermost error, i.e. the constraint that was violated.
    pub fn root_cause(&self) -> &ValidationError {
        match self {
            ValidationError::ObjectPropertyError { source, .. }
            | ValidationError::ArrayItemError { source, .. } => source.root_cause(),
            _ => self,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidSchema(msg) => write!(f, "Invalid schema: {}", msg),
            ValidationError::TypeMismatch { expected, actual } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, actual)
            }
            ValidationError::MissingRequiredProperty { property } => {
                write!(f, "Missing required property: {}", property)
            }
            ValidationError::EnumMismatch {
                value,
                allowed_values,
            } => {
                write!(
                    f,
                    "Enum mismatch: '{}' is not one of {:?}",
                    value, allowed_values
                )
            }
            ValidationError::NoMatchingAlternative { errors } => {
                let reasons: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(
                    f,
                    "Value doesn't match any oneOf schemas: {}",
                    reasons.join("; ")
                )
            }
            ValidationError::BelowMinimum { value, minimum } => {
                write!(f, "Value {} is less than minimum {}", value, minimum)
            }
            ValidationError::AboveMaximum { value, maximum } => {
                write!(f, "Value {} is greater than maximum {}", value, maximum)
            }
            ValidationError::TooShort { length, min_length } => {
                write!(
                    f,
                    "String of length {} is shorter than minLength {}",
                    length, min_length
                )
            }
            ValidationError::InvalidFormat { format, value } => {
                write!(f, "'{}' is not a valid {}", value, format)
            }
            ValidationError::ArrayItemError { index, source } => {
                write!(f, "Array item error at index {}: {}", index, source)
            }
            ValidationError::Malformed(msg) => write!(f, "Malformed record: {}", msg),
            ValidationError::ObjectPropertyError { property, source } => {
                write!(f, "Object property error at '{}': {}", property, source)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates a JSON value against a JSON schema.
///
/// # Arguments
/// * `value` - The JSON value to validate
/// * `schema` - The JSON schema to validate against
///
/// # Returns
/// * `Ok(())` - The value is valid according to the schema
/// * `Err(ValidationError)` - The value failed validation with specific error details
pub fn validate_value(value: &Value, schema: &Value) -> Result<(), ValidationError> {
    let schema_obj = schema
        .as_object()
        .ok_or_else(|| ValidationError::InvalidSchema("Schema must be an object".to_string()))?;

    if let Some(one_of_schemas) = schema_obj.get(ONE_OF_KEY) {
        return validate_one_of(value, one_of_schemas);
    }

    // An empty schema accepts anything.
    let Some(schema_type) = schema_obj.get(TYPE_KEY) else {
        return Ok(());
    };
    let schema_type = schema_type.as_str().ok_or_else(|| {
        ValidationError::InvalidSchema("Schema type must be a string".to_string())
    })?;

    match schema_type {
        TYPE_NULL => validate_null(value),
        TYPE_BOOLEAN => validate_boolean(value),
        TYPE_INTEGER => validate_integer(value, schema_obj),
        TYPE_NUMBER => validate_number(value, schema_obj),
        TYPE_STRING => validate_string(value, schema_obj),
        TYPE_ARRAY => validate_array(value, schema_obj),
        TYPE_OBJECT => validate_object(value, schema_obj),
        _ => Err(ValidationError::InvalidSchema(format!(
            "Unknown schema type: {}",
            schema_type
        ))),
    }
}

fn validate_one_of(value: &Value, one_of_schemas: &Value) -> Result<(), ValidationError> {
    let schemas_array = one_of_schemas
        .as_array()
        .ok_or_else(|| ValidationError::InvalidSchema("oneOf must be an array".to_string()))?;

    let mut errors = Vec::new();

    for schema in schemas_array {
        match validate_value(value, schema) {
            Ok(()) => return Ok(()),
            Err(e) => errors.push(e),
        }
    }

    // A nullable field reports the failure of its non-null branch.
    let non_null: Vec<&ValidationError> = errors
        .iter()
        .filter(|e| {
            !matches!(e, ValidationError::TypeMismatch { expected, .. } if expected == TYPE_NULL)
        })
        .collect();
    if let [only] = non_null.as_slice() {
        return Err((*only).clone());
    }

    Err(ValidationError::NoMatchingAlternative { errors })
}

fn validate_null(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Null => Ok(()),
        _ => Err(ValidationError::TypeMismatch {
            expected: TYPE_NULL.to_string(),
            actual: get_value_type(value),
        }),
    }
}

fn validate_boolean(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Bool(_) => Ok(()),
        _ => Err(ValidationError::TypeMismatch {
            expected: TYPE_BOOLEAN.to_string(),
            actual: get_value_type(value),
        }),
    }
}

fn validate_integer(value: &Value, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => validate_bounds(n.as_f64(), schema),
        _ => Err(ValidationError::TypeMismatch {
            expected: TYPE_INTEGER.to_string(),
            actual: get_value_type(value),
        }),
    }
}

fn validate_number(value: &Value, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    match value {
        Value::Number(n) => validate_bounds(n.as_f64(), schema),
        _ => Err(ValidationError::TypeMismatch {
            expected: TYPE_NUMBER.to_string(),
            actual: get_value_type(value),
        }),
    }
}

fn validate_bounds(value: Option<f64>, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };

    if let Some(minimum) = schema.get(MINIMUM_KEY) {
        let minimum = minimum.as_f64().ok_or_else(|| {
            ValidationError::InvalidSchema("minimum must be a number".to_string())
        })?;
        if value < minimum {
            return Err(ValidationError::BelowMinimum { value, minimum });
        }
    }

    if let Some(maximum) = schema.get(MAXIMUM_KEY) {
        let maximum = maximum.as_f64().ok_or_else(|| {
            ValidationError::InvalidSchema("maximum must be a number".to_string())
        })?;
        if value > maximum {
            return Err(ValidationError::AboveMaximum { value, maximum });
        }
    }

    Ok(())
}

fn validate_string(value: &Value, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    let string_value = match value {
        Value::String(s) => s,
        _ => {
            return Err(ValidationError::TypeMismatch {
                expected: TYPE_STRING.to_string(),
                actual: get_value_type(value),
            });
        }
    };

    if let Some(min_length) = schema.get(MIN_LENGTH_KEY) {
        let min_length = min_length.as_u64().ok_or_else(|| {
            ValidationError::InvalidSchema("minLength must be a non-negative integer".to_string())
        })? as usize;
        let length = string_value.chars().count();
        if length < min_length {
            return Err(ValidationError::TooShort { length, min_length });
        }
    }

    if let Some(format) = schema.get(FORMAT_KEY) {
        let format = format
            .as_str()
            .ok_or_else(|| ValidationError::InvalidSchema("format must be a string".to_string()))?;
        validate_format(string_value, format)?;
    }

    if let Some(enum_values) = schema.get(ENUM_KEY) {
        validate_enum(string_value, enum_values)?;
    }

    Ok(())
}

fn validate_format(value: &str, format: &str) -> Result<(), ValidationError> {
    match format {
        "uri" => {
            if is_http_url(value) {
                Ok(())
            } else {
                Err(ValidationError::InvalidFormat {
                    format: format.to_string(),
                    value: value.to_string(),
                })
            }
        }
        // Unknown formats are annotations only.
        _ => Ok(()),
    }
}

/// Returns true when `value` parses as an absolute http(s) URL with a host.
pub fn is_http_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn validate_enum(value: &str, enum_values: &Value) -> Result<(), ValidationError> {
    let enum_array = enum_values
        .as_array()
        .ok_or_else(|| ValidationError::InvalidSchema("Enum must be an array".to_string()))?;

    let value_found = enum_array
        .iter()
        .any(|enum_val| enum_val.as_str() == Some(value));

    if value_found {
        Ok(())
    } else {
        Err(ValidationError::EnumMismatch {
            value: value.to_string(),
            allowed_values: enum_array
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
        })
    }
}

fn validate_array(value: &Value, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    let array = match value {
        Value::Array(arr) => arr,
        _ => {
            return Err(ValidationError::TypeMismatch {
                expected: TYPE_ARRAY.to_string(),
                actual: get_value_type(value),
            });
        }
    };

    if let Some(items_schema) = schema.get(ITEMS_KEY) {
        match items_schema {
            Value::Array(item_schemas) => {
                for (index, item) in array.iter().enumerate() {
                    if let Some(item_schema) = item_schemas.get(index) {
                        validate_value(item, item_schema).map_err(|e| {
                            ValidationError::ArrayItemError {
                                index,
                                source: Box::new(e),
                            }
                        })?;
                    }
                }
            }
            schema => {
                for (index, item) in array.iter().enumerate() {
                    validate_value(item, schema).map_err(|e| ValidationError::ArrayItemError {
                        index,
                        source: Box::new(e),
                    })?;
                }
            }
        }
    }

    Ok(())
}

fn validate_object(value: &Value, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    let object = match value {
        Value::Object(obj) => obj,
        _ => {
            return Err(ValidationError::TypeMismatch {
                expected: TYPE_OBJECT.to_string(),
                actual: get_value_type(value),
            });
        }
    };

    if let Some(required) = schema.get(REQUIRED_KEY) {
        let required_array = required.as_array().ok_or_else(|| {
            ValidationError::InvalidSchema("Required must be an array".to_string())
        })?;

        for required_prop in required_array {
            let prop_name = required_prop.as_str().ok_or_else(|| {
                ValidationError::InvalidSchema(
                    "Required property names must be strings".to_string(),
                )
            })?;

            if !object.contains_key(prop_name) {
                return Err(ValidationError::MissingRequiredProperty {
                    property: prop_name.to_string(),
                });
            }
        }
    }

    if let Some(properties) = schema.get(PROPERTIES_KEY) {
        let properties_obj = properties.as_object().ok_or_else(|| {
            ValidationError::InvalidSchema("Properties must be an object".to_string())
        })?;

        for (prop_name, prop_schema) in properties_obj {
            if let Some(prop_value) = object.get(prop_name) {
                validate_value(prop_value, prop_schema).map_err(|e| {
                    ValidationError::ObjectPropertyError {
                        property: prop_name.clone(),
                        source: Box::new(e),
                    }
                })?;
            }
        }
    }

    Ok(())
}
