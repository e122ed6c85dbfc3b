use serde::{Deserialize, Serialize};
use serde_json::json;
use sectorguide::{JsonSchema, validate_value};
use sectorguide_derive::JsonSchema as JsonSchemaDerive;

// Test structs with derive macro
#[derive(JsonSchemaDerive)]
#[allow(dead_code)]
struct TestPerson {
    name: String,
    age: i32,
    email: Option<String>,
}

#[derive(JsonSchemaDerive)]
#[allow(dead_code)]
struct TestNestedStruct {
    user: TestPerson,
    score: f64,
    tags: Vec<String>,
}

#[derive(JsonSchemaDerive, Serialize, Deserialize)]
#[allow(dead_code)]
struct TestReview {
    #[schema(description = "Reviewer name", min_length = 1)]
    author: String,
    #[schema(description = "Score out of ten", minimum = 0, maximum = 10)]
    score: Option<f64>,
    #[serde(default)]
    #[schema(description = "Free-form labels")]
    labels: Vec<String>,
    #[schema(format = "uri")]
    link: Option<String>,
}

#[derive(JsonSchemaDerive)]
#[allow(dead_code)]
struct TestKeywords {
    r#type: String,
}

#[test]
fn struct_schema() {
    let schema = TestPerson::json_schema();
    let expected = json!({
        "title": "TestPerson",
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "age": {"type": "integer"},
            "email": {
                "oneOf": [
                    {"type": "string"},
                    {"type": "null"}
                ]
            }
        },
        "required": ["name", "age"]
    });
    assert_eq!(schema, expected);
}

#[test]
fn nested_struct() {
    let schema = TestNestedStruct::json_schema();
    let properties = schema["properties"].as_object().unwrap();
    assert_eq!(properties["user"]["title"], "TestPerson");
    assert_eq!(properties["score"], json!({"type": "number"}));
    assert_eq!(
        properties["tags"],
        json!({"type": "array", "items": {"type": "string"}})
    );
    assert_eq!(schema["required"], json!(["user", "score", "tags"]));
}

#[test]
fn constraints_land_on_the_right_branch() {
    let schema = TestReview::json_schema();
    let expected = json!({
        "title": "TestReview",
        "type": "object",
        "properties": {
            "author": {
                "type": "string",
                "description": "Reviewer name",
                "minLength": 1
            },
            "score": {
                "description": "Score out of ten",
                "oneOf": [
                    {"type": "number", "minimum": 0.0, "maximum": 10.0},
                    {"type": "null"}
                ]
            },
            "labels": {
                "type": "array",
                "items": {"type": "string"},
                "description": "Free-form labels",
                "default": []
            },
            "link": {
                "oneOf": [
                    {"type": "string", "format": "uri"},
                    {"type": "null"}
                ]
            }
        },
        "required": ["author"]
    });
    assert_eq!(schema, expected);
}

#[test]
fn derived_schema_validates() {
    let schema = TestReview::json_schema();
    assert!(validate_value(&json!({"author": "Ada"}), &schema).is_ok());
    assert!(validate_value(&json!({"author": "Ada", "score": null}), &schema).is_ok());
    assert!(validate_value(&json!({"author": "Ada", "score": 10}), &schema).is_ok());
    assert!(validate_value(&json!({"author": "Ada", "score": 10.5}), &schema).is_err());
    assert!(validate_value(&json!({"author": ""}), &schema).is_err());
    assert!(validate_value(&json!({"author": "Ada", "link": "example.com"}), &schema).is_err());
    assert!(
        validate_value(
            &json!({"author": "Ada", "link": "https://example.com/review"}),
            &schema
        )
        .is_ok()
    );
}

#[test]
fn raw_identifiers_are_unprefixed() {
    let schema = TestKeywords::json_schema();
    assert!(schema["properties"].get("type").is_some());
    assert_eq!(schema["required"], json!(["type"]));
}
