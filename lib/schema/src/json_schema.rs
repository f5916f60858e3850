//! JSON Schema export
//!
//! Produces the strict-mode subset accepted by structured-output APIs:
//! every object lists all of its properties as required and forbids
//! additional properties. Optional fields become nullable instead of
//! being left out of `required`.

use crate::schema::{Field, FieldKind, OutputSchema};
use serde_json::{json, Map, Value};

impl OutputSchema {
    /// Root JSON Schema for this output
    pub fn to_json_schema(&self) -> Value {
        let mut root = object_schema(&self.fields);
        if let (Some(description), Value::Object(map)) = (&self.description, &mut root) {
            map.insert("description".to_string(), json!(description));
        }
        root
    }

    /// The `response_format` payload for a chat completion request
    pub fn response_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "schema": self.to_json_schema(),
                "strict": true,
            }
        })
    }
}

fn object_schema(fields: &[Field]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.name.clone(), field_schema(field));
    }
    let required: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn field_schema(field: &Field) -> Value {
    let mut schema = kind_schema(&field.kind);
    if !field.required {
        make_nullable(&mut schema);
    }
    if let (Some(description), Value::Object(map)) = (&field.description, &mut schema) {
        map.insert("description".to_string(), json!(description));
    }
    schema
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String => json!({ "type": "string" }),
        FieldKind::Enum { values } => json!({ "type": "string", "enum": values }),
        FieldKind::Number => json!({ "type": "number" }),
        FieldKind::Integer => json!({ "type": "integer" }),
        FieldKind::Boolean => json!({ "type": "boolean" }),
        FieldKind::Array { items } => json!({ "type": "array", "items": kind_schema(items) }),
        FieldKind::Object { fields } => object_schema(fields),
    }
}

fn make_nullable(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };
    if let Some(Value::String(ty)) = map.get("type").cloned() {
        map.insert("type".to_string(), json!([ty, "null"]));
    }
    if let Some(Value::Array(values)) = map.get_mut("enum") {
        values.push(Value::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_schema() {
        let schema = OutputSchema::new("feedback")
            .field(Field::enumeration("sentiment", ["positive", "negative"]))
            .field(Field::string("summary").describe("one sentence"))
            .field(Field::array("action_items", FieldKind::String));

        assert_eq!(
            schema.to_json_schema(),
            json!({
                "type": "object",
                "properties": {
                    "sentiment": { "type": "string", "enum": ["positive", "negative"] },
                    "summary": { "type": "string", "description": "one sentence" },
                    "action_items": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["sentiment", "summary", "action_items"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_optional_fields_are_nullable_but_required() {
        let schema = OutputSchema::new("s")
            .field(Field::integer("age").optional())
            .field(Field::enumeration("tier", ["gold"]).optional());

        let json = schema.to_json_schema();
        assert_eq!(json["properties"]["age"]["type"], json!(["integer", "null"]));
        assert_eq!(json["properties"]["tier"]["enum"], json!(["gold", null]));
        assert_eq!(json["required"], json!(["age", "tier"]));
    }

    #[test]
    fn test_nested_objects_are_closed() {
        let schema = OutputSchema::new("s").field(Field::array(
            "people",
            FieldKind::Object {
                fields: vec![Field::string("name"), Field::boolean("vip")],
            },
        ));

        let items = &schema.to_json_schema()["properties"]["people"]["items"];
        assert_eq!(items["additionalProperties"], json!(false));
        assert_eq!(items["required"], json!(["name", "vip"]));
    }

    #[test]
    fn test_response_format() {
        let schema = OutputSchema::new("ticket")
            .describe("A support ticket")
            .field(Field::string("title"));
        let format = schema.response_format();

        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "ticket");
        assert_eq!(format["json_schema"]["strict"], true);
        assert_eq!(format["json_schema"]["schema"]["description"], "A support ticket");
    }
}
