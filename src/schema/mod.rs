mod builder;
pub use builder::{SchemaBuilder, SchemaKind};

use serde_json::Value;

/// Schema is the response-shape declaration sent alongside an instruction so
/// the oracle constrains its JSON output.
///
/// Types are spelled the way Gemini's `responseSchema` expects them
/// (`OBJECT`, `ARRAY`, `STRING`).
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub schema: Value,
}

impl Schema {
    pub fn new(schema: Value) -> Self {
        Self { schema }
    }

    pub fn to_json(&self) -> &Value {
        &self.schema
    }

    /// Names listed under the top-level `required` key, in declaration order.
    pub fn required_fields(&self) -> Vec<&str> {
        self.schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.schema)
    }
}

/// SchemaType trait defines a type that can be converted to a response schema
pub trait SchemaType {
    /// Generate the schema describing this type
    fn schema() -> Schema;
}
