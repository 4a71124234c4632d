use serde_json::{Map, Value, json};

use super::Schema;

/// The subset of Gemini `Type` values the response schemas use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    Array,
    String,
}

impl SchemaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaKind::Object => "OBJECT",
            SchemaKind::Array => "ARRAY",
            SchemaKind::String => "STRING",
        }
    }
}

/// SchemaBuilder helps construct a response schema incrementally.
///
/// `required` keeps declaration order so the emitted document is stable.
pub struct SchemaBuilder {
    kind: SchemaKind,
    description: Option<String>,
    properties: Map<String, Value>,
    required: Vec<String>,
    items: Option<Value>,
    enum_values: Vec<String>,
}

impl SchemaBuilder {
    fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            properties: Map::new(),
            required: Vec::new(),
            items: None,
            enum_values: Vec::new(),
        }
    }

    pub fn object() -> Self {
        Self::new(SchemaKind::Object)
    }

    pub fn array(items: Value) -> Self {
        let mut builder = Self::new(SchemaKind::Array);
        builder.items = Some(items);
        builder
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    /// A string restricted to the given values.
    pub fn string_enum<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = Self::new(SchemaKind::String);
        builder.enum_values = values.into_iter().map(Into::into).collect();
        builder
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn property(
        mut self,
        name: impl Into<String>,
        property_schema: Value,
        required: bool,
    ) -> Self {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, property_schema);
        self
    }

    /// Build and return the raw JSON value, for nesting inside another builder.
    pub fn into_value(self) -> Value {
        let mut schema = json!({
            "type": self.kind.as_str()
        });

        if let Some(description) = self.description {
            schema["description"] = json!(description);
        }

        match self.kind {
            SchemaKind::Object => {
                if !self.properties.is_empty() {
                    schema["properties"] = Value::Object(self.properties);
                }
                if !self.required.is_empty() {
                    schema["required"] = json!(self.required);
                }
            }
            SchemaKind::Array => {
                if let Some(items) = self.items {
                    schema["items"] = items;
                }
            }
            SchemaKind::String => {
                if !self.enum_values.is_empty() {
                    schema["enum"] = json!(self.enum_values);
                }
            }
        }

        schema
    }

    pub fn build(self) -> Schema {
        Schema::new(self.into_value())
    }
}
