use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::ValidationError;

/// Free-form string metadata attached to messages, fields, services, and methods.
pub type Metadata = BTreeMap<String, String>;

/// Caller-supplied structured data exposed to templates without interpretation.
///
/// Values are `serde_json::Value`: string, number, bool, null, list, or map.
pub type AdditionalContext = Map<String, Value>;

/// Canonical in-memory description of the messages and services to generate code for.
///
/// Messages and services are kept in lexicographic order by name, so every
/// render of the same schema walks them in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub name: String,
    pub version: String,
    pub package: String,
    pub messages: Vec<Message>,
    pub services: Vec<Service>,
    pub additional_context: AdditionalContext,
    /// Stamped by the generator onto the per-template clone; `None` on loaded schemas.
    pub generator_metadata: Option<GeneratorMetadata>,
}

/// Per-file data computed by the generator for the file currently being rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorMetadata {
    /// Fully resolved destination path of the output file.
    pub output_file_path: String,
}

/// A named record type with typed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    pub name: String,
    pub description: String,
    /// Field name → field, ordered by name.
    pub fields: BTreeMap<String, Field>,
    pub metadata: Metadata,
}

/// A field in a [`Message`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Either a primitive keyword or another message's name. Never parsed.
    #[serde(rename = "type")]
    pub ty: String,
    pub description: String,
    pub required: bool,
    pub repeated: bool,
    pub metadata: Metadata,
}

/// A named collection of method signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Service {
    pub name: String,
    pub description: String,
    /// Ordered by name.
    pub methods: Vec<Method>,
    pub metadata: Metadata,
}

/// A request/response operation on a [`Service`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    pub description: String,
    pub input: String,
    pub output: String,
    pub streaming: bool,
    pub metadata: Metadata,
}

impl Field {
    pub fn new(ty: impl Into<String>) -> Self {
        Field {
            ty: ty.into(),
            ..Default::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }
}

impl Message {
    pub fn new(name: impl Into<String>) -> Self {
        Message {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }
}

impl Method {
    pub fn new(name: impl Into<String>, input: impl Into<String>, output: impl Into<String>) -> Self {
        Method {
            name: name.into(),
            input: input.into(),
            output: output.into(),
            ..Default::default()
        }
    }
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Service {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a method, replacing any existing method with the same name.
    pub fn with_method(mut self, method: Method) -> Self {
        upsert_sorted(&mut self.methods, method, |m| &m.name);
        self
    }
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Schema {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Inserts or replaces a message by name, keeping messages ordered.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMessageName`] if the message has no name.
    pub fn add_message(&mut self, message: Message) -> Result<(), ValidationError> {
        if message.name.is_empty() {
            return Err(ValidationError::EmptyMessageName);
        }
        upsert_sorted(&mut self.messages, message, |m| &m.name);
        Ok(())
    }

    /// Inserts or replaces a service by name, keeping services ordered.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyServiceName`] if the service has no name.
    pub fn add_service(&mut self, service: Service) -> Result<(), ValidationError> {
        if service.name.is_empty() {
            return Err(ValidationError::EmptyServiceName);
        }
        upsert_sorted(&mut self.services, service, |s| &s.name);
        Ok(())
    }

    /// Merges caller data into the additional context. Incoming keys win.
    pub fn merge_additional_context(&mut self, context: AdditionalContext) {
        for (key, value) in context {
            self.additional_context.insert(key, value);
        }
    }
}

fn upsert_sorted<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> &String) {
    match items.binary_search_by(|existing| key(existing).as_str().cmp(key(&item).as_str())) {
        Ok(idx) => items[idx] = item,
        Err(idx) => items.insert(idx, item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_message_keeps_order_and_replaces() {
        let mut schema = Schema::new("Shop");
        schema.add_message(Message::new("Order")).unwrap();
        schema.add_message(Message::new("Cart")).unwrap();
        schema
            .add_message(Message::new("Order").with_field("id", Field::new("int64")))
            .unwrap();

        let names: Vec<_> = schema.messages.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Cart", "Order"]);
        assert_eq!(schema.message("Order").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_add_rejects_empty_names() {
        let mut schema = Schema::new("Shop");
        assert_eq!(
            schema.add_message(Message::new("")),
            Err(ValidationError::EmptyMessageName)
        );
        assert_eq!(
            schema.add_service(Service::new("")),
            Err(ValidationError::EmptyServiceName)
        );
        assert!(schema.messages.is_empty());
        assert!(schema.services.is_empty());
    }

    #[test]
    fn test_service_with_method_sorted() {
        let service = Service::new("Users")
            .with_method(Method::new("Get", "GetRequest", "User"))
            .with_method(Method::new("Create", "User", "User"));
        assert_eq!(service.methods[0].name, "Create");
        assert_eq!(service.methods[1].name, "Get");
    }

    #[test]
    fn test_merge_additional_context_overwrites() {
        let mut schema = Schema::new("Shop");
        schema
            .additional_context
            .insert("author".to_string(), json!("alice"));
        let incoming = json!({"author": "bob", "year": 2024});
        if let Value::Object(map) = incoming {
            schema.merge_additional_context(map);
        }
        assert_eq!(schema.additional_context["author"], json!("bob"));
        assert_eq!(schema.additional_context["year"], json!(2024));
    }

    #[test]
    fn test_field_serializes_type_key() {
        let value = serde_json::to_value(Field::new("string").required()).unwrap();
        assert_eq!(value["type"], json!("string"));
        assert_eq!(value["required"], json!(true));
        assert_eq!(value["repeated"], json!(false));
    }
}
