use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use super::types::{Field, Message, Metadata, Method, Schema, Service};
use crate::error::{IdlError, ValidationError};

/// Persisted form of a schema: entities grouped by name in maps.
///
/// Map keys become the entities' names during normalization. `BTreeMap`
/// gives the normalized schema a lexicographic order by name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SchemaDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub version: String,
    #[serde(default, deserialize_with = "nullable")]
    pub package: String,
    #[serde(default, deserialize_with = "nullable")]
    pub messages: BTreeMap<String, MessageDocument>,
    #[serde(default, deserialize_with = "nullable")]
    pub services: BTreeMap<String, ServiceDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MessageDocument {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub fields: BTreeMap<String, FieldDocument>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FieldDocument {
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub ty: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub repeated: bool,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServiceDocument {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub methods: BTreeMap<String, MethodDocument>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MethodDocument {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub input: String,
    #[serde(default, deserialize_with = "nullable")]
    pub output: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub streaming: bool,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

// `messages:` with no body decodes to null rather than an empty map.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl From<SchemaDocument> for Schema {
    fn from(doc: SchemaDocument) -> Self {
        let messages = doc
            .messages
            .into_iter()
            .map(|(name, m)| Message {
                name,
                description: m.description,
                fields: m
                    .fields
                    .into_iter()
                    .map(|(field_name, f)| {
                        let field = Field {
                            ty: f.ty,
                            description: f.description,
                            required: f.required,
                            repeated: f.repeated,
                            metadata: f.metadata,
                        };
                        (field_name, field)
                    })
                    .collect(),
                metadata: m.metadata,
            })
            .collect();

        let services = doc
            .services
            .into_iter()
            .map(|(name, s)| Service {
                name,
                description: s.description,
                methods: s
                    .methods
                    .into_iter()
                    .map(|(method_name, m)| Method {
                        name: method_name,
                        description: m.description,
                        input: m.input,
                        output: m.output,
                        streaming: m.streaming,
                        metadata: m.metadata,
                    })
                    .collect(),
                metadata: s.metadata,
            })
            .collect();

        Schema {
            name: doc.name,
            version: doc.version,
            package: doc.package,
            messages,
            services,
            ..Default::default()
        }
    }
}

impl From<&Schema> for SchemaDocument {
    fn from(schema: &Schema) -> Self {
        SchemaDocument {
            name: schema.name.clone(),
            version: schema.version.clone(),
            package: schema.package.clone(),
            messages: schema
                .messages
                .iter()
                .map(|m| {
                    let doc = MessageDocument {
                        description: m.description.clone(),
                        fields: m
                            .fields
                            .iter()
                            .map(|(name, f)| {
                                let doc = FieldDocument {
                                    ty: f.ty.clone(),
                                    description: f.description.clone(),
                                    required: f.required,
                                    repeated: f.repeated,
                                    metadata: f.metadata.clone(),
                                };
                                (name.clone(), doc)
                            })
                            .collect(),
                        metadata: m.metadata.clone(),
                    };
                    (m.name.clone(), doc)
                })
                .collect(),
            services: schema
                .services
                .iter()
                .map(|s| {
                    let doc = ServiceDocument {
                        description: s.description.clone(),
                        methods: s
                            .methods
                            .iter()
                            .map(|m| {
                                let doc = MethodDocument {
                                    description: m.description.clone(),
                                    input: m.input.clone(),
                                    output: m.output.clone(),
                                    streaming: m.streaming,
                                    metadata: m.metadata.clone(),
                                };
                                (m.name.clone(), doc)
                            })
                            .collect(),
                        metadata: s.metadata.clone(),
                    };
                    (s.name.clone(), doc)
                })
                .collect(),
        }
    }
}

impl SchemaDocument {
    /// Serialize back to the persisted YAML form.
    pub fn to_yaml(&self) -> Result<String, IdlError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Check schema invariants. The first violation wins.
///
/// 1. the schema has a name
/// 2. every field has a type
/// 3. every method has an input or an output
pub fn validate(schema: &Schema) -> Result<(), ValidationError> {
    if schema.name.is_empty() {
        return Err(ValidationError::MissingSchemaName);
    }

    for message in &schema.messages {
        for (field_name, field) in &message.fields {
            if field.ty.is_empty() {
                return Err(ValidationError::MissingFieldType {
                    message: message.name.clone(),
                    field: field_name.clone(),
                });
            }
        }
    }

    for service in &schema.services {
        for method in &service.methods {
            if method.input.is_empty() && method.output.is_empty() {
                return Err(ValidationError::MissingMethodTypes {
                    service: service.name.clone(),
                    method: method.name.clone(),
                });
            }
        }
    }

    Ok(())
}

fn finish(doc: SchemaDocument) -> Result<Schema, IdlError> {
    let schema = Schema::from(doc);
    validate(&schema)?;
    debug!(
        schema = %schema.name,
        messages = schema.messages.len(),
        services = schema.services.len(),
        "loaded schema"
    );
    Ok(schema)
}

/// Parse and validate a YAML document (JSON is accepted as a YAML subset).
pub fn parse_str(content: &str) -> Result<Schema, IdlError> {
    let doc: SchemaDocument = serde_yaml::from_str(content)?;
    finish(doc)
}

/// Parse and validate raw document bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Schema, IdlError> {
    let doc: SchemaDocument = serde_yaml::from_slice(data)?;
    finish(doc)
}

/// Parse and validate a JSON document.
pub fn parse_json(content: &str) -> Result<Schema, IdlError> {
    let doc: SchemaDocument = serde_json::from_str(content)?;
    finish(doc)
}

/// Parse and validate raw JSON bytes.
pub fn parse_json_bytes(data: &[u8]) -> Result<Schema, IdlError> {
    let doc: SchemaDocument = serde_json::from_slice(data)?;
    finish(doc)
}

/// Read, parse, and validate a document file.
///
/// Files ending in `.json` are decoded as JSON, everything else as YAML.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Schema, IdlError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| IdlError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "json") {
        parse_json_bytes(&data)
    } else {
        parse_bytes(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_YAML: &str = r#"
name: UserService
version: 1.0.0
package: users
messages:
  User:
    description: A registered user
    fields:
      name:
        type: string
        required: true
      id:
        type: int64
        required: true
      tags:
        type: string
        repeated: true
        metadata:
          json: tags
  CreateUserRequest:
    fields:
      email:
        type: string
services:
  Users:
    description: User management
    methods:
      Get:
        input: int64
        output: User
      Create:
        input: CreateUserRequest
        output: User
        streaming: true
"#;

    #[test]
    fn test_parse_stamps_names_in_order() {
        let schema = parse_str(USER_YAML).unwrap();
        assert_eq!(schema.name, "UserService");
        assert_eq!(schema.version, "1.0.0");
        assert_eq!(schema.package, "users");

        let names: Vec<_> = schema.messages.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["CreateUserRequest", "User"]);

        let user = schema.message("User").unwrap();
        assert_eq!(user.description, "A registered user");
        let fields: Vec<_> = user.fields.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["id", "name", "tags"]);
        assert!(user.fields["tags"].repeated);
        assert_eq!(user.fields["tags"].metadata["json"], "tags");

        let users = schema.service("Users").unwrap();
        assert_eq!(users.methods[0].name, "Create");
        assert!(users.methods[0].streaming);
        assert_eq!(users.methods[1].name, "Get");
        assert_eq!(users.methods[1].input, "int64");
        assert!(schema.generator_metadata.is_none());
    }

    #[test]
    fn test_bytes_and_str_agree() {
        let a = parse_str(USER_YAML).unwrap();
        let b = parse_bytes(USER_YAML.as_bytes()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_name_fails() {
        let err = parse_str("version: 1.0.0\n").unwrap_err();
        assert!(matches!(
            err,
            IdlError::Validation(ValidationError::MissingSchemaName)
        ));
        assert!(err.to_string().contains("schema name is required"));
    }

    #[test]
    fn test_missing_field_type_names_entity() {
        let doc = "name: S\nmessages:\n  User:\n    fields:\n      id:\n        required: true\n";
        let err = parse_str(doc).unwrap_err();
        assert!(err.to_string().contains("User.id"), "{err}");
    }

    #[test]
    fn test_method_needs_input_or_output() {
        let doc = "name: S\nservices:\n  Health:\n    methods:\n      Ping: {}\n";
        let err = parse_str(doc).unwrap_err();
        assert!(err.to_string().contains("Health.Ping"), "{err}");

        let doc = "name: S\nservices:\n  Health:\n    methods:\n      Ping:\n        output: Pong\n";
        let schema = parse_str(doc).unwrap();
        assert_eq!(schema.services[0].methods[0].input, "");

        let doc = "name: S\nservices:\n  Events:\n    methods:\n      Publish:\n        input: Event\n";
        assert!(parse_str(doc).is_ok());
    }

    #[test]
    fn test_null_sections_decode_empty() {
        let schema = parse_str("name: Empty\nmessages:\nservices:\n").unwrap();
        assert!(schema.messages.is_empty());
        assert!(schema.services.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_document_error() {
        let err = parse_str("name: [unterminated").unwrap_err();
        assert!(matches!(err, IdlError::Yaml(_)));
    }

    #[test]
    fn test_file_with_invalid_utf8_is_document_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("schema.yaml");
        std::fs::write(&path, b"name: \xff\xfe\n").unwrap();
        let err = parse_file(&path).unwrap_err();
        assert!(matches!(err, IdlError::Yaml(_)), "{err:?}");

        let path = dir.path().join("schema.json");
        std::fs::write(&path, b"{\"name\": \"\xff\"}").unwrap();
        let err = parse_file(&path).unwrap_err();
        assert!(matches!(err, IdlError::Json(_)), "{err:?}");
    }

    #[test]
    fn test_json_document() {
        let schema = parse_json(
            r#"{"name": "Api", "messages": {"Ping": {"fields": {"at": {"type": "int64"}}}}}"#,
        )
        .unwrap();
        assert_eq!(schema.messages[0].name, "Ping");
        assert_eq!(schema.messages[0].fields["at"].ty, "int64");
    }

    #[test]
    fn test_document_round_trip_through_yaml() {
        let schema = parse_str(USER_YAML).unwrap();
        let yaml = SchemaDocument::from(&schema).to_yaml().unwrap();
        assert!(!yaml.contains("streaming: false"));
        assert_eq!(parse_str(&yaml).unwrap(), schema);
    }
}
