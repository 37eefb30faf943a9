//! Integration tests for IDL loading

mod common;

use common::fixture;
use idlforge::error::{IdlError, ValidationError};
use idlforge::idl::{parse_bytes, parse_file, parse_str, SchemaDocument};

#[test]
fn test_load_yaml_fixture() {
    let schema = parse_file(fixture("user_service.yaml")).unwrap();

    assert_eq!(schema.name, "UserService");
    assert_eq!(schema.version, "1.0.0");
    assert_eq!(schema.package, "users");
    let names: Vec<_> = schema.messages.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["GetUserRequest", "User"]);

    let user = schema.message("User").unwrap();
    assert_eq!(user.description, "A registered user");
    let fields: Vec<_> = user.fields.keys().map(String::as_str).collect();
    assert_eq!(fields, vec!["email", "id", "tags"]);
    assert!(user.fields["tags"].repeated);
    assert_eq!(user.fields["tags"].ty, "[]string");

    let service = schema.service("UserService").unwrap();
    let methods: Vec<_> = service.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["GetUser", "WatchUsers"]);
    assert!(service.methods[1].streaming);
    assert!(schema.additional_context.is_empty());
    assert!(schema.generator_metadata.is_none());
}

#[test]
fn test_json_and_yaml_agree() {
    let yaml = parse_file(fixture("user_service.yaml")).unwrap();
    let json = parse_file(fixture("user_service.json")).unwrap();
    assert_eq!(yaml, json);
}

#[test]
fn test_bytes_and_str_agree() {
    let content = std::fs::read_to_string(fixture("user_service.yaml")).unwrap();
    assert_eq!(
        parse_str(&content).unwrap(),
        parse_bytes(content.as_bytes()).unwrap()
    );
}

#[test]
fn test_missing_field_type_names_entity() {
    let err = parse_file(fixture("missing_field_type.yaml")).unwrap_err();
    match &err {
        IdlError::Validation(ValidationError::MissingFieldType { message, field }) => {
            assert_eq!(message, "Order");
            assert_eq!(field, "total");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Order.total"));
}

#[test]
fn test_missing_file_is_read_error() {
    let err = parse_file(fixture("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, IdlError::Read { .. }));
}

#[test]
fn test_document_round_trips_through_yaml() {
    let schema = parse_file(fixture("user_service.yaml")).unwrap();
    let yaml = SchemaDocument::from(&schema).to_yaml().unwrap();
    assert_eq!(parse_str(&yaml).unwrap(), schema);
}
