//! # Error Types
//!
//! Every failure the generator can produce, grouped by where it originates:
//!
//! - [`IdlError`] - reading, decoding, or validating an IDL document
//! - [`ValidationError`] - a well-formed document that breaks a schema invariant
//! - [`GenerateError`] - a single template's generation, tagged with a [`Phase`]
//! - [`RunError`] - a multi-template run that stopped at its first failure
//!
//! Nothing is retried: template and document errors are deterministic, so the
//! first error of each phase is returned to the caller unchanged.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::generator::GeneratedFile;

/// Failure while turning a document into a validated [`Schema`](crate::idl::Schema).
#[derive(Debug, Error)]
pub enum IdlError {
    /// The document file could not be read.
    #[error("failed to read file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Malformed YAML syntax or shape.
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Malformed JSON syntax or shape.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but violates a schema invariant.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// A schema invariant violation. Always names the offending entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("schema name is required")]
    MissingSchemaName,
    #[error("field type is required for {message}.{field}")]
    MissingFieldType { message: String, field: String },
    #[error("input or output type is required for {service}.{method}")]
    MissingMethodTypes { service: String, method: String },
    #[error("message name is required")]
    EmptyMessageName,
    #[error("service name is required")]
    EmptyServiceName,
}

/// The generation phase a [`GenerateError`] was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Reading the template source.
    Read,
    /// Parsing the template text.
    Parse,
    /// Extracting the template's self-declared metadata.
    Metadata,
    /// Applying the type-substitution table.
    Transform,
    /// Rendering the main template body.
    Render,
    /// Creating the output directory or writing the output file.
    Write,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Read => "read",
            Phase::Parse => "parse",
            Phase::Metadata => "metadata",
            Phase::Transform => "transform",
            Phase::Render => "render",
            Phase::Write => "write",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure while generating one output file from one template.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read template {}: {source}", .path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse template: {0}")]
    ParseTemplate(#[source] minijinja::Error),
    #[error("template does not define a `metadata` block")]
    MissingMetadata,
    #[error("failed to render metadata: {0}")]
    RenderMetadata(#[source] minijinja::Error),
    #[error("failed to unmarshal metadata JSON: {0}")]
    MetadataJson(#[source] serde_json::Error),
    #[error("no extension found in template metadata")]
    MissingExtension,
    #[error("type mapping for `{from}` has an empty replacement")]
    EmptyTypeMapping { from: String },
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to execute template: {0}")]
    RenderBody(#[source] minijinja::Error),
    #[error("failed to write output file {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    /// The phase this error was raised in.
    pub fn phase(&self) -> Phase {
        match self {
            GenerateError::ReadTemplate { .. } => Phase::Read,
            GenerateError::ParseTemplate(_) => Phase::Parse,
            GenerateError::MissingMetadata
            | GenerateError::RenderMetadata(_)
            | GenerateError::MetadataJson(_)
            | GenerateError::MissingExtension => Phase::Metadata,
            GenerateError::EmptyTypeMapping { .. } => Phase::Transform,
            GenerateError::RenderBody(_) => Phase::Render,
            GenerateError::CreateDir { .. } | GenerateError::WriteOutput { .. } => Phase::Write,
        }
    }

    /// Whether the error came from the file system rather than the template itself.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            GenerateError::ReadTemplate { .. }
                | GenerateError::CreateDir { .. }
                | GenerateError::WriteOutput { .. }
        )
    }
}

/// A multi-template run stopped at `template`.
///
/// Files produced by earlier templates are kept on disk and listed in
/// `completed`.
#[derive(Debug, Error)]
#[error(
    "template {} failed during {}: {source}",
    .template.display(),
    .source.phase()
)]
pub struct RunError {
    pub template: PathBuf,
    pub completed: Vec<GeneratedFile>,
    #[source]
    pub source: GenerateError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_tags() {
        assert_eq!(GenerateError::MissingMetadata.phase(), Phase::Metadata);
        assert_eq!(GenerateError::MissingExtension.phase(), Phase::Metadata);
        assert_eq!(
            GenerateError::EmptyTypeMapping {
                from: "int".to_string()
            }
            .phase(),
            Phase::Transform
        );
        let io = GenerateError::CreateDir {
            path: PathBuf::from("out"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(io.phase(), Phase::Write);
        assert!(io.is_io());
        assert!(!GenerateError::MissingMetadata.is_io());
    }

    #[test]
    fn test_validation_messages_name_entity() {
        let err = ValidationError::MissingFieldType {
            message: "User".to_string(),
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "field type is required for User.id");

        let err = ValidationError::MissingMethodTypes {
            service: "UserService".to_string(),
            method: "Ping".to_string(),
        };
        assert!(err.to_string().contains("UserService.Ping"));
    }

    #[test]
    fn test_run_error_display_includes_phase() {
        let err = RunError {
            template: PathBuf::from("go.tmpl"),
            completed: Vec::new(),
            source: GenerateError::MissingExtension,
        };
        let msg = err.to_string();
        assert!(msg.contains("go.tmpl"));
        assert!(msg.contains("metadata"));
    }
}
