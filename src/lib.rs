//! # idlforge
//!
//! **idlforge** is a language-agnostic code generator. It reads a declarative
//! IDL of messages and services (YAML or JSON) and renders it through
//! [MiniJinja](https://docs.rs/minijinja) templates. Each template declares
//! its own output extension, filename suffix, and type-substitution table, so
//! adding a target language means writing a template, not changing the tool.
//!
//! ## Architecture
//!
//! - **[`idl`]** - schema model, document loading, normalization, and validation
//! - **[`generator`]** - template metadata, type mapping, output naming, helpers,
//!   and the generation engine
//! - **[`linter`]** - advisory checks behind `idlforge validate`
//! - **[`error`]** - error types, with generation errors tagged by phase
//! - **[`logging`]** - `tracing` subscriber setup for the binary
//! - **[`cli`]** - the `clap` command surface
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(idlforge)
//!     participant IDL as idl::parse_file
//!     participant Gen as generator::Generator
//!     participant FS as File System
//!
//!     CLI->>IDL: parse_file("schema.yaml")
//!     IDL->>IDL: Decode, normalize, validate
//!     IDL-->>CLI: Schema
//!     loop each template, in order
//!         CLI->>Gen: generate_file(&schema, template, output_dir)
//!         Gen->>Gen: Parse template, render metadata block
//!         Gen->>Gen: Clone schema through type mapping
//!         Gen->>Gen: Render body to memory
//!         Gen->>FS: Write lowercase(name)+suffix.ext
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use idlforge::generator::Generator;
//! use idlforge::idl::parse_str;
//! use std::path::Path;
//!
//! let schema = parse_str(r#"
//! name: User
//! messages:
//!   User:
//!     fields:
//!       id: {type: int, required: true}
//! "#).unwrap();
//!
//! let template = r#"{% if false %}{% block metadata %}{"extension": "go", "typeMapping": {"int": "int64"}}{% endblock %}{% endif %}
//! {% for message in messages %}type {{ message.name }} struct { Id {{ message.fields.id.type }} }
//! {% endfor %}"#;
//!
//! let rendered = Generator::new()
//!     .render(&schema, "go.tmpl", template, Path::new("generated"))
//!     .unwrap();
//! assert_eq!(rendered.contents, "type User struct { Id int64 }\n");
//! assert!(rendered.path.ends_with("user.go"));
//! ```

pub mod cli;
pub mod error;
pub mod generator;
pub mod idl;
pub mod linter;
pub mod logging;

pub use error::{GenerateError, IdlError, Phase, RunError, ValidationError};
pub use generator::{GeneratedFile, Generator, GeneratorOptions, TemplateMetadata};
pub use idl::{parse_bytes, parse_file, parse_str, Schema};
