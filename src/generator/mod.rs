//! # Generator Module
//!
//! Turns a [`Schema`](crate::idl::Schema) and a template into one output file,
//! without knowing anything about the target language.
//!
//! ## Architecture
//!
//! ```text
//! template text ─▶ parse once ─┬─▶ metadata pass (empty context) ─▶ TemplateMetadata
//!                              │                                     │
//! Schema ──────────────────────┼──────────▶ type mapping (clone) ◀───┘
//!                              │                    │
//!                              └─▶ body render ◀── stamp output path ─▶ write file
//! ```
//!
//! 1. **Metadata** ([`metadata`]) - the template's `metadata` block declares the
//!    output extension, an optional filename suffix, and a type-substitution table
//! 2. **Type mapping** ([`mapping`]) - the schema is cloned with type tokens rewritten
//! 3. **Naming** ([`naming`]) - `lowercase(schema.name) + suffix + "." + extension`
//! 4. **Rendering** ([`engine`]) - the body renders against the clone, whose
//!    `generator_metadata.output_file_path` holds the destination path
//!
//! ## Template Example
//!
//! ```jinja
//! {% if false %}{% block metadata %}{"extension": "go", "typeMapping": {"int": "int64"}}{% endblock %}{% endif %}
//! // Code generated into {{ generator_metadata.output_file_path }}. DO NOT EDIT.
//! package {{ package | lower }}
//! {% for message in messages %}
//!
//! type {{ message.name | pascal }} struct {
//! {% for name, field in message.fields | items %}
//!     {{ name | pascal }} {{ field.type }}{% if field.required %} // required{% endif %}
//!
//! {% endfor %}
//! }
//! {% endfor %}
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use idlforge::generator::Generator;
//! use idlforge::idl::parse_file;
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> anyhow::Result<()> {
//! let schema = parse_file("schema.yaml")?;
//! let written = Generator::new().run(
//!     &schema,
//!     &[PathBuf::from("go.tmpl"), PathBuf::from("python.tmpl")],
//!     Path::new("generated"),
//! )?;
//! for file in &written {
//!     println!("{}", file.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod helpers;
pub mod mapping;
pub mod metadata;
pub mod naming;

pub use engine::{
    read_template, GeneratedFile, GenerationRun, Generator, GeneratorOptions, RenderedFile,
};
pub use mapping::{apply_type_mapping, map_type, TypeMapping};
pub use metadata::{extract_metadata, parse_metadata, TemplateMetadata, METADATA_BLOCK};
pub use naming::{output_filename, output_path};
