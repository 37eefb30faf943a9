//! # CLI Module
//!
//! Command-line surface of the `idlforge` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate one file per template from an IDL file:
//!
//! ```bash
//! idlforge generate --input schema.yaml --templates go.tmpl,python.tmpl --output generated
//! ```
//!
//! Options:
//! - `--input/-i <FILE>` - IDL file (required)
//! - `--templates/-t <A,B,...>` - template files, generated in order (required)
//! - `--output/-o <DIR>` - output directory (default: `generated`, env `IDLFORGE_OUTPUT_DIR`)
//! - `--additional-context-json <JSON>` - object exposed as `additional_context`
//! - `--dry-run` - render and report destinations without writing
//!
//! The first failing template stops the run; files written before it stay.
//!
//! ### `validate`
//!
//! Load an IDL file and report unresolved types and empty entities:
//!
//! ```bash
//! idlforge validate --input schema.yaml --fail-on-warning
//! ```
//!
//! ### `version`
//!
//! Print the version number.
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use clap::Parser;
//! use idlforge::cli::{run, Cli};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cli = Cli::parse_from(["idlforge", "validate", "--input", "schema.yaml"]);
//! run(cli)?;
//! # Ok(())
//! # }
//! ```

mod commands;


pub use commands::{parse_additional_context, run, run_cli, template_paths, Cli, Commands};
