use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::generator::{read_template, Generator};
use crate::idl::{parse_file, AdditionalContext, Schema};
use crate::linter::{has_warnings, lint_schema, print_lint_issues};

/// Command-line interface for idlforge
///
/// Generates source code from a YAML IDL file and one or more templates.
#[derive(Parser, Debug)]
#[command(name = "idlforge", version)]
#[command(about = "Generate code from IDL files using templates", long_about = None)]
pub struct Cli {
    /// Enable debug logging, even when `RUST_LOG` is set
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available idlforge commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate code from an IDL file using one or more templates
    Generate {
        /// Input IDL file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        input: PathBuf,

        /// Template files, comma-separated or repeated; generated in the given order
        #[arg(short, long, required = true, num_args = 1.., value_delimiter = ',')]
        templates: Vec<String>,

        /// Output directory for generated files
        #[arg(short, long, default_value = "generated", env = "IDLFORGE_OUTPUT_DIR")]
        output: PathBuf,

        /// Additional context as a JSON object, exposed to templates as `additional_context`
        #[arg(long, value_name = "JSON")]
        additional_context_json: Option<String>,

        /// Render every template and print the destinations without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Validate an IDL file and report unresolved types
    Validate {
        /// Input IDL file to validate
        #[arg(short, long)]
        input: PathBuf,

        /// Exit with an error if any warning is reported
        #[arg(long, default_value_t = false)]
        fail_on_warning: bool,
    },
    /// Print the version number
    Version,
}

/// Parse the process arguments and run the selected command
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

/// Run an already parsed command line
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            input,
            templates,
            output,
            additional_context_json,
            dry_run,
        } => {
            let mut schema = parse_file(&input)
                .with_context(|| format!("Error parsing IDL file {}", input.display()))?;
            if let Some(json) = additional_context_json.as_deref() {
                schema.merge_additional_context(parse_additional_context(json)?);
            }
            let templates = template_paths(&templates)?;
            if dry_run {
                dry_run_templates(&schema, &templates, &output)
            } else {
                generate_templates(&schema, &templates, &output)
            }
        }
        Commands::Validate {
            input,
            fail_on_warning,
        } => {
            let schema = parse_file(&input)
                .with_context(|| format!("Error parsing IDL file {}", input.display()))?;
            let issues = lint_schema(&schema);
            if issues.is_empty() {
                println!("Validation completed successfully - no issues found");
                return Ok(());
            }
            print_lint_issues(&issues);
            if fail_on_warning && has_warnings(&issues) {
                bail!("validation reported warnings for {}", input.display());
            }
            Ok(())
        }
        Commands::Version => {
            println!("idlforge version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Decode `--additional-context-json`; the value must be a JSON object.
pub fn parse_additional_context(json: &str) -> Result<AdditionalContext> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("Error parsing additional context JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => bail!(
            "additional context must be a JSON object, got {}",
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Trim each template argument and drop empty entries.
pub fn template_paths(raw: &[String]) -> Result<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = raw
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
        .collect();
    if paths.is_empty() {
        bail!("template paths are required");
    }
    Ok(paths)
}

fn generate_templates(schema: &Schema, templates: &[PathBuf], output: &Path) -> Result<()> {
    match Generator::new().run(schema, templates, output) {
        Ok(written) => {
            for file in &written {
                println!(
                    "✅ Generated {} code in {}",
                    file.extension,
                    file.path.display()
                );
            }
            Ok(())
        }
        Err(err) => {
            for file in &err.completed {
                println!(
                    "✅ Generated {} code in {}",
                    file.extension,
                    file.path.display()
                );
            }
            Err(err).context("Error generating code")
        }
    }
}

fn dry_run_templates(schema: &Schema, templates: &[PathBuf], output: &Path) -> Result<()> {
    let generator = Generator::new();
    for template in templates {
        let source = read_template(template)?;
        let name = template.display().to_string();
        let rendered = generator
            .render(schema, &name, &source, output)
            .with_context(|| format!("Error generating code from template {name}"))?;
        println!(
            "🔍 Would generate {} code in {} ({} bytes)",
            rendered.metadata.extension,
            rendered.path.display(),
            rendered.contents.len()
        );
    }
    Ok(())
}
