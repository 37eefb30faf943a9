use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::helpers;
use super::mapping::apply_type_mapping;
use super::metadata::{extract_metadata, TemplateMetadata};
use super::naming::output_path;
use crate::error::{GenerateError, RunError};
use crate::idl::{GeneratorMetadata, Schema};

/// Template environment settings shared by every template a [`Generator`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Drop the first newline after a block tag.
    pub trim_blocks: bool,
    /// Strip whitespace before a block tag at the start of a line.
    pub lstrip_blocks: bool,
    /// Keep the final newline of the template source.
    pub keep_trailing_newline: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            trim_blocks: true,
            lstrip_blocks: true,
            keep_trailing_newline: true,
        }
    }
}

/// Build the environment one template is parsed into.
///
/// Output is never escaped, and undefined values chain so templates can
/// navigate the opaque additional context without knowing its shape.
pub(crate) fn build_environment<'source>(options: &GeneratorOptions) -> Environment<'source> {
    let mut env = Environment::new();
    env.set_trim_blocks(options.trim_blocks);
    env.set_lstrip_blocks(options.lstrip_blocks);
    env.set_keep_trailing_newline(options.keep_trailing_newline);
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    helpers::register(&mut env);
    env
}

/// A file written by [`Generator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Template name or path the file was generated from.
    pub template: String,
    /// Destination path.
    pub path: PathBuf,
    /// Extension declared by the template's metadata.
    pub extension: String,
}

/// A file rendered in memory by [`Generator::render`], not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub template: String,
    pub path: PathBuf,
    pub metadata: TemplateMetadata,
    pub contents: String,
}

/// Generates one output file per (schema, template) pair.
///
/// Holds no state between calls; see [`GenerationRun`] for state scoped to a
/// multi-template run.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: GeneratorOptions) -> Self {
        Generator { options }
    }

    /// Render `source` against `schema` without touching the file system.
    ///
    /// Runs every step of [`generate`](Self::generate) except directory
    /// creation and the final write.
    pub fn render(
        &self,
        schema: &Schema,
        name: &str,
        source: &str,
        output_dir: &Path,
    ) -> Result<RenderedFile, GenerateError> {
        self.process(schema, name, source, output_dir, false)
    }

    /// Generate one file from template text.
    ///
    /// 1. extract the template's metadata (extension, suffix, type mapping)
    /// 2. clone the schema through the type mapping
    /// 3. create `output_dir` and its parents
    /// 4. name the file `lowercase(schema.name) + suffix + "." + extension`
    /// 5. stamp the path onto the clone's `generator_metadata`
    /// 6. render the body against the clone and write it, truncating any existing file
    ///
    /// The body is rendered in memory first, so a failing template never
    /// leaves a partial file behind.
    ///
    /// # Errors
    ///
    /// Returns the first [`GenerateError`] raised; its [`phase`](GenerateError::phase)
    /// tells which step failed.
    pub fn generate(
        &self,
        schema: &Schema,
        name: &str,
        source: &str,
        output_dir: &Path,
    ) -> Result<GeneratedFile, GenerateError> {
        let rendered = self.process(schema, name, source, output_dir, true)?;
        fs::write(&rendered.path, &rendered.contents).map_err(|source| {
            GenerateError::WriteOutput {
                path: rendered.path.clone(),
                source,
            }
        })?;
        info!(
            template = name,
            extension = %rendered.metadata.extension,
            path = %rendered.path.display(),
            "generated file"
        );
        Ok(GeneratedFile {
            template: rendered.template,
            path: rendered.path,
            extension: rendered.metadata.extension,
        })
    }

    /// Read a template file and [`generate`](Self::generate) from it.
    pub fn generate_file(
        &self,
        schema: &Schema,
        template_path: &Path,
        output_dir: &Path,
    ) -> Result<GeneratedFile, GenerateError> {
        let source = read_template(template_path)?;
        let name = template_path.display().to_string();
        self.generate(schema, &name, &source, output_dir)
    }

    /// Generate every template in order, stopping at the first failure.
    ///
    /// Files written before the failure stay on disk and are reported in
    /// [`RunError::completed`].
    pub fn run(
        &self,
        schema: &Schema,
        templates: &[PathBuf],
        output_dir: &Path,
    ) -> Result<Vec<GeneratedFile>, RunError> {
        let mut run = GenerationRun::new(self, output_dir);
        for template in templates {
            if let Err(source) = run.generate_file(schema, template) {
                return Err(RunError {
                    template: template.clone(),
                    completed: run.into_written(),
                    source,
                });
            }
        }
        Ok(run.into_written())
    }

    fn process(
        &self,
        schema: &Schema,
        name: &str,
        source: &str,
        output_dir: &Path,
        create_dir: bool,
    ) -> Result<RenderedFile, GenerateError> {
        let env = build_environment(&self.options);
        let template = env
            .template_from_named_str(name, source)
            .map_err(GenerateError::ParseTemplate)?;

        let metadata = extract_metadata(&template)?;
        debug!(
            template = name,
            extension = %metadata.extension,
            suffix = %metadata.output_file_suffix,
            mappings = metadata.type_mapping.len(),
            "extracted template metadata"
        );

        let mut transformed = apply_type_mapping(schema, &metadata.type_mapping)?;

        if create_dir {
            fs::create_dir_all(output_dir).map_err(|source| GenerateError::CreateDir {
                path: output_dir.to_path_buf(),
                source,
            })?;
        }

        let path = output_path(
            output_dir,
            &schema.name,
            &metadata.output_file_suffix,
            &metadata.extension,
        );
        transformed.generator_metadata = Some(GeneratorMetadata {
            output_file_path: path.to_string_lossy().into_owned(),
        });

        let contents = template
            .render(&transformed)
            .map_err(GenerateError::RenderBody)?;

        Ok(RenderedFile {
            template: name.to_string(),
            path,
            metadata,
            contents,
        })
    }
}

/// Read template text from disk.
pub fn read_template(path: &Path) -> Result<String, GenerateError> {
    fs::read_to_string(path).map_err(|source| GenerateError::ReadTemplate {
        path: path.to_path_buf(),
        source,
    })
}

/// State owned by one multi-template run.
///
/// Tracks every path written so far. A later template that lands on the same
/// path overwrites it (last writer wins) and the overwrite is logged.
#[derive(Debug)]
pub struct GenerationRun<'g> {
    generator: &'g Generator,
    output_dir: PathBuf,
    written: Vec<GeneratedFile>,
    emitted: BTreeSet<PathBuf>,
}

impl<'g> GenerationRun<'g> {
    pub fn new(generator: &'g Generator, output_dir: impl Into<PathBuf>) -> Self {
        GenerationRun {
            generator,
            output_dir: output_dir.into(),
            written: Vec::new(),
            emitted: BTreeSet::new(),
        }
    }

    /// Generate from template text and record the written path.
    pub fn generate(
        &mut self,
        schema: &Schema,
        name: &str,
        source: &str,
    ) -> Result<GeneratedFile, GenerateError> {
        let file = self
            .generator
            .generate(schema, name, source, &self.output_dir)?;
        Ok(self.record(file))
    }

    /// Generate from a template file and record the written path.
    pub fn generate_file(
        &mut self,
        schema: &Schema,
        template_path: &Path,
    ) -> Result<GeneratedFile, GenerateError> {
        let file = self
            .generator
            .generate_file(schema, template_path, &self.output_dir)?;
        Ok(self.record(file))
    }

    /// Whether `path` has been written earlier in this run.
    pub fn has_written(&self, path: &Path) -> bool {
        self.emitted.contains(path)
    }

    pub fn written(&self) -> &[GeneratedFile] {
        &self.written
    }

    pub fn into_written(self) -> Vec<GeneratedFile> {
        self.written
    }

    fn record(&mut self, file: GeneratedFile) -> GeneratedFile {
        if !self.emitted.insert(file.path.clone()) {
            warn!(
                template = %file.template,
                path = %file.path.display(),
                "output path already written in this run; overwriting"
            );
        }
        self.written.push(file.clone());
        file
    }
}
