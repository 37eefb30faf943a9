use minijinja::{ErrorKind, Template};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::GenerateError;

/// Name of the block a template uses to declare its generation parameters.
pub const METADATA_BLOCK: &str = "metadata";

/// Generation parameters a template declares about itself.
///
/// Rendered by the template's `metadata` block as JSON. Templates wrap the
/// block in `{% if false %}` so it stays out of the body output:
///
/// ```jinja
/// {% if false %}{% block metadata %}{"extension": "go", "outputFileSuffix": "_client", "typeMapping": {"int": "int64"}}{% endblock %}{% endif %}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    /// Output file extension, without the leading dot. Required.
    #[serde(default)]
    pub extension: String,
    /// Appended to the lowercased schema name before the extension.
    #[serde(default)]
    pub output_file_suffix: String,
    /// Schema type token → target-language type token.
    #[serde(default)]
    pub type_mapping: BTreeMap<String, String>,
}

/// Run the metadata pass over an already parsed template.
///
/// Only the `metadata` block is rendered, against an empty context. The body
/// is never evaluated and no file system access happens here.
///
/// # Errors
///
/// - [`GenerateError::MissingMetadata`] if no `metadata` block is defined
/// - [`GenerateError::RenderMetadata`] if rendering the block fails
/// - [`GenerateError::MetadataJson`] / [`GenerateError::MissingExtension`] from [`parse_metadata`]
pub fn extract_metadata(template: &Template<'_, '_>) -> Result<TemplateMetadata, GenerateError> {
    let mut state = template.new_state();
    let rendered = state
        .render_block(METADATA_BLOCK)
        .map_err(|err| match err.kind() {
            ErrorKind::UnknownBlock => GenerateError::MissingMetadata,
            _ => GenerateError::RenderMetadata(err),
        })?;
    parse_metadata(&rendered)
}

/// Parse the text a `metadata` block rendered.
///
/// Blank output decodes to empty metadata, which then fails the extension
/// check like any other record without an extension.
pub fn parse_metadata(rendered: &str) -> Result<TemplateMetadata, GenerateError> {
    let json = rendered.trim();
    let metadata = if json.is_empty() {
        TemplateMetadata::default()
    } else {
        serde_json::from_str(json).map_err(GenerateError::MetadataJson)?
    };
    if metadata.extension.is_empty() {
        return Err(GenerateError::MissingExtension);
    }
    Ok(metadata)
}
