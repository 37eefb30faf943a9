use std::path::{Path, PathBuf};

/// Destination file name: `lowercase(schema_name) + suffix + "." + extension`.
///
/// ```
/// use idlforge::generator::output_filename;
///
/// assert_eq!(output_filename("UserService", "_client", "go"), "userservice_client.go");
/// assert_eq!(output_filename("User", "", "py"), "user.py");
/// ```
pub fn output_filename(schema_name: &str, suffix: &str, extension: &str) -> String {
    format!("{}{}.{}", schema_name.to_lowercase(), suffix, extension)
}

/// Destination path inside `output_dir`. No collision detection happens here.
pub fn output_path(output_dir: &Path, schema_name: &str, suffix: &str, extension: &str) -> PathBuf {
    output_dir.join(output_filename(schema_name, suffix, extension))
}
