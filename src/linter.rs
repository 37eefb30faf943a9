//! # Schema Linter
//!
//! Advisory checks run by `idlforge validate`. Loading a schema already
//! enforces the hard invariants (names, field types, method types); the linter
//! only reports things that usually point at a typo or an unfinished schema.
//!
//! ## Checks Performed
//!
//! 1. **Unresolved types** (`unresolved_type`, warning) - a field type, with any
//!    leading `[]` stripped, or a method input/output that is neither a
//!    primitive nor a message defined in the schema
//! 2. **Empty messages** (`empty_message`, info) - a message without fields
//! 3. **Empty services** (`empty_service`, info) - a service without methods
//!
//! ## Usage
//!
//! ```rust,no_run
//! use idlforge::linter::{lint_file, print_lint_issues};
//!
//! # fn main() -> Result<(), idlforge::error::IdlError> {
//! let issues = lint_file("schema.yaml")?;
//! print_lint_issues(&issues);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::error::IdlError;
use crate::idl::{parse_file, Schema};


/// Type tokens every target language is expected to map.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "string", "int", "int32", "int64", "float", "float32", "float64", "bool", "byte", "bytes",
];

/// Prefix marking a list type in field type tokens.
const LIST_PREFIX: &str = "[]";

/// Severity level for lint issues
///
/// Load failures are reported as [`IdlError`], never as lint issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// Warning - generation works but the output is likely wrong
    Warning,
    /// Info - an unfinished or unusual schema
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        };
        f.write_str(label)
    }
}

/// A lint issue found in a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    /// Where the issue occurred (e.g. "User.email", "UserService.GetUser")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g. "unresolved_type")
    pub kind: String,
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Whether `ty` names a primitive or one of the `defined` messages.
///
/// A leading `[]` is ignored, so `[]User` resolves when `User` does.
pub fn is_known_type(ty: &str, defined: &BTreeSet<&str>) -> bool {
    let base = ty.strip_prefix(LIST_PREFIX).unwrap_or(ty);
    PRIMITIVE_TYPES.contains(&base) || defined.contains(base)
}

/// Lint an already loaded schema.
///
/// Issues are reported messages first, then services, each in name order.
pub fn lint_schema(schema: &Schema) -> Vec<LintIssue> {
    let defined: BTreeSet<&str> = schema.messages.iter().map(|m| m.name.as_str()).collect();
    let mut issues = Vec::new();

    for message in &schema.messages {
        if message.fields.is_empty() {
            issues.push(
                LintIssue::new(
                    message.name.as_str(),
                    LintSeverity::Info,
                    "empty_message",
                    format!("message {} has no fields", message.name),
                )
                .with_suggestion("Add fields or remove the message"),
            );
        }
        for (field_name, field) in &message.fields {
            if !is_known_type(&field.ty, &defined) {
                issues.push(unresolved(
                    format!("{}.{}", message.name, field_name),
                    &field.ty,
                ));
            }
        }
    }

    for service in &schema.services {
        if service.methods.is_empty() {
            issues.push(LintIssue::new(
                service.name.as_str(),
                LintSeverity::Info,
                "empty_service",
                format!("service {} has no methods", service.name),
            ));
        }
        for method in &service.methods {
            let location = format!("{}.{}", service.name, method.name);
            for ty in [&method.input, &method.output] {
                if !ty.is_empty() && !is_known_type(ty, &defined) {
                    issues.push(unresolved(location.clone(), ty));
                }
            }
        }
    }

    issues
}

fn unresolved(location: String, ty: &str) -> LintIssue {
    LintIssue::new(
        location,
        LintSeverity::Warning,
        "unresolved_type",
        format!("type '{ty}' is neither a primitive nor a defined message"),
    )
    .with_suggestion(format!(
        "Define a message named '{}' or use one of: {}",
        ty.strip_prefix(LIST_PREFIX).unwrap_or(ty),
        PRIMITIVE_TYPES.join(", ")
    ))
}

/// Load a schema file and lint it.
///
/// Hard invariant violations surface as [`IdlError`], not as lint issues.
pub fn lint_file(path: impl AsRef<Path>) -> Result<Vec<LintIssue>, IdlError> {
    let schema = parse_file(path)?;
    Ok(lint_schema(&schema))
}

/// Whether any issue is a warning.
pub fn has_warnings(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Warning)
}

/// Print lint issues grouped by severity.
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let count = |severity| issues.iter().filter(|i| i.severity == severity).count();
    println!("\n📋 Lint Results:");
    println!(
        "   {} warning(s), {} info(s)\n",
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );

    for (severity, heading) in [
        (LintSeverity::Warning, "⚠️  Warnings (should fix):"),
        (LintSeverity::Info, "ℹ️  Info:"),
    ] {
        let group: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        println!("{heading}");
        for issue in group {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {}", suggestion);
            }
        }
        println!();
    }
}
