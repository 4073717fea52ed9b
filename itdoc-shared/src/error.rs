/// Field-level validation issues
///
/// Request bodies are validated with `validator` before any store access.
/// A failed validation is flattened into a list of [`FieldIssue`]s so the
/// client can highlight each offending field.

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// A single validation failure attached to one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Field that failed validation
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flattens `validator` errors into field issues, sorted by field name
pub fn field_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldIssue {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    issues.sort_by(|a, b| a.field.cmp(&b.field));
    issues
}
