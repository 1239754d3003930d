// src/utils/validate.rs

use validator::{ValidationErrors, ValidationErrorsKind};

/// Flattens a `ValidationErrors` tree into one human-readable message per
/// violated field. Nested lists (the questions of a quiz) are reported with
/// their index so a client can point at the offending entry. Every
/// violation is reported, not just the first.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_messages(errors, "", &mut messages);
    messages
}

fn collect_messages(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    match &error.message {
                        Some(message) => out.push(format!("{path}: {message}")),
                        None => out.push(format!("{path}: invalid value")),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
