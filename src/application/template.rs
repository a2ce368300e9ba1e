//! `{{name}}` placeholder expansion.
//!
//! Whitespace inside the braces is ignored and a single leading `.` is
//! accepted, so `{{ .token }}` and `{{token}}` are the same placeholder.
//! Every placeholder must name a resolved variable; substituted values are
//! inserted as-is and never scanned again.

use crate::application::variables::ResolvedVariables;
use crate::domain::errors::TemplateError;
use once_cell::sync::Lazy;
use regex::Regex;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("Failed to compile variable name regex"));

/// Expands every placeholder in `template` with its value from `vars`
///
/// # Errors
/// * `TemplateError::Unclosed` - a `{{` has no matching `}}`
/// * `TemplateError::Empty` - `{{}}` or only whitespace between the braces
/// * `TemplateError::InvalidName` - the placeholder is not a plain name
/// * `TemplateError::UndefinedVariable` - the name is not in `vars`
pub fn expand(template: &str, vars: &ResolvedVariables) -> Result<String, TemplateError> {
    if !template.contains(OPEN) {
        return Ok(template.to_string());
    }

    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        result.push_str(&rest[..start]);

        let open_at = offset + start;
        let inner = &rest[start + OPEN.len()..];
        let end = inner
            .find(CLOSE)
            .ok_or(TemplateError::Unclosed { offset: open_at })?;
        let content = &inner[..end];
        if content.contains(OPEN) {
            return Err(TemplateError::Unclosed { offset: open_at });
        }

        let name = placeholder_name(content, open_at)?;
        let value = vars
            .get(name)
            .ok_or_else(|| TemplateError::UndefinedVariable {
                name: name.to_string(),
            })?;
        result.push_str(value);

        let consumed = start + OPEN.len() + end + CLOSE.len();
        rest = &rest[consumed..];
        offset += consumed;
    }

    result.push_str(rest);
    Ok(result)
}

fn placeholder_name(content: &str, offset: usize) -> Result<&str, TemplateError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(TemplateError::Empty { offset });
    }

    let name = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if !NAME_REGEX.is_match(name) {
        return Err(TemplateError::InvalidName {
            content: trimmed.to_string(),
        });
    }
    Ok(name)
}
