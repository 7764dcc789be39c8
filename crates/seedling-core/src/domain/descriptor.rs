//! Package descriptor (`package.json`) customization.

use std::path::Path;

use serde_json::Value;

use super::DomainError;

const FALLBACK_NAME: &str = "app";

/// Derive an npm-compatible package name from the target directory.
///
/// Lower-cases the final path segment, replaces anything outside
/// `[a-z0-9-._~]` with `-`, and strips leading `.`/`_`.
pub fn package_name_for(target: &Path) -> String {
    let raw = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let sanitized: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' => c,
            _ => '-',
        })
        .collect();

    let trimmed = sanitized.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Set the `name` field of a `package.json` document.
///
/// Key order is preserved; output is pretty-printed with a trailing newline.
pub fn customize_package_json(text: &str, name: &str) -> Result<String, DomainError> {
    let mut document: Value = serde_json::from_str(text)
        .map_err(|e| DomainError::InvalidDescriptor(format!("not valid JSON: {e}")))?;

    let object = document
        .as_object_mut()
        .ok_or_else(|| DomainError::InvalidDescriptor("top-level value must be an object".into()))?;
    object.insert("name".into(), Value::String(name.to_owned()));

    let mut out = serde_json::to_string_pretty(&document)
        .map_err(|e| DomainError::InvalidDescriptor(format!("failed to serialize: {e}")))?;
    out.push('\n');
    Ok(out)
}
