//! Template interpolation

use super::parser::{field_references, FIELD_REFERENCE};
use crate::record::Record;
use regex::Captures;

/// Resolve a template into a concrete prompt using a record's field values
///
/// Field names are matched case-insensitively. A reference to a field the
/// record does not have is replaced with the empty string. Text outside the
/// `{{...}}` delimiters is left exactly as written.
pub fn interpolate(template: &str, record: &Record) -> String {
    let fields: Vec<String> = field_references(template).collect();
    let values = record.lowercase_fields();

    // Make every reference case-uniform before substituting
    let mut prompt = FIELD_REFERENCE
        .replace_all(template, |caps: &Captures| {
            format!("{{{{{}}}}}", caps[1].to_lowercase())
        })
        .into_owned();

    for field in &fields {
        let value = values.get(field).map(String::as_str).unwrap_or("");
        prompt = prompt.replace(&format!("{{{{{}}}}}", field), value);
    }

    log::debug!("Processed prompt: {}", prompt);
    prompt
}
