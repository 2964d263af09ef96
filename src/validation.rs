//! Form validation and sanitization pipeline
//!
//! A submitted form goes through four steps, always in this order:
//!
//! 1. normalize: trim text fields, turn falsy optional values into `None`
//! 2. validate: derived `validator` rules plus [`FormInput::check`]; every
//!    failing rule is kept, not only the first one
//! 3. sanitize: escape markup and coerce dates, whatever the outcome of 2
//! 4. report: the sanitized value together with the ordered error list
//!
//! An optional field that is absent (missing or empty) skips its format
//! rules entirely.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Outcome of running a form through the pipeline
#[derive(Debug, Clone)]
pub struct Submission<T> {
    pub value: T,
    pub errors: Vec<FieldError>,
}

impl<T> Submission<T> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record a failure found after the pipeline ran (e.g. a dangling reference)
    pub fn reject(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }
}

/// A raw form body that can be validated and turned into typed input
pub trait FormInput: Validate {
    type Output;

    /// Field names in form order; errors are reported in this order
    const FIELDS: &'static [&'static str];

    fn normalize(&mut self);

    /// Rules the derived validators cannot express
    fn check(&self, _errors: &mut ValidationErrors) {}

    fn sanitize(&self) -> Self::Output;
}

/// Run a form through normalize, validate and sanitize
pub fn process<F: FormInput>(mut form: F) -> Submission<F::Output> {
    form.normalize();

    let mut errors = match form.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    form.check(&mut errors);

    Submission {
        value: form.sanitize(),
        errors: ordered(F::FIELDS, &errors),
    }
}

fn ordered(fields: &[&'static str], errors: &ValidationErrors) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    let mut list = Vec::new();
    for field in fields {
        if let Some(failures) = by_field.get(*field) {
            for failure in failures.iter() {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                list.push(FieldError::new(field, &message));
            }
        }
    }
    list
}

/// Add a failure for `field` to a derived error set
pub fn add_error(errors: &mut ValidationErrors, field: &'static str, code: &'static str, message: &'static str) {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    errors.add(field, error);
}

/// Optional text is absent when missing or empty
pub fn falsy_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Date-or-absent rule: absent passes, present must be ISO-8601
pub fn check_optional_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    message: &'static str,
) {
    if let Some(raw) = value {
        if parse_iso8601(raw).is_none() {
            add_error(errors, field, "iso8601", message);
        }
    }
}

/// Parse an ISO-8601 calendar date, or a datetime whose date part is kept
pub fn parse_iso8601(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| datetime.date())
}

/// Coerce an optional raw date; anything unparseable becomes `None`
pub fn to_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(parse_iso8601)
}

const ENTITIES: [(char, &str); 8] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
    ('/', "&#x2F;"),
    ('\\', "&#x5C;"),
    ('`', "&#96;"),
];

/// Replace markup-significant characters with HTML entities.
///
/// An ampersand that already starts one of these entities is kept, so
/// escaping escaped text changes nothing. The flip side: a typed `&amp;`
/// and a bare `&` store the same text, so names differing only that way
/// count as duplicates.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (idx, c) in value.char_indices() {
        if c == '&' && ENTITIES.iter().any(|(_, e)| value[idx..].starts_with(e)) {
            out.push('&');
            continue;
        }
        match ENTITIES.iter().find(|(raw, _)| *raw == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;&#x2F;b&gt;");
        assert_eq!(escape("O'Brien"), "O&#x27;Brien");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_escape_is_idempotent() {
        for raw in ["Science & Fiction", "<script>", "a/b\\c", "`q`\"", "&amp;&lt;", "&nbsp;"] {
            let once = escape(raw);
            assert_eq!(escape(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_typed_entity_matches_bare_ampersand() {
        assert_eq!(escape("Tom &amp; Jerry"), escape("Tom & Jerry"));
    }

    #[test]
    fn test_unknown_entity_is_escaped() {
        assert_eq!(escape("&nbsp;"), "&amp;nbsp;");
    }

    #[test]
    fn test_parse_iso8601() {
        assert_eq!(parse_iso8601("1775-12-16"), NaiveDate::from_ymd_opt(1775, 12, 16));
        assert_eq!(
            parse_iso8601("1817-07-18T10:30:00Z"),
            NaiveDate::from_ymd_opt(1817, 7, 18)
        );
        assert_eq!(parse_iso8601("2020-01-02T08:15"), NaiveDate::from_ymd_opt(2020, 1, 2));
        assert_eq!(parse_iso8601("2020-02-30"), None);
        assert_eq!(parse_iso8601("yesterday"), None);
        assert_eq!(parse_iso8601(""), None);
    }

    #[test]
    fn test_falsy_is_absent() {
        assert_eq!(falsy_to_none(Some(String::new())), None);
        assert_eq!(falsy_to_none(None), None);
        assert_eq!(falsy_to_none(Some("1990-01-01".into())), Some("1990-01-01".into()));
    }

    #[test]
    fn test_optional_date_rule() {
        let mut errors = ValidationErrors::new();
        check_optional_date(&mut errors, "due_back", None, "Invalid date");
        check_optional_date(&mut errors, "due_back", Some("2024-05-01"), "Invalid date");
        assert!(errors.is_empty());

        check_optional_date(&mut errors, "due_back", Some("soon"), "Invalid date");
        assert_eq!(
            ordered(&["due_back"], &errors),
            vec![FieldError::new("due_back", "Invalid date")]
        );
    }
}
