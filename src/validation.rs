//! Checks shared by the create/update payloads of every record type.
//!
//! All of these run before the database is touched.

use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, database_id::DatabaseId};

/// The minimum number of characters for names, sources and similar text fields.
pub(crate) const MIN_NAME_LENGTH: usize = 2;

/// Unwrap a required value.
///
/// # Errors
/// Returns [Error::MissingField] if `value` is `None`.
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or(Error::MissingField(field))
}

/// Unwrap a required reference to another record.
///
/// IDs start at 1, so zero and negative IDs are treated as "nothing selected".
///
/// # Errors
/// Returns [Error::MissingField] if `value` is `None` or not a positive integer.
pub(crate) fn required_id(
    value: Option<DatabaseId>,
    field: &'static str,
) -> Result<DatabaseId, Error> {
    match value {
        Some(id) if id >= 1 => Ok(id),
        _ => Err(Error::MissingField(field)),
    }
}

/// Trim a required text field and check it has at least `min_length` characters.
///
/// Characters are counted as grapheme clusters, so "Zoë" has three.
///
/// # Errors
/// Returns [Error::MissingField] if the text is missing or blank, or
/// [Error::InvalidField] if it is too short.
pub(crate) fn required_text(
    value: Option<String>,
    field: &'static str,
    min_length: usize,
) -> Result<String, Error> {
    let text = value.as_deref().map(str::trim).unwrap_or_default();

    if text.is_empty() {
        return Err(Error::MissingField(field));
    }

    if text.graphemes(true).count() < min_length {
        return Err(Error::InvalidField {
            field,
            reason: format!("must be at least {min_length} characters"),
        });
    }

    Ok(text.to_owned())
}

/// Trim an optional text field, treating blank text as absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Check that `value` is a finite number no less than `minimum`.
///
/// # Errors
/// Returns [Error::InvalidField] otherwise.
pub(crate) fn at_least(value: f64, minimum: f64, field: &'static str) -> Result<f64, Error> {
    if !value.is_finite() || value < minimum {
        return Err(Error::InvalidField {
            field,
            reason: format!("must be {minimum} or greater"),
        });
    }

    Ok(value)
}

/// Check that `value` is a finite number strictly greater than `minimum`.
///
/// # Errors
/// Returns [Error::InvalidField] otherwise.
pub(crate) fn greater_than(value: f64, minimum: f64, field: &'static str) -> Result<f64, Error> {
    if !value.is_finite() || value <= minimum {
        return Err(Error::InvalidField {
            field,
            reason: format!("must be greater than {minimum}"),
        });
    }

    Ok(value)
}

/// Parse a value from a list of allowed options.
///
/// # Errors
/// Returns [Error::MissingField] for blank text and [Error::InvalidField]
/// listing the `allowed` values if `parse` fails.
pub(crate) fn required_choice<T>(
    value: Option<String>,
    field: &'static str,
    allowed: &[&str],
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, Error> {
    let text = value.as_deref().map(str::trim).unwrap_or_default();

    if text.is_empty() {
        return Err(Error::MissingField(field));
    }

    parse(text).ok_or_else(|| Error::InvalidField {
        field,
        reason: format!("\"{text}\" is not one of {}", allowed.join(", ")),
    })
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{
        MIN_NAME_LENGTH, at_least, greater_than, optional_text, required, required_choice,
        required_id, required_text,
    };

    #[test]
    fn required_rejects_none() {
        assert_eq!(required::<i64>(None, "amount"), Err(Error::MissingField("amount")));
        assert_eq!(required(Some(1), "amount"), Ok(1));
    }

    #[test]
    fn required_id_rejects_zero() {
        assert_eq!(
            required_id(Some(0), "category_id"),
            Err(Error::MissingField("category_id"))
        );
        assert_eq!(required_id(Some(7), "category_id"), Ok(7));
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(
            required_text(Some("  Rent ".to_owned()), "name", MIN_NAME_LENGTH),
            Ok("Rent".to_owned())
        );
    }

    #[test]
    fn required_text_rejects_blank() {
        assert_eq!(
            required_text(Some(" \t".to_owned()), "name", MIN_NAME_LENGTH),
            Err(Error::MissingField("name"))
        );
    }

    #[test]
    fn required_text_rejects_short_text() {
        assert!(matches!(
            required_text(Some("A".to_owned()), "name", MIN_NAME_LENGTH),
            Err(Error::InvalidField { field: "name", .. })
        ));
    }

    #[test]
    fn required_text_counts_graphemes() {
        // A single family emoji is several code points but one character.
        assert!(required_text(Some("👨‍👩‍👧".to_owned()), "name", MIN_NAME_LENGTH).is_err());
        assert!(required_text(Some("👨‍👩‍👧!".to_owned()), "name", MIN_NAME_LENGTH).is_ok());
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(Some("   ".to_owned())), None);
        assert_eq!(optional_text(Some(" milk ".to_owned())), Some("milk".to_owned()));
    }

    #[test]
    fn lower_bounds() {
        assert_eq!(at_least(0.0, 0.0, "estimated_price"), Ok(0.0));
        assert!(at_least(-0.01, 0.0, "estimated_price").is_err());
        assert!(at_least(f64::NAN, 0.0, "estimated_price").is_err());

        assert_eq!(greater_than(0.01, 0.0, "amount"), Ok(0.01));
        assert!(greater_than(0.0, 0.0, "amount").is_err());
        assert!(greater_than(f64::INFINITY, 0.0, "amount").is_err());
    }

    #[test]
    fn required_choice_lists_allowed_values() {
        let parse = |text: &str| (text == "yes").then_some(true);

        assert_eq!(required_choice(Some("yes".to_owned()), "answer", &["yes"], parse), Ok(true));
        assert_eq!(
            required_choice(Some("no".to_owned()), "answer", &["yes"], parse),
            Err(Error::InvalidField {
                field: "answer",
                reason: "\"no\" is not one of yes".to_owned()
            })
        );
        assert_eq!(
            required_choice(None, "answer", &["yes"], parse),
            Err(Error::MissingField("answer"))
        );
    }
}
