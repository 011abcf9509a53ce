//! Lenient deserializers for JSON request payloads.
//!
//! Clients send form values either as JSON numbers or as the strings taken
//! straight from an input element, so numeric fields accept both. Empty
//! strings and `null` are read as a missing value and left for validation to
//! reject.

use serde::{Deserialize, Deserializer, de::Error as _};

use crate::database_id::DatabaseId;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerOrText {
    Integer(i64),
    Text(String),
}

/// Deserialize a number that may be written as a JSON number or a numeric string.
pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(number)) => Ok(Some(number)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("\"{text}\" is not a number"))),
    }
}

/// Deserialize an integer that may be written as a JSON number or an integer string.
pub(crate) fn optional_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntegerOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntegerOrText::Integer(integer)) => Ok(Some(integer)),
        Some(IntegerOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(IntegerOrText::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("\"{text}\" is not a whole number"))),
    }
}

/// Deserialize a database ID that may be written as a JSON number or a string.
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<DatabaseId>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_integer(deserializer)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use crate::database_id::DatabaseId;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        #[serde(default, deserialize_with = "super::optional_id")]
        id: Option<DatabaseId>,
        #[serde(default, deserialize_with = "super::optional_number")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "super::optional_integer")]
        quantity: Option<i64>,
    }

    #[test]
    fn accepts_json_numbers() {
        let payload: Payload =
            serde_json::from_value(json!({"id": 3, "amount": 12.5, "quantity": 2})).unwrap();

        assert_eq!(
            payload,
            Payload {
                id: Some(3),
                amount: Some(12.5),
                quantity: Some(2)
            }
        );
    }

    #[test]
    fn coerces_numeric_strings() {
        let payload: Payload =
            serde_json::from_value(json!({"id": "3", "amount": " 12.50 ", "quantity": "2"}))
                .unwrap();

        assert_eq!(
            payload,
            Payload {
                id: Some(3),
                amount: Some(12.5),
                quantity: Some(2)
            }
        );
    }

    #[test]
    fn integer_amount_is_read_as_float() {
        let payload: Payload = serde_json::from_value(json!({"amount": 100})).unwrap();

        assert_eq!(payload.amount, Some(100.0));
    }

    #[test]
    fn blank_null_and_missing_are_none() {
        let payload: Payload =
            serde_json::from_value(json!({"id": null, "amount": ""})).unwrap();

        assert_eq!(
            payload,
            Payload {
                id: None,
                amount: None,
                quantity: None
            }
        );
    }

    #[test]
    fn rejects_non_numeric_strings() {
        let result = serde_json::from_value::<Payload>(json!({"amount": "lots"}));

        assert!(result.is_err());
    }

    #[test]
    fn rejects_fractional_id() {
        let result = serde_json::from_value::<Payload>(json!({"id": "1.5"}));

        assert!(result.is_err());
    }
}
