//! Calendar months, date parsing and date serialization.

use std::fmt::Display;

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use time_tz::Tz;

use crate::{
    Error,
    timezone::{local_midnight, to_local},
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const MONTH_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]");

/// A calendar month, e.g. May 2024.
///
/// Internally this is the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(Date);

impl Month {
    /// Parse a month from `YYYY-MM`.
    ///
    /// A full date (`YYYY-MM-DD`, optionally followed by a time) is also
    /// accepted, in which case the day and time are ignored.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `text` is not a valid month.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let trimmed = text.trim();

        let date = if trimmed.len() == 7 {
            Date::parse(&format!("{trimmed}-01"), DATE_FORMAT).ok()
        } else {
            parse_date_prefix(trimmed)
        };

        date.map(Self::containing)
            .ok_or_else(|| Error::InvalidMonth(text.to_owned()))
    }

    /// Parse an optional month query parameter, treating an empty string as no month.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `text` is given but is not a valid month.
    pub fn parse_optional(text: Option<&str>) -> Result<Option<Self>, Error> {
        match text.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => Self::parse(text).map(Some),
        }
    }

    /// The month that `date` falls in.
    pub fn containing(date: Date) -> Self {
        Self(date.replace_day(1).unwrap_or(date))
    }

    /// The month it currently is in `timezone`.
    pub fn current(timezone: &Tz) -> Self {
        Self::containing(to_local(OffsetDateTime::now_utc(), timezone).date())
    }

    /// The first day of the month.
    pub fn first_day(self) -> Date {
        self.0
    }

    /// The month after this one.
    pub fn next(self) -> Self {
        let (year, month) = match self.0.month() {
            time::Month::December => (self.0.year() + 1, time::Month::January),
            month => (self.0.year(), month.next()),
        };

        Date::from_calendar_date(year, month, 1)
            .map(Self)
            .unwrap_or(Self(Date::MAX))
    }

    /// The month before this one.
    pub fn previous(self) -> Self {
        let (year, month) = match self.0.month() {
            time::Month::January => (self.0.year() - 1, time::Month::December),
            month => (self.0.year(), month.previous()),
        };

        Date::from_calendar_date(year, month, 1)
            .map(Self)
            .unwrap_or(self)
    }

    /// The half-open range of calendar dates `[first day, first day of next month)`.
    pub fn date_range(self) -> (Date, Date) {
        (self.0, self.next().0)
    }

    /// The half-open range of UTC instants covering this month in `timezone`.
    ///
    /// The range starts at local midnight on the first of the month and ends
    /// at local midnight on the first of the next month. Each end uses the
    /// offset in effect on its own day.
    pub fn utc_range(self, timezone: &Tz) -> (OffsetDateTime, OffsetDateTime) {
        let (start, end) = self.date_range();

        (local_midnight(start, timezone), local_midnight(end, timezone))
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.format(MONTH_FORMAT) {
            Ok(text) => write!(f, "{text}"),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

/// Parse a calendar date from `YYYY-MM-DD`.
///
/// Date-times such as `2024-05-17T09:30:00Z` are accepted and truncated to
/// their date, which matches what HTML date inputs and JSON clients send.
///
/// # Errors
/// Returns [Error::InvalidField] naming `field` if `text` is not a date.
pub(crate) fn parse_date(text: &str, field: &'static str) -> Result<Date, Error> {
    parse_date_prefix(text.trim()).ok_or_else(|| Error::InvalidField {
        field,
        reason: format!("\"{text}\" is not a valid date, expected the format YYYY-MM-DD"),
    })
}

fn parse_date_prefix(text: &str) -> Option<Date> {
    let date_part = match text.len() {
        10 => text,
        len if len > 10 && text.is_char_boundary(10) => {
            let (date_part, rest) = text.split_at(10);
            if !rest.starts_with(['T', ' ']) {
                return None;
            }
            date_part
        }
        _ => return None,
    };

    Date::parse(date_part, DATE_FORMAT).ok()
}

/// Parse a point in time from an RFC 3339 timestamp, e.g. `2024-05-17T09:30:00Z`.
///
/// A bare date is read as midnight UTC on that day. The result is always in UTC.
///
/// # Errors
/// Returns [Error::InvalidField] naming `field` if `text` is neither.
pub(crate) fn parse_timestamp(text: &str, field: &'static str) -> Result<OffsetDateTime, Error> {
    let trimmed = text.trim();

    OffsetDateTime::parse(trimmed, &Rfc3339)
        .ok()
        .or_else(|| {
            Date::parse(trimmed, DATE_FORMAT)
                .ok()
                .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc())
        })
        .ok_or_else(|| Error::InvalidField {
            field,
            reason: format!("\"{text}\" is not a valid timestamp, expected RFC 3339"),
        })?
        .checked_to_offset(UtcOffset::UTC)
        .ok_or_else(|| Error::InvalidField {
            field,
            reason: format!("\"{text}\" is out of range, it must fall before the year 10000 in UTC"),
        })
}

/// Format a date as `YYYY-MM-DD`.
pub(crate) fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Serde support for [Date] fields written as `YYYY-MM-DD`.
///
/// Use with `#[serde(with = "iso_date")]`, or `iso_date::option` for `Option<Date>`.
pub(crate) mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use time::Date;

    use super::{DATE_FORMAT, format_date};

    pub(crate) fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*date))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;

        Date::parse(&text, DATE_FORMAT)
            .map_err(|error| D::Error::custom(format!("invalid date \"{text}\": {error}")))
    }

    pub(crate) mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        pub(crate) fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] Date);

            Option::<Wrapper>::deserialize(deserializer).map(|date| date.map(|Wrapper(date)| date))
        }
    }
}


#[cfg(test)]
mod parse_date_tests {
    use time::macros::{date, datetime};

    use crate::Error;

    use super::{format_date, iso_date, parse_date, parse_timestamp};

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_date("2024-05-17", "start_date"), Ok(date!(2024 - 05 - 17)));
    }

    #[test]
    fn parses_date_time_as_date() {
        assert_eq!(
            parse_date("2024-05-17T23:59:59Z", "start_date"),
            Ok(date!(2024 - 05 - 17))
        );
    }

    #[test]
    fn rejects_garbage_with_field_name() {
        let result = parse_date("yesterday", "start_date");

        assert!(matches!(
            result,
            Err(Error::InvalidField {
                field: "start_date",
                ..
            })
        ));
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_date(date!(2024 - 01 - 02)), "2024-01-02");
    }

    #[test]
    fn parses_timestamp_in_utc() {
        assert_eq!(
            parse_timestamp("2024-05-17T12:30:00+03:00", "completed_at"),
            Ok(datetime!(2024-05-17 09:30 UTC))
        );
        assert_eq!(
            parse_timestamp("2024-05-17", "completed_at"),
            Ok(datetime!(2024-05-17 00:00 UTC))
        );
        assert!(parse_timestamp("soon", "completed_at").is_err());
    }

    #[test]
    fn rejects_timestamp_past_the_last_utc_year() {
        let result = parse_timestamp("9999-12-31T23:00:00-05:00", "completed_at");

        assert!(matches!(
            result,
            Err(Error::InvalidField {
                field: "completed_at",
                ..
            })
        ));
    }

    #[test]
    fn iso_date_round_trips_through_json() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Row {
            #[serde(with = "iso_date")]
            start_date: time::Date,
            #[serde(with = "iso_date::option")]
            end_date: Option<time::Date>,
        }

        let row = Row {
            start_date: date!(2024 - 01 - 05),
            end_date: None,
        };

        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json, serde_json::json!({"start_date": "2024-01-05", "end_date": null}));
        assert_eq!(serde_json::from_value::<Row>(json).unwrap(), row);
    }
}
