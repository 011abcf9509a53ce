use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use time_tz::{Offset, TimeZone, Tz};

/// Look up a canonical timezone name such as "Africa/Nairobi".
///
/// Returns `None` if the timezone is not known.
pub fn get_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    time_tz::timezones::get_by_name(canonical_timezone)
}

/// The UTC offset in effect in `timezone` at `instant`.
pub(crate) fn offset_at(timezone: &Tz, instant: &OffsetDateTime) -> UtcOffset {
    timezone.get_offset_utc(instant).to_utc()
}

/// `instant` as seen on a wall clock in `timezone`.
///
/// Instants that cannot be shown in `timezone` because they fall outside the
/// supported range of years are returned unchanged.
pub(crate) fn to_local(instant: OffsetDateTime, timezone: &Tz) -> OffsetDateTime {
    instant
        .checked_to_offset(offset_at(timezone, &instant))
        .unwrap_or(instant)
}

/// The UTC instant of local midnight at the start of `date` in `timezone`.
///
/// The offset is resolved for that midnight, so days on either side of a
/// daylight saving change get their own offset. When midnight is skipped by a
/// daylight saving change, the instant the clocks jumped is used.
pub(crate) fn local_midnight(date: Date, timezone: &Tz) -> OffsetDateTime {
    let midnight = PrimitiveDateTime::new(date, Time::MIDNIGHT);

    // Guess with the offset at midnight UTC, then correct with the offset at the guess.
    let guess = midnight.assume_offset(offset_at(timezone, &midnight.assume_utc()));
    let local = midnight.assume_offset(offset_at(timezone, &guess));

    local
        .checked_to_offset(UtcOffset::UTC)
        .unwrap_or_else(|| midnight.assume_utc())
}
