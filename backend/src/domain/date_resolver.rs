//! Date resolution for day boards.
//!
//! Boards are identified by local calendar dates written as `YYYY-MM-DD`.
//! Every date value produced here sits at 12:00 local time, so adding or
//! subtracting whole days can never land on the neighbouring calendar day
//! when a daylight-saving change happens around midnight.

use chrono::{DateTime, Datelike, Days, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use shared::DateIdentifier;
use tracing::warn;

/// Weekday names indexed from Sunday
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Title given to the board of the base date itself
pub const TODAY_TITLE: &str = "Today";

fn midday() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

/// The given calendar date at local midday in `tz`
pub fn at_midday<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let naive = date.and_time(midday());
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz.from_utc_datetime(&naive),
    }
}

/// Format the local calendar fields of `date`
pub fn to_identifier<Tz: TimeZone>(date: &DateTime<Tz>) -> DateIdentifier {
    DateIdentifier::new(date.date_naive())
}

/// Parse an identifier into a local midday date, `None` if malformed
pub fn from_identifier(text: &str) -> Option<DateTime<Local>> {
    from_identifier_in(&Local, text)
}

pub fn from_identifier_in<Tz: TimeZone>(tz: &Tz, text: &str) -> Option<DateTime<Tz>> {
    let identifier = DateIdentifier::parse(text).ok()?;
    Some(at_midday(tz, identifier.date()))
}

/// Move `date` by `days` calendar days (negative goes back), normalising the
/// time to midday. Out-of-range results keep the original calendar date.
pub fn add_days<Tz: TimeZone>(date: &DateTime<Tz>, days: i64) -> DateTime<Tz> {
    let tz = date.timezone();
    let start = date.date_naive();
    let step = Days::new(days.unsigned_abs());
    let target = if days >= 0 {
        start.checked_add_days(step)
    } else {
        start.checked_sub_days(step)
    };

    match target {
        Some(target) => at_midday(&tz, target),
        None => {
            warn!("Cannot move {} by {} days; keeping the original date", start, days);
            at_midday(&tz, start)
        }
    }
}

/// Today's identifier in the local timezone
pub fn default_base_date() -> DateIdentifier {
    to_identifier(&Local::now())
}

/// Parse a base date handed in from navigation, falling back to today
pub fn base_or_today(text: Option<&str>) -> DateIdentifier {
    match text.map(DateIdentifier::parse) {
        Some(Ok(identifier)) => identifier,
        Some(Err(e)) => {
            warn!("Ignoring base date: {}. Using today.", e);
            default_base_date()
        }
        None => default_base_date(),
    }
}

/// Identifier of the day `day_offset` days after `base`
pub fn target_identifier(base: DateIdentifier, day_offset: u32) -> DateIdentifier {
    let anchored = at_midday(&Local, base.date());
    to_identifier(&add_days(&anchored, i64::from(day_offset)))
}

/// English weekday name, "Day" if it cannot be resolved
pub fn weekday_name(date: NaiveDate) -> &'static str {
    DAY_NAMES
        .get(date.weekday().num_days_from_sunday() as usize)
        .copied()
        .unwrap_or("Day")
}

/// "Today" for offset 0, otherwise the weekday of the target date
pub fn default_title(target: DateIdentifier, day_offset: u32) -> String {
    if day_offset == 0 {
        TODAY_TITLE.to_string()
    } else {
        weekday_name(target.date()).to_string()
    }
}
