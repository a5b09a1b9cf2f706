use chrono::{NaiveDate, NaiveDateTime};

/// Wire format of `publish_date`.
pub const PUBLISH_DATE_FORMAT: &str = "%d/%m/%Y - %H:%M";
const DATE_ONLY_FORMAT: &str = "%d/%m/%Y";
const DISPLAY_FORMAT: &str = "%B %-d, %Y";

/// Calendar date of a `DD/MM/YYYY - HH:MM` string. A bare `DD/MM/YYYY` is accepted too.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, PUBLISH_DATE_FORMAT)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT))
        .ok()
}

/// Display text for a publish date. Unparseable input is shown as is; a missing date
/// has no display text.
pub fn format_publish_date(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    Some(match parse_publish_date(raw) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    })
}
