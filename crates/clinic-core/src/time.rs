//! Visit dates are stored as free text. Listing order needs them as instants,
//! so this module turns the accepted text forms into `OffsetDateTime`.

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::{CoreError, Result};

const CALENDAR_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses a visit or follow-up date.
///
/// Accepts RFC 3339 date-times (`2024-06-01T09:30:00+02:00`) and calendar
/// dates (`2024-06-01`, read as midnight UTC).
pub fn parse_date(value: &str) -> Result<OffsetDateTime> {
    let value = value.trim();
    if let Ok(datetime) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(datetime);
    }
    Date::parse(value, CALENDAR_DATE)
        .map(|date| date.midnight().assume_utc())
        .map_err(|e| CoreError::invalid_date_time(format!("Failed to parse date '{value}': {e}")))
}

/// Like [`parse_date`], but unparseable or empty text counts as no date.
pub fn parse_visit_date(value: &str) -> Option<OffsetDateTime> {
    parse_date(value).ok()
}
