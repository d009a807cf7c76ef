//! Display formatting for dates shown in the session list and panes

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Short calendar date, e.g. `Jan 5, 2025`
pub fn format_short_date<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value.format("%b %-d, %Y").to_string()
}

/// Month, day and clock time, e.g. `Jan 5, 10:30 AM`
pub fn format_message_time<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value.format("%b %-d, %I:%M %p").to_string()
}
