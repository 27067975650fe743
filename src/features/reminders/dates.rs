//! Date parsing and formatting helpers
//!
//! User input uses DD.MM.YYYY; stored timestamps are ISO-8601 text.

use chrono::{NaiveDate, NaiveDateTime};

/// Format the user types dates in, e.g. "25.12.2024".
pub const INPUT_FORMAT: &str = "%d.%m.%Y";

/// Format stored timestamps are written in.
pub const STORED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse user input as a calendar day, yielding midnight of that day.
/// Impossible days ("31.02.2024") and anything not matching DD.MM.YYYY are
/// rejected.
pub fn parse_input(raw: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(raw.trim(), INPUT_FORMAT).ok()?;
    date.and_hms_opt(0, 0, 0)
}

/// Parse a stored ISO-8601 timestamp.
pub fn parse_stored(raw: &str) -> Option<NaiveDateTime> {
    raw.trim().parse::<NaiveDateTime>().ok()
}

/// Render a timestamp into the stored ISO-8601 form.
pub fn to_stored(value: NaiveDateTime) -> String {
    value.format(STORED_FORMAT).to_string()
}

/// Render a stored timestamp as DD.MM.YYYY for display. A stored value that
/// no longer parses is passed through untouched rather than failing the
/// caller.
pub fn format_for_display(stored: &str) -> String {
    match parse_stored(stored) {
        Some(value) => value.format(INPUT_FORMAT).to_string(),
        None => stored.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_valid() {
        let parsed = parse_input("25.12.2024").unwrap();
        assert_eq!(to_stored(parsed), "2024-12-25T00:00:00");
        // Surrounding whitespace is tolerated.
        assert!(parse_input(" 01.01.2099 ").is_some());
    }

    #[test]
    fn test_parse_input_rejects_bad_formats() {
        assert!(parse_input("2024-12-25").is_none());
        assert!(parse_input("31.02.2024").is_none());
        assert!(parse_input("25/12/2024").is_none());
        assert!(parse_input("abc").is_none());
        assert!(parse_input("").is_none());
    }

    #[test]
    fn test_stored_round_trip() {
        let parsed = parse_input("01.01.2099").unwrap();
        assert_eq!(parse_stored(&to_stored(parsed)), Some(parsed));
    }

    #[test]
    fn test_format_for_display() {
        assert_eq!(format_for_display("2024-12-25T00:00:00"), "25.12.2024");
        // Unparsable stored values degrade to the raw text.
        assert_eq!(format_for_display("garbage"), "garbage");
    }
}
