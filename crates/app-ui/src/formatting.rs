//! Display formatting for bar rows

use chrono::{DateTime, Datelike, Utc};

/// English ordinal suffix for a day of the month
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Format a timestamp as `March 3rd 2024, 4:05:09 pm` in UTC
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    format!(
        "{} {}{} {}",
        at.format("%B"),
        at.day(),
        ordinal_suffix(at.day()),
        at.format("%Y, %-I:%M:%S %P")
    )
}

/// Label shown under each bar in the list
pub fn added_on_label(created_at: DateTime<Utc>) -> String {
    format!("Added on {}", format_timestamp(created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_added_on_label() {
        let at = Utc.with_ymd_and_hms(2024, 3, 3, 16, 5, 9).unwrap();
        assert_eq!(added_on_label(at), "Added on March 3rd 2024, 4:05:09 pm");
    }

    #[test]
    fn test_morning_and_midnight() {
        let morning = Utc.with_ymd_and_hms(2018, 6, 21, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(morning), "June 21st 2018, 9:30:00 am");

        let midnight = Utc.with_ymd_and_hms(2018, 12, 12, 0, 0, 1).unwrap();
        assert_eq!(format_timestamp(midnight), "December 12th 2018, 12:00:01 am");
    }

    #[test]
    fn test_ordinal_suffix() {
        let suffixes: Vec<_> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 30, 31]
            .into_iter()
            .map(ordinal_suffix)
            .collect();

        assert_eq!(
            suffixes,
            ["st", "nd", "rd", "th", "th", "th", "th", "st", "nd", "rd", "th", "st"]
        );
    }
}
