//! Disambiguates the two URL path segments into a date token and a label.

use crate::countdown::{CountdownError, CountdownRequest};
use chrono::NaiveDate;

/// Parses a slash-separated path (already URL-decoded) into a [`CountdownRequest`].
///
/// The path must consist of exactly two segments. Whichever segment is made up
/// of exactly eight ASCII digits is taken as the `YYYYMMDD` date; the other
/// becomes the event label, verbatim. Both orders are accepted:
///
/// ```text
/// 20301231/launch-party
/// launch-party/20301231
/// ```
///
/// If neither or both segments look like a date, or the segment count is not
/// two, parsing fails with [`CountdownError::InvalidFormat`].
pub fn parse_path(path: &str) -> Result<CountdownRequest, CountdownError> {
    let mut segments = path.trim_matches('/').split('/');
    let (first, second) = match (segments.next(), segments.next(), segments.next()) {
        (Some(first), Some(second), None) => (first, second),
        _ => return Err(CountdownError::InvalidFormat),
    };

    let (token, label) = match (is_date_token(first), is_date_token(second)) {
        (true, false) => (first, second),
        (false, true) => (second, first),
        _ => return Err(CountdownError::InvalidFormat),
    };

    if label.is_empty() {
        return Err(CountdownError::InvalidFormat);
    }

    let target_date = parse_date_token(token)?;
    Ok(CountdownRequest {
        target_date,
        label: label.to_string(),
    })
}

/// Returns whether a segment matches `^\d{8}$`.
fn is_date_token(segment: &str) -> bool {
    segment.len() == 8 && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Splits an eight-digit token into `Y(4)M(2)D(2)` and validates it as a
/// calendar date.
fn parse_date_token(token: &str) -> Result<NaiveDate, CountdownError> {
    debug_assert!(is_date_token(token));
    let year = digits(&token[..4]) as i32;
    let month = digits(&token[4..6]);
    let day = digits(&token[6..8]);

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CountdownError::InvalidDate(token.to_string()))
}

/// Folds a string of ASCII digits into its value; the caller guarantees the
/// input is all digits, so this cannot fail or overflow.
fn digits(s: &str) -> u32 {
    s.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_date_then_label() {
        let request = parse_path("20301231/eventname").expect("Failed to parse path");
        assert_eq!(request.target_date, NaiveDate::from_ymd_opt(2030, 12, 31).unwrap());
        assert_eq!(request.label, "eventname");
    }

    #[test]
    fn segment_order_does_not_matter() {
        let a = parse_path("eventname/20301231").expect("Failed to parse path");
        let b = parse_path("20301231/eventname").expect("Failed to parse path");
        assert_eq!(a, b);
    }

    #[test]
    fn ignores_leading_and_trailing_slashes() {
        let request = parse_path("/20301231/eventname/").expect("Failed to parse path");
        assert_eq!(request.label, "eventname");
    }

    #[test]
    fn rejects_two_date_segments() {
        assert_eq!(
            parse_path("20301231/20310101"),
            Err(CountdownError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_zero_date_segments() {
        assert_eq!(
            parse_path("event/another"),
            Err(CountdownError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert_eq!(parse_path("20301231"), Err(CountdownError::InvalidFormat));
        assert_eq!(
            parse_path("a/b/20301231"),
            Err(CountdownError::InvalidFormat)
        );
        assert_eq!(parse_path(""), Err(CountdownError::InvalidFormat));
    }

    #[test]
    fn rejects_empty_label() {
        assert_eq!(
            parse_path("20301231//"),
            Err(CountdownError::InvalidFormat)
        );
    }

    #[test]
    fn seven_or_nine_digits_are_labels_not_dates() {
        let request = parse_path("2030123/20301231").expect("Failed to parse path");
        assert_eq!(request.label, "2030123");

        let request = parse_path("203012314/20301231").expect("Failed to parse path");
        assert_eq!(request.label, "203012314");
    }

    #[test]
    fn non_ascii_digits_do_not_count_as_date() {
        // Eight characters, but not eight ASCII digits.
        assert_eq!(
            parse_path("２０３０１２３１/event"),
            Err(CountdownError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_impossible_calendar_date() {
        assert_eq!(
            parse_path("20301301/event"),
            Err(CountdownError::InvalidDate("20301301".into()))
        );
        assert_eq!(
            parse_path("20300230/event"),
            Err(CountdownError::InvalidDate("20300230".into()))
        );
    }

    #[test]
    fn leading_zeros_in_the_year_are_preserved() {
        let request = parse_path("00991231/ancient").expect("Failed to parse path");
        assert_eq!(request.target_date, NaiveDate::from_ymd_opt(99, 12, 31).unwrap());
    }

    #[test]
    fn accepts_leap_day() {
        let request = parse_path("20280229/leap").expect("Failed to parse path");
        assert_eq!(request.target_date, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
    }
}
