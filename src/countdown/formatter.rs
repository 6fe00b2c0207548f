//! Turns the signed delta between "now" and the target date into display text.

use crate::countdown::{CountdownRequest, CountdownResult, Direction};
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};

/// Formats countdown deltas relative to a fixed UTC offset.
///
/// The target date is anchored at local midnight in the configured offset.
/// Rendering policy:
///
/// * more than 30 whole days ahead: a coarse `N日`,
/// * otherwise ahead: `N日H時間M分`,
/// * exactly the target midnight: `当日`,
/// * behind: the elapsed `N日H時間M分`, with the phrase switching from
///   `まで` (until) to `から` (since).
#[derive(Debug, Copy, Clone)]
pub struct CountdownFormatter {
    offset: FixedOffset,
}

impl CountdownFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Formats a request against the current wall clock.
    pub fn format(&self, request: &CountdownRequest) -> CountdownResult {
        self.format_at(request, Utc::now())
    }

    /// Formats a request against an explicit instant.
    ///
    /// This is the pure core of the formatter; `now` is a parameter so that
    /// tests are independent of the wall clock.
    pub fn format_at(&self, request: &CountdownRequest, now: DateTime<Utc>) -> CountdownResult {
        let target = request.target_date.and_time(NaiveTime::MIN);
        let now = now.with_timezone(&self.offset).naive_local();
        let delta = target - now;

        let (countdown, direction) = if delta > Duration::zero() {
            if delta.num_days() > 30 {
                (format!("{}日", delta.num_days()), Direction::Toward)
            } else {
                (breakdown(delta), Direction::Toward)
            }
        } else if delta.is_zero() {
            ("当日".to_string(), Direction::At)
        } else {
            (breakdown(-delta), Direction::Since)
        };

        let suffix = match direction {
            Direction::Toward | Direction::At => "まで",
            Direction::Since => "から",
        };

        CountdownResult {
            phrase: format!("{label}{suffix}", label = request.label),
            countdown,
            direction,
        }
    }
}

/// Renders a non-negative duration as `N日H時間M分`.
fn breakdown(duration: Duration) -> String {
    let days = duration.num_days();
    let hours = duration.num_hours() - days * 24;
    let minutes = duration.num_minutes() - duration.num_hours() * 60;
    format!("{days}日{hours}時間{minutes}分")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    const JST_SECONDS: i32 = 9 * 3600;

    fn formatter() -> CountdownFormatter {
        CountdownFormatter::new(FixedOffset::east_opt(JST_SECONDS).unwrap())
    }

    fn request(yyyymmdd: (i32, u32, u32), label: &str) -> CountdownRequest {
        CountdownRequest {
            target_date: NaiveDate::from_ymd_opt(yyyymmdd.0, yyyymmdd.1, yyyymmdd.2).unwrap(),
            label: label.to_string(),
        }
    }

    /// Builds a UTC instant from local wall-clock time in the +09:00 offset.
    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        FixedOffset::east_opt(JST_SECONDS)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn ten_days_out_renders_days_and_until_suffix() {
        let result = formatter().format_at(
            &request((2030, 12, 31), "launch"),
            local(2030, 12, 21, 0, 0, 0),
        );
        assert!(result.countdown.contains("10日"), "got {}", result.countdown);
        assert_eq!(result.phrase, "launchまで");
        assert_eq!(result.direction, Direction::Toward);
    }

    #[test]
    fn far_future_renders_coarse_day_count() {
        let result = formatter().format_at(
            &request((2030, 2, 15), "expo"),
            local(2030, 1, 1, 0, 0, 0),
        );
        assert_eq!(result.countdown, "45日");
        assert_eq!(result.phrase, "expoまで");
    }

    #[test]
    fn thirty_days_is_still_fine_grained() {
        let result = formatter().format_at(
            &request((2030, 1, 31), "deadline"),
            local(2030, 1, 1, 0, 0, 0),
        );
        assert_eq!(result.countdown, "30日0時間0分");
    }

    #[test]
    fn thirty_one_days_switches_to_coarse() {
        let result = formatter().format_at(
            &request((2030, 2, 1), "deadline"),
            local(2030, 1, 1, 0, 0, 0),
        );
        assert_eq!(result.countdown, "31日");
    }

    #[test]
    fn partial_day_counts_do_not_round_up() {
        // 30 days and 12 hours left: the whole-day count is 30, so the
        // fine-grained format still applies.
        let result = formatter().format_at(
            &request((2030, 2, 1), "deadline"),
            local(2030, 1, 1, 12, 0, 0),
        );
        assert_eq!(result.countdown, "30日12時間0分");
    }

    #[test]
    fn same_instant_renders_the_day_of() {
        let result = formatter().format_at(
            &request((2030, 12, 31), "party"),
            local(2030, 12, 31, 0, 0, 0),
        );
        assert_eq!(result.countdown, "当日");
        assert_eq!(result.phrase, "partyまで");
        assert_eq!(result.direction, Direction::At);
    }

    #[test]
    fn sub_day_delta_breaks_down_hours_and_minutes() {
        let result = formatter().format_at(
            &request((2030, 12, 31), "party"),
            local(2030, 12, 30, 23, 30, 0),
        );
        assert_eq!(result.countdown, "0日0時間30分");
        assert_eq!(result.direction, Direction::Toward);
    }

    #[test]
    fn past_target_renders_elapsed_time_with_since_suffix() {
        let result = formatter().format_at(
            &request((2030, 12, 31), "launch"),
            local(2031, 1, 5, 15, 45, 0),
        );
        assert_eq!(result.countdown, "5日15時間45分");
        assert_eq!(result.phrase, "launchから");
        assert_eq!(result.direction, Direction::Since);
    }

    #[test]
    fn one_minute_past_midnight_is_since() {
        let result = formatter().format_at(
            &request((2030, 12, 31), "launch"),
            local(2030, 12, 31, 0, 1, 0),
        );
        assert_eq!(result.countdown, "0日0時間1分");
        assert_eq!(result.direction, Direction::Since);
    }

    #[test]
    fn offset_shifts_the_midnight_anchor() {
        // 2030-12-30T16:00:00Z is already 2030-12-31T01:00:00 in +09:00.
        let utc_now = Utc.with_ymd_and_hms(2030, 12, 30, 16, 0, 0).unwrap();
        let result = formatter().format_at(&request((2030, 12, 31), "launch"), utc_now);
        assert_eq!(result.direction, Direction::Since);
        assert_eq!(result.countdown, "0日1時間0分");
    }
}
