//! Natural-language times such as "in 30 minutes", "7pm" or "tomorrow at noon".
//!
//! Parsing is generic over the time zone so the bot can work in local time
//! while tests pin a fixed offset.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RELATIVE: Regex = Regex::new(
        r"^(in\s+)?(an?|\d{1,6})\s*(seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|wks?|w)(\s+ago)?$"
    )
    .unwrap();
    static ref CLOCK: Regex =
        Regex::new(r"^(at\s+)?(\d{1,2})(?::(\d{2}))?\s*(am|pm|a\.m\.|p\.m\.)?$").unwrap();
    static ref ABSOLUTE: Regex =
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ t](?:at\s+)?(\d{1,2}):(\d{2}))?$").unwrap();
    static ref HMS: Regex = Regex::new(r"^(\d{1,4}):(\d{2})(?::(\d{2}))?$").unwrap();
    static ref FUTURE: Regex = Regex::new(r"(?i)\b(in|at)\s").unwrap();
}

/// Resolve `text` against `now`. Returns `None` when the phrase is not
/// understood.
pub fn parse_time<Tz: TimeZone>(text: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let text = normalize(text);
    if text.is_empty() {
        return None;
    }
    if text == "now" {
        return Some(now);
    }

    if let Some(rest) = text.strip_prefix("tomorrow") {
        let rest = rest.trim();
        if rest.is_empty() {
            return now.checked_add_signed(Duration::days(1));
        }
        let day = now.date_naive().succ_opt()?;
        return local(&now, day.and_time(clock_time(rest)?));
    }

    if let Some(caps) = RELATIVE.captures(&text) {
        let ahead = caps.get(1).is_some();
        let ago = caps.get(4).is_some();
        if ahead && ago {
            return None;
        }
        let delta = unit_duration(&caps[2], &caps[3])?;
        return if ago {
            now.checked_sub_signed(delta)
        } else {
            now.checked_add_signed(delta)
        };
    }

    if let Some(time) = clock_time(&text) {
        let today = local(&now, now.date_naive().and_time(time))?;
        if today > now {
            return Some(today);
        }
        let day = now.date_naive().succ_opt()?;
        return local(&now, day.and_time(time));
    }

    let caps = ABSOLUTE.captures(&text)?;
    let date = NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)?;
    let time = match (caps.get(4), caps.get(5)) {
        (Some(h), Some(m)) => NaiveTime::from_hms_opt(h.as_str().parse().ok()?, m.as_str().parse().ok()?, 0)?,
        _ => NaiveTime::MIN,
    };
    local(&now, date.and_time(time))
}

/// How long a check-in lasts: "45 minutes", "an hour", "1:30:00" or a bare
/// number of minutes.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let text = normalize(text);
    let text = text.strip_prefix("for ").unwrap_or(&text).trim();

    if let Ok(minutes) = text.parse::<i64>() {
        return (0..=1_000_000).contains(&minutes).then(|| Duration::minutes(minutes));
    }

    if let Some(caps) = HMS.captures(text) {
        let hours: i64 = caps[1].parse().ok()?;
        let minutes: i64 = caps[2].parse().ok()?;
        let seconds: i64 = caps.get(3).map_or(Some(0), |s| s.as_str().parse().ok())?;
        return Some(Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds));
    }

    let caps = RELATIVE.captures(text)?;
    if caps.get(1).is_some() || caps.get(4).is_some() {
        return None;
    }
    unit_duration(&caps[2], &caps[3])
}

/// Whether `text` talks about a later point in time ("in 5 minutes",
/// "at 7pm") rather than a length of time.
pub fn is_future_reference(text: &str) -> bool {
    FUTURE.is_match(text)
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn local<Tz: TimeZone>(now: &DateTime<Tz>, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    now.timezone().from_local_datetime(&naive).earliest()
}

fn unit_duration(count: &str, unit: &str) -> Option<Duration> {
    let n: i64 = match count {
        "a" | "an" => 1,
        digits => digits.parse().ok()?,
    };
    let delta = match unit.trim_end_matches('s') {
        "second" | "sec" | "" => Duration::seconds(n),
        "minute" | "min" | "m" => Duration::minutes(n),
        "hour" | "hr" | "h" => Duration::hours(n),
        "day" | "d" => Duration::days(n),
        "week" | "wk" | "w" => Duration::weeks(n),
        _ => return None,
    };
    Some(delta)
}

/// "7pm", "at 7:30", "19:30", "noon", "midnight".
fn clock_time(text: &str) -> Option<NaiveTime> {
    let text = text.strip_prefix("at ").unwrap_or(text).trim();
    match text {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return Some(NaiveTime::MIN),
        _ => {}
    }

    let caps = CLOCK.captures(text)?;
    let hour: u32 = caps[2].parse().ok()?;
    let minute: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let meridiem = caps.get(4).map(|m| m.as_str().starts_with('p'));

    // A bare number is a count, not a clock time.
    if caps.get(1).is_none() && caps.get(3).is_none() && meridiem.is_none() {
        return None;
    }

    let hour = match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset, Timelike};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2020, 3, 14, 15, 9, 26)
            .unwrap()
    }

    #[test]
    fn test_relative_times() {
        assert_eq!(parse_time("now", now()), Some(now()));
        assert_eq!(parse_time("in 30 minutes", now()), Some(now() + Duration::minutes(30)));
        assert_eq!(parse_time("In  an hour", now()), Some(now() + Duration::hours(1)));
        assert_eq!(parse_time("2 days", now()), Some(now() + Duration::days(2)));
        assert_eq!(parse_time("10 seconds ago", now()), Some(now() - Duration::seconds(10)));
        assert_eq!(parse_time("5m", now()), Some(now() + Duration::minutes(5)));
        assert_eq!(parse_time("in 5 minutes ago", now()), None);
    }

    #[test]
    fn test_clock_times_roll_forward() {
        let later = parse_time("7pm", now()).unwrap();
        assert_eq!(later.date_naive(), now().date_naive());
        assert_eq!(later.hour(), 19);

        let earlier = parse_time("at 9:15 am", now()).unwrap();
        assert_eq!(earlier.date_naive(), now().date_naive().succ_opt().unwrap());
        assert_eq!((earlier.hour(), earlier.minute()), (9, 15));

        let exact = parse_time("16:45", now()).unwrap();
        assert_eq!((exact.hour(), exact.minute()), (16, 45));

        assert_eq!(parse_time("noon", now()).unwrap().day(), 15);
        assert_eq!(parse_time("midnight", now()).unwrap().hour(), 0);
        assert_eq!(parse_time("12am", now()).unwrap().hour(), 0);
        assert_eq!(parse_time("12 pm", now()).unwrap().hour(), 12);
    }

    #[test]
    fn test_tomorrow_and_absolute() {
        let tomorrow = parse_time("tomorrow", now()).unwrap();
        assert_eq!(tomorrow, now() + Duration::days(1));

        let at_noon = parse_time("tomorrow at noon", now()).unwrap();
        assert_eq!(at_noon.date_naive(), now().date_naive().succ_opt().unwrap());
        assert_eq!(at_noon.hour(), 12);

        let fixed = parse_time("2021-01-02 08:30", now()).unwrap();
        assert_eq!(fixed.date_naive(), NaiveDate::from_ymd_opt(2021, 1, 2).unwrap());
        assert_eq!((fixed.hour(), fixed.minute()), (8, 30));
    }

    #[test]
    fn test_rejects_nonsense() {
        assert_eq!(parse_time("", now()), None);
        assert_eq!(parse_time("whenever", now()), None);
        assert_eq!(parse_time("7", now()), None);
        assert_eq!(parse_time("13pm", now()), None);
        assert_eq!(parse_time("25:00", now()), None);
        assert_eq!(parse_time("2021-13-40", now()), None);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("45 minutes"), Some(Duration::minutes(45)));
        assert_eq!(parse_duration("an hour"), Some(Duration::hours(1)));
        assert_eq!(parse_duration("for 2 hours"), Some(Duration::hours(2)));
        assert_eq!(parse_duration("1:30:00"), Some(Duration::minutes(90)));
        assert_eq!(parse_duration("0:20"), Some(Duration::minutes(20)));
        assert_eq!(parse_duration("30"), Some(Duration::minutes(30)));
        assert_eq!(parse_duration("in 5 minutes"), None);
        assert_eq!(parse_duration("a while"), None);
    }

    #[test]
    fn test_is_future_reference() {
        assert!(is_future_reference("in 5 minutes"));
        assert!(is_future_reference("at 7pm"));
        assert!(is_future_reference("back in 10"));
        assert!(!is_future_reference("45 minutes"));
        assert!(!is_future_reference("within reason"));
        assert!(!is_future_reference("in"));
    }
}
