//! Word-based text helpers for commands and replies.

use chrono::{DateTime, Duration, Utc};
use regex::{NoExpand, RegexBuilder};

/// Split `!name arg arg` into the lowercase command name and its words.
///
/// Returns `None` when the message does not start with the delimiter.
pub fn parse_command(message: &str, delimiter: &str) -> Option<(String, Vec<String>)> {
    let rest = message.strip_prefix(delimiter)?;
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = rest[..name_end].to_lowercase();
    let args = rest[name_end..]
        .split_whitespace()
        .map(str::to_string)
        .collect();
    Some((name, args))
}

/// The text after the first `words` words, with inner spacing preserved.
pub fn rest_after(message: &str, words: usize) -> &str {
    let mut rest = message.trim_start();
    for _ in 0..words {
        match rest.find(char::is_whitespace) {
            Some(idx) => rest = rest[idx..].trim_start(),
            None => return "",
        }
    }
    rest.trim_end()
}

/// `word` without a leading delimiter.
pub fn strip_delimiter<'a>(word: &'a str, delimiter: &str) -> &'a str {
    word.strip_prefix(delimiter).unwrap_or(word)
}

/// Replace every ASCII digit with its keycap emoji.
pub fn num_to_emoji(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        out.push(c);
        if c.is_ascii_digit() {
            out.push('\u{20e3}');
        }
    }
    out
}

/// Byte offset of the `n`th (1-based) occurrence of `needle`.
pub fn find_nth_instance(n: usize, haystack: &str, needle: &str) -> Option<usize> {
    if n == 0 || needle.is_empty() {
        return None;
    }
    haystack.match_indices(needle).nth(n - 1).map(|(i, _)| i)
}

/// Replace `old` with `new` everywhere in `text`, ignoring case. `new` is
/// inserted literally.
pub fn replace_ignore_case(text: &str, old: &str, new: &str) -> String {
    if old.is_empty() {
        return text.to_string();
    }
    match RegexBuilder::new(&regex::escape(old))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(text, NoExpand(new)).into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Lay out sorted names one line per starting letter, after `header`.
pub fn format_grouped(header: &str, names: &[&str]) -> String {
    let mut groups: Vec<Vec<&str>> = Vec::new();
    let mut current: Option<char> = None;
    for &name in names {
        let first = name.chars().next().map(|c| c.to_ascii_lowercase());
        match groups.last_mut() {
            Some(group) if first == current => group.push(name),
            _ => {
                current = first;
                groups.push(Vec::new());
                if let Some(group) = groups.last_mut() {
                    group.push(name);
                }
            }
        }
    }
    let body: Vec<String> = groups.iter().map(|g| g.join(", ")).collect();
    format!("{header}{}", body.join("\n"))
}

/// "a moment", "3 minutes", "an hour", "2 days" and so on.
pub fn natural_delta(delta: Duration) -> String {
    let secs = delta.num_seconds().abs();
    let days = secs / 86_400;
    if days == 0 {
        return match secs {
            0 => "a moment".to_string(),
            1 => "a second".to_string(),
            2..=59 => format!("{secs} seconds"),
            60..=119 => "a minute".to_string(),
            120..=3_599 => format!("{} minutes", secs / 60),
            3_600..=7_199 => "an hour".to_string(),
            _ => format!("{} hours", secs / 3_600),
        };
    }
    let years = days / 365;
    match years {
        0 if days == 1 => "a day".to_string(),
        0 => {
            let months = days * 2 / 61;
            match months {
                0 => format!("{days} days"),
                1 => "a month".to_string(),
                _ => format!("{months} months"),
            }
        }
        1 => "a year".to_string(),
        _ => format!("{years} years"),
    }
}

/// `at` relative to `now`: "5 minutes ago", "an hour from now" or "now".
pub fn natural_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now - at;
    if delta.num_seconds() == 0 {
        "now".to_string()
    } else if delta > Duration::zero() {
        format!("{} ago", natural_delta(delta))
    } else {
        format!("{} from now", natural_delta(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_command() {
        let (name, args) = parse_command("!Echo  hello   world", "!").unwrap();
        assert_eq!(name, "echo");
        assert_eq!(args, vec!["hello", "world"]);

        let (name, args) = parse_command("!ping", "!").unwrap();
        assert_eq!(name, "ping");
        assert!(args.is_empty());

        assert!(parse_command("ping", "!").is_none());
        assert_eq!(parse_command("~~help 2", "~~").unwrap().0, "help");
    }

    #[test]
    fn test_rest_after() {
        assert_eq!(rest_after("!echo hello  there ", 1), "hello  there");
        assert_eq!(rest_after("!msg Dorm  hi all", 2), "hi all");
        assert_eq!(rest_after("!echo", 1), "");
        assert_eq!(rest_after("!echo ", 1), "");
        assert_eq!(rest_after("a b", 0), "a b");
    }

    #[test]
    fn test_strip_delimiter() {
        assert_eq!(strip_delimiter("!ping", "!"), "ping");
        assert_eq!(strip_delimiter("ping", "!"), "ping");
    }

    #[test]
    fn test_num_to_emoji() {
        assert_eq!(num_to_emoji("Sum=19"), "Sum=1\u{20e3}9\u{20e3}");
        assert_eq!(num_to_emoji("none"), "none");
    }

    #[test]
    fn test_find_nth_instance() {
        let text = "!replace a b the rest";
        assert_eq!(find_nth_instance(1, text, " "), Some(8));
        assert_eq!(find_nth_instance(3, text, " "), Some(12));
        assert_eq!(find_nth_instance(9, text, " "), None);
        assert_eq!(find_nth_instance(0, text, " "), None);
    }

    #[test]
    fn test_replace_ignore_case() {
        assert_eq!(replace_ignore_case("Cats and CATS", "cats", "dogs"), "dogs and dogs");
        assert_eq!(replace_ignore_case("a.b", ".", "$1"), "a$1b");
        assert_eq!(replace_ignore_case("same", "", "x"), "same");
    }

    #[test]
    fn test_format_grouped_keeps_last_group() {
        let out = format_grouped("Valid aliases: ", &["alpha", "apple", "bravo", "charlie", "cup"]);
        assert_eq!(out, "Valid aliases: alpha, apple\nbravo\ncharlie, cup");
        assert_eq!(format_grouped("None: ", &[]), "None: ");
    }

    #[test]
    fn test_natural_delta() {
        assert_eq!(natural_delta(Duration::zero()), "a moment");
        assert_eq!(natural_delta(Duration::seconds(30)), "30 seconds");
        assert_eq!(natural_delta(Duration::seconds(90)), "a minute");
        assert_eq!(natural_delta(Duration::minutes(45)), "45 minutes");
        assert_eq!(natural_delta(Duration::minutes(90)), "an hour");
        assert_eq!(natural_delta(Duration::hours(5)), "5 hours");
        assert_eq!(natural_delta(Duration::days(1)), "a day");
        assert_eq!(natural_delta(Duration::days(10)), "10 days");
        assert_eq!(natural_delta(Duration::days(40)), "a month");
        assert_eq!(natural_delta(Duration::days(100)), "3 months");
        assert_eq!(natural_delta(Duration::days(400)), "a year");
        assert_eq!(natural_delta(Duration::days(1000)), "2 years");
    }

    #[test]
    fn test_natural_time() {
        let now = Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(natural_time(now, now), "now");
        assert_eq!(natural_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(natural_time(now + Duration::hours(1), now), "an hour from now");
    }
}
