//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale, TimeZone, Utc};

/// Pattern used when none is given: "15 mar 2021"
pub const DEFAULT_PATTERN: &str = "dd MMM yyyy";

/// Every date on the site is rendered in Brazilian Portuguese
const LOCALE: Locale = Locale::pt_BR;

/// Format a date using a date-fns style pattern
///
/// # Examples
/// ```ignore
/// format_date(&date, None) // -> "15 mar 2021"
/// format_date(&date, Some("dd/MM/yyyy")) // -> "15/03/2021"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, pattern: Option<&str>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let strftime = pattern_to_strftime(pattern.unwrap_or(DEFAULT_PATTERN));
    date.format_localized(&strftime, LOCALE).to_string()
}

/// Format a publication date in the site timezone; unpublished documents render empty
pub fn publication_date(
    date: Option<&DateTime<FixedOffset>>,
    tz: &chrono_tz::Tz,
    pattern: Option<&str>,
) -> String {
    match date {
        Some(date) => format_date(&date.with_timezone(tz), pattern),
        None => String::new(),
    }
}

/// Value for the `datetime` attribute of a `<time>` element
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Abbreviated month names, January first
///
/// Handed to the listing page script so posts appended in the browser
/// read the same as the ones rendered here.
pub fn month_abbreviations() -> Vec<String> {
    (1..=12)
        .filter_map(|month| Utc.with_ymd_and_hms(2000, month, 1, 12, 0, 0).single())
        .map(|date| date.format_localized("%b", LOCALE).to_string())
        .collect()
}

/// Convert a date-fns (Unicode) pattern to a chrono strftime string
///
/// Letters are read in runs (`yyyy`, `MMM`, `dd`...); text inside single
/// quotes is copied as-is and `''` is a literal quote.
fn pattern_to_strftime(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut result = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                result.push('\'');
                i += 2;
                continue;
            }
            let mut j = i + 1;
            while j < chars.len() && chars[j] != '\'' {
                push_literal(&mut result, chars[j]);
                j += 1;
            }
            i = j + 1;
            continue;
        }

        if c.is_ascii_alphabetic() {
            let mut run = 1;
            while chars.get(i + run) == Some(&c) {
                run += 1;
            }
            result.push_str(&token_to_strftime(c, run));
            i += run;
            continue;
        }

        push_literal(&mut result, c);
        i += 1;
    }

    result
}

fn token_to_strftime(letter: char, run: usize) -> String {
    let directive = match (letter, run) {
        // Year
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        // Month
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        // Day of month
        ('d', 1) => "%-d",
        ('d', _) => "%d",
        // Day of week
        ('E', n) if n >= 4 => "%A",
        ('E', _) => "%a",
        // Time
        ('H', 1) => "%-H",
        ('H', _) => "%H",
        ('m', 1) => "%-M",
        ('m', _) => "%M",
        ('s', 1) => "%-S",
        ('s', _) => "%S",
        _ => return std::iter::repeat(letter).take(run).collect(),
    };
    directive.to_string()
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
