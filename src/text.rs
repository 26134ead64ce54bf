use anyhow::Context;
use chrono::{NaiveDate, TimeZone, Utc};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Turns arbitrary text (usually a title) into a slug: lowercase ascii letters,
/// digits and single hyphens, never starting or ending with a hyphen.
pub(crate) fn slugify(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    for c in s.trim().chars() {
        if c.is_ascii_alphanumeric() {
            res.push(c.to_ascii_lowercase());
        } else if c == '-' || c == '_' || c.is_whitespace() {
            // collapse runs here instead of a second pass
            if !res.ends_with('-') {
                res.push('-');
            }
        }
    }

    res.trim_matches('-').to_string()
}

/// Normalizes a user supplied slug. A trailing `.html` is ignored, and
/// `default` is returned when nothing usable is left.
pub(crate) fn normalize_slug(s: &str, default: &str) -> String {
    let s = s.trim();
    let slug = slugify(s.strip_suffix(".html").unwrap_or(s));
    if slug.is_empty() {
        default.to_string()
    } else {
        slug
    }
}

/// Strict `YYYY-MM-DD`: ascii digits everywhere except the two hyphens, and a
/// real calendar day.
pub(crate) fn is_valid_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
        && NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
}

pub(crate) fn today() -> String {
    Utc::now().date_naive().format(DATE_FORMAT).to_string()
}

/// `2026-02-23` -> `February 23, 2026`. Anything that doesn't look like a date
/// is handed back as it is.
pub(crate) fn format_display_date(iso: &str) -> String {
    let parts: Vec<_> = iso.splitn(3, '-').map(|p| p.trim().parse::<u32>()).collect();
    match parts.as_slice() {
        [Ok(y), Ok(m), Ok(d)] if (1..=12).contains(m) => {
            format!("{} {}, {}", MONTHS[(*m - 1) as usize], d, y)
        }
        _ => iso.to_string(),
    }
}

/// RSS `pubDate` for midnight UTC of the given day.
pub(crate) fn format_rss_date(iso: &str) -> anyhow::Result<String> {
    let date = NaiveDate::parse_from_str(iso, DATE_FORMAT)
        .with_context(|| format!("Invalid date: {iso:?}"))?;
    let midnight = Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN));

    Ok(midnight.format("%a, %d %b %Y %H:%M:%S %z").to_string())
}

fn escape_markup(s: &str) -> String {
    // `&` goes first so the entities below are not escaped twice
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub(crate) fn escape_html(s: &str) -> String {
    escape_markup(s)
}

pub(crate) fn escape_xml(s: &str) -> String {
    escape_markup(s)
}

#[cfg(test)]
mod test {
    use super::*;

    fn is_clean_slug(s: &str) -> bool {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !s.starts_with('-')
            && !s.ends_with('-')
            && !s.contains("--")
    }

    #[test]
    fn slugify_titles() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust  &  Go: a -- Story "), "rust-go-a-story");
        assert_eq!(slugify("snake_case title"), "snake-case-title");
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
        assert_eq!(slugify("!!!"), "");

        for title in [
            "Why I Moved To NixOS (Part 2)",
            "--Leading and trailing--",
            "What's new in 2026?",
            "A\tB\nC",
        ] {
            let slug = slugify(title);
            assert!(is_clean_slug(&slug), "{title:?} -> {slug:?}");
        }
    }

    #[test]
    fn normalize_user_slug() {
        assert_eq!(normalize_slug("My_Post.html", "fallback"), "my-post");
        assert_eq!(normalize_slug("  ", "fallback"), "fallback");
        assert_eq!(normalize_slug("???", "fallback"), "fallback");
        assert_eq!(normalize_slug("", ""), "");
    }

    #[test]
    fn date_validation() {
        assert!(is_valid_date("2026-02-23"));
        assert!(is_valid_date("2024-02-29"));
        assert!(!is_valid_date("2024-02-30"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2026-2-23"));
        assert!(!is_valid_date("2026/02/23"));
        assert!(!is_valid_date("2026-02-23T00:00:00Z"));
        assert!(!is_valid_date(""));
        assert!(is_valid_date(&today()));
    }

    #[test]
    fn date_validation_needs_digits() {
        // chrono alone would accept padding and signed years here
        for date in [
            "2026-01- 1",
            "2026- 1-01",
            " 026-01-01",
            "+026-01-01",
            "-026-01-01",
            "2026-+1-01",
            "2026-01-+1",
            "20a6-01-01",
            "2026-0a-01",
            "2026-01-0a",
        ] {
            assert!(!is_valid_date(date), "{date:?} accepted");
        }
    }

    #[test]
    fn display_date() {
        assert_eq!(format_display_date("2026-02-23"), "February 23, 2026");
        assert_eq!(format_display_date("2026-01-01"), "January 1, 2026");
        assert_eq!(format_display_date("2026-12-09"), "December 9, 2026");
        // malformed input is passed through
        assert_eq!(format_display_date("2026-13-01"), "2026-13-01");
        assert_eq!(format_display_date("2026-00-01"), "2026-00-01");
        assert_eq!(format_display_date("someday"), "someday");
    }

    #[test]
    fn rss_date() {
        assert_eq!(
            format_rss_date("2026-01-01").unwrap(),
            "Thu, 01 Jan 2026 00:00:00 +0000"
        );
        assert_eq!(
            format_rss_date("2026-02-23").unwrap(),
            "Mon, 23 Feb 2026 00:00:00 +0000"
        );
        assert!(format_rss_date("2026-02-30").is_err());
        assert!(format_rss_date("tomorrow").is_err());
    }

    #[test]
    fn escaping() {
        assert_eq!(
            escape_html(r#"Tom & "Jerry" <3 >"#),
            "Tom &amp; &quot;Jerry&quot; &lt;3 &gt;"
        );
        assert_eq!(escape_xml("a &amp; b"), "a &amp;amp; b");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
