//! Pulls post metadata back out of a rendered post.
//!
//! Posts are plain html files, so everything is found with a handful of narrow
//! regexes over known `<meta>` shapes rather than a real parser.

use std::sync::OnceLock;

use log::debug;
use regex::{Regex, RegexBuilder};

/// Appended to every page title by the post template.
pub(crate) const BRAND_SUFFIX: &str = " - Jordan Joe Cooper";

/// One `attribute="value"` pair identifying a `<meta>` tag. The matching regex
/// is built on first use and kept.
#[derive(Debug)]
pub(crate) struct Probe<'a> {
    pub attr: &'a str,
    pub value: &'a str,
    regex: OnceLock<Regex>,
}

impl<'a> Probe<'a> {
    pub const fn new(attr: &'a str, value: &'a str) -> Self {
        Self {
            attr,
            value,
            regex: OnceLock::new(),
        }
    }

    fn regex(&self) -> &Regex {
        self.regex.get_or_init(|| {
            let pattern = format!(
                r#"<meta\s+[^>]*{}="{}"[^>]*content="([^"]*)""#,
                regex::escape(self.attr),
                regex::escape(self.value)
            );
            // both parts are escaped, so the pattern always compiles
            RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .expect("escaped meta pattern is valid")
        })
    }

    /// The trimmed `content` of the first matching tag, if it is non-empty.
    pub fn find(&self, html: &str) -> Option<String> {
        let content = self.regex().captures(html)?.get(1)?.as_str().trim();
        if content.is_empty() {
            None
        } else {
            Some(content.to_string())
        }
    }
}

pub(crate) static TITLE_PROBES: [Probe<'static>; 2] = [
    Probe::new("property", "og:title"),
    Probe::new("name", "twitter:title"),
];
pub(crate) static DESCRIPTION_PROBES: [Probe<'static>; 2] = [
    Probe::new("name", "description"),
    Probe::new("property", "og:description"),
];
pub(crate) static DATE_PROBES: [Probe<'static>; 2] = [
    Probe::new("name", "article:published_time"),
    Probe::new("property", "article:published_time"),
];

/// Tries each probe in order and returns the first non-empty hit.
pub(crate) fn extract_first(html: &str, probes: &[Probe<'_>]) -> String {
    for probe in probes {
        if let Some(content) = probe.find(html) {
            return content;
        }
        debug!("no <meta {}=\"{}\"> found", probe.attr, probe.value);
    }

    String::new()
}

fn strip_brand(title: &str) -> String {
    let title = title.trim();
    title
        .strip_suffix(BRAND_SUFFIX)
        .unwrap_or(title)
        .trim()
        .to_string()
}

fn find_title_element(html: &str) -> Option<String> {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    let re = TITLE.get_or_init(|| {
        RegexBuilder::new(r"<title>([^<]+)</title>")
            .case_insensitive(true)
            .build()
            .expect("title pattern is valid")
    });
    re.captures(html).map(|caps| caps[1].to_string())
}

pub(crate) fn extract_title(html: &str) -> String {
    let title = extract_first(html, &TITLE_PROBES);
    if !title.is_empty() {
        return strip_brand(&title);
    }

    find_title_element(html)
        .map(|t| strip_brand(&t))
        .unwrap_or_default()
}

pub(crate) fn extract_description(html: &str) -> String {
    extract_first(html, &DESCRIPTION_PROBES)
}

/// Raw `article:published_time`. Not validated here.
pub(crate) fn extract_date(html: &str) -> String {
    extract_first(html, &DATE_PROBES)
}
