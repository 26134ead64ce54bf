use anyhow::bail;
use log::warn;

use crate::text::{escape_html, escape_xml, format_display_date, format_rss_date};

use super::data::Entry;

const FEED_LINK_MARKER: &str = "application/rss+xml";
const FEED_LINK_ANCHOR: &str =
    "  <link rel=\"manifest\" href=\"../site.webmanifest\">\n  \n  <link rel=\"stylesheet\"";
const FEED_LINK_REPLACEMENT: &str = concat!(
    "  <link rel=\"manifest\" href=\"../site.webmanifest\">\n",
    "  <link rel=\"alternate\" type=\"application/rss+xml\" title=\"Jordan Joe Cooper\" href=\"../feed.xml\">\n",
    "\n",
    "  <link rel=\"stylesheet\""
);

/// `<li>` for the homepage post list, indented like the entries already there.
pub(super) fn render_list_item(entry: &Entry) -> String {
    format!(
        concat!(
            "      <li>\n",
            "        <h2 class=\"post-title\">\n",
            "          <span class=\"post-date\">{}</span>\n",
            "          <a href=\"posts/{}.html\">{}</a>\n",
            "        </h2>\n",
            "      </li>\n",
            "      ",
        ),
        format_display_date(&entry.date),
        entry.slug,
        escape_html(&entry.title),
    )
}

/// `<item>` for the RSS feed.
pub(super) fn render_feed_item(entry: &Entry) -> anyhow::Result<String> {
    let url = entry.url();
    Ok(format!(
        concat!(
            "    <item>\n",
            "      <title>{}</title>\n",
            "      <link>{}</link>\n",
            "      <guid>{}</guid>\n",
            "      <pubDate>{}</pubDate>\n",
            "      <description>{}</description>\n",
            "    </item>\n",
            "    ",
        ),
        escape_xml(&entry.title),
        url,
        url,
        format_rss_date(&entry.date)?,
        escape_xml(&entry.description),
    ))
}

/// Inserts `fragment` right after the first `marker` in `doc`.
pub(super) fn splice_after(doc: &str, marker: &str, fragment: &str) -> Option<String> {
    let at = doc.find(marker)? + marker.len();
    Some([&doc[..at], fragment, &doc[at..]].concat())
}

/// Inserts `fragment` right before the first `marker` in `doc`.
pub(super) fn splice_before(doc: &str, marker: &str, fragment: &str) -> Option<String> {
    let at = doc.find(marker)?;
    Some([&doc[..at], fragment, &doc[at..]].concat())
}

/// Adds the feed `<link rel="alternate">` to a post head that lacks one. Only
/// the layout of the current template is known; anything else is left alone.
pub(super) fn ensure_feed_link(content: String) -> String {
    if content.contains(FEED_LINK_MARKER) {
        return content;
    }
    if !content.contains(FEED_LINK_ANCHOR) {
        warn!("template has no place for the feed link. skipping it.");
        return content;
    }

    content.replacen(FEED_LINK_ANCHOR, FEED_LINK_REPLACEMENT, 1)
}

pub(super) fn fill_template(template: &str, fields: &[(&str, &str)]) -> String {
    let mut content = template.to_string();
    for (placeholder, value) in fields {
        content = content.replace(placeholder, value);
    }

    content
}

pub(super) fn require(field: &str, value: &str) -> anyhow::Result<()> {
    if value.is_empty() {
        bail!("could not extract {field} from post");
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry() -> Entry {
        Entry {
            slug: "my-post".to_string(),
            title: "Tom & Jerry".to_string(),
            description: "<b>bold</b>".to_string(),
            date: "2026-01-01".to_string(),
        }
    }

    #[test]
    fn list_item() {
        let li = render_list_item(&entry());
        assert!(li.contains("<span class=\"post-date\">January 1, 2026</span>"));
        assert!(li.contains("<a href=\"posts/my-post.html\">Tom &amp; Jerry</a>"));
        assert!(li.starts_with("      <li>\n"));
    }

    #[test]
    fn feed_item() {
        let item = render_feed_item(&entry()).unwrap();
        assert!(item.contains("<title>Tom &amp; Jerry</title>"));
        assert!(item.contains("<link>https://jordanjoecooper.com/posts/my-post.html</link>"));
        assert!(item.contains("<guid>https://jordanjoecooper.com/posts/my-post.html</guid>"));
        assert!(item.contains("<pubDate>Thu, 01 Jan 2026 00:00:00 +0000</pubDate>"));
        assert!(item.contains("<description>&lt;b&gt;bold&lt;/b&gt;</description>"));
    }

    #[test]
    fn splicing() {
        assert_eq!(splice_after("a[x]b[x]", "[x]", "1").as_deref(), Some("a[x]1b[x]"));
        assert_eq!(splice_before("a[x]b[x]", "[x]", "1").as_deref(), Some("a1[x]b[x]"));
        assert_eq!(splice_after("ab", "[x]", "1"), None);
        assert_eq!(splice_before("ab", "[x]", "1"), None);
    }

    #[test]
    fn feed_link() {
        let head = format!("<head>\n{FEED_LINK_ANCHOR}>\n</head>");
        let linked = ensure_feed_link(head.clone());
        assert_ne!(linked, head);
        assert!(linked.contains(
            r#"<link rel="alternate" type="application/rss+xml" title="Jordan Joe Cooper" href="../feed.xml">"#
        ));
        // already linked documents are untouched
        assert_eq!(ensure_feed_link(linked.clone()), linked);

        let unknown = "<head><title>x</title></head>".to_string();
        assert_eq!(ensure_feed_link(unknown.clone()), unknown);
    }

    #[test]
    fn template_filling() {
        let filled = fill_template(
            "POST_TITLE | POST_TITLE | YYYY-MM-DD",
            &[("POST_TITLE", "T"), ("YYYY-MM-DD", "2026-01-01")],
        );
        assert_eq!(filled, "T | T | 2026-01-01");
    }
}
