use std::{fs::OpenOptions, io::Write, path::Path};

use anyhow::{bail, Context};
use log::info;

use crate::{
    meta::{extract_date, extract_description, extract_title},
    site::{Site, FEED_FILE, INDEX_FILE, TEMPLATE_FILE},
    text::{escape_html, format_display_date, is_valid_date, normalize_slug, slugify, today},
};

pub(crate) mod data;
mod utils;

use data::{Entry, PostDraft};
use utils::{
    ensure_feed_link, fill_template, render_feed_item, render_list_item, require, splice_after,
    splice_before,
};

pub(crate) const BASE_URL: &str = "https://jordanjoecooper.com";
/// Start of the post list on the homepage. New entries go right after it.
pub(crate) const INDEX_MARKER: &str = "<ul class=\"post-list\">";
/// First item of the feed. New items go right before it.
pub(crate) const FEED_MARKER: &str = "<item>";

/// Reads a post back and checks it has everything the homepage and feed need.
pub(crate) fn read_entry(post_path: &Path) -> anyhow::Result<Entry> {
    let html = std::fs::read_to_string(post_path)
        .with_context(|| format!("while reading {post_path:?}"))?;

    let title = extract_title(&html);
    let description = extract_description(&html);
    let date = extract_date(&html);
    require("title", &title)?;
    require("description", &description)?;
    if !is_valid_date(&date) {
        bail!("could not extract date (article:published_time YYYY-MM-DD) from post");
    }

    let slug = post_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(Entry {
        slug,
        title,
        description,
        date,
    })
}

fn update_index(index_path: &Path, fragment: &str) -> anyhow::Result<()> {
    let index = std::fs::read_to_string(index_path)
        .with_context(|| format!("while reading {index_path:?}"))?;
    let Some(updated) = splice_after(&index, INDEX_MARKER, fragment) else {
        bail!("could not find the post list ({INDEX_MARKER}) in {INDEX_FILE}");
    };
    std::fs::write(index_path, updated)
        .with_context(|| format!("while writing {index_path:?}"))?;
    info!("updated {index_path:?}");

    Ok(())
}

fn update_feed(feed_path: &Path, fragment: &str) -> anyhow::Result<()> {
    let feed = std::fs::read_to_string(feed_path)
        .with_context(|| format!("while reading {feed_path:?}"))?;
    let Some(updated) = splice_before(&feed, FEED_MARKER, fragment) else {
        bail!("could not find {FEED_MARKER} in {FEED_FILE}");
    };
    std::fs::write(feed_path, updated)
        .with_context(|| format!("while writing {feed_path:?}"))?;
    info!("updated {feed_path:?}");

    Ok(())
}

/// Puts an existing post at the top of the homepage list and of the feed.
///
/// The homepage is written before the feed is even read. There is no rollback:
/// when the feed step fails the homepage keeps its new entry and the error says
/// so.
pub(crate) fn sync_post(site: &Site, post_path: &Path) -> anyhow::Result<Entry> {
    let entry = read_entry(post_path)?;
    let list_item = format!("\n{}", render_list_item(&entry));
    let feed_item = render_feed_item(&entry)?;

    update_index(&site.index_path(), &list_item)?;
    update_feed(&site.feed_path(), &feed_item)
        .with_context(|| format!("{INDEX_FILE} was updated but {FEED_FILE} was not"))?;

    Ok(entry)
}

/// Writes `posts/<slug>.html` from the template and publishes it.
///
/// Returns the path of the new post. If publishing fails the post is kept and
/// the error says it was created.
pub(crate) fn create_post(site: &Site, draft: &PostDraft) -> anyhow::Result<std::path::PathBuf> {
    let template_path = site.template_path();
    if !template_path.is_file() {
        bail!("{TEMPLATE_FILE} not found: {template_path:?}");
    }

    let title = draft.title.trim();
    if title.is_empty() {
        bail!("title is required");
    }

    let date = match draft.date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => today(),
    };
    if !is_valid_date(&date) {
        bail!("invalid date {date:?}, use YYYY-MM-DD");
    }

    let default_slug = slugify(title);
    let slug = match &draft.slug {
        Some(slug) => normalize_slug(slug, &default_slug),
        None => default_slug,
    };
    if slug.is_empty() {
        bail!("slug is required");
    }

    let out_path = site.post_path(&slug);
    if out_path.exists() {
        bail!("file already exists: {out_path:?}");
    }

    let template = std::fs::read_to_string(&template_path)
        .with_context(|| format!("while reading {template_path:?}"))?;
    let display_date = format_display_date(&date);
    let content = fill_template(
        &template,
        &[
            ("POST_TITLE", escape_html(title).as_str()),
            ("POST_DESCRIPTION", escape_html(draft.description.trim()).as_str()),
            ("POST_KEYWORDS", escape_html(draft.keywords.trim()).as_str()),
            ("POST_SLUG", slug.as_str()),
            ("YYYY-MM-DD", date.as_str()),
            ("Month Day, Year", display_date.as_str()),
        ],
    );
    let content = ensure_feed_link(content);

    fs_extra::dir::create_all(site.posts_dir(), false)?;
    let mut fd = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&out_path)
        .with_context(|| format!("while creating {out_path:?}"))?;
    fd.write_all(content.as_bytes())?;
    info!("created {out_path:?}");

    sync_post(site, &out_path).with_context(|| {
        format!("post created at {out_path:?} but failed to update {INDEX_FILE}/{FEED_FILE}")
    })?;

    Ok(out_path)
}
