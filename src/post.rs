use std::{cmp::Ordering, io::ErrorKind, path::Path};

use anyhow::Context;
use log::{debug, warn};
use serde::Serialize;

use crate::meta::{extract_date, extract_title};

/// A post found in the posts directory. Nothing here is stored anywhere, it
/// is re-read from the file on every run.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub slug: String,
    pub file: String,
    pub title: String,
    /// `YYYY-MM-DD` as written in the post; empty when missing.
    pub date: String,
    pub path: std::path::PathBuf,
}

/// Newest first. An empty date is the smallest string, so undated posts end up
/// last; equal dates fall back to the slug.
pub(crate) fn sort_post(a: &Post, b: &Post) -> Ordering {
    b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug))
}

fn read_post(path: &Path, file_name: &str) -> anyhow::Result<Post> {
    let slug = file_name
        .strip_suffix(".html")
        .unwrap_or(file_name)
        .to_string();
    let html = std::fs::read_to_string(path)?;

    let mut title = extract_title(&html);
    if title.is_empty() {
        debug!("{path:?} has no title, using its slug");
        title = slug.clone();
    }

    Ok(Post {
        title,
        date: extract_date(&html),
        file: file_name.to_string(),
        path: path.to_owned(),
        slug,
    })
}

/// Every `*.html` directly inside `posts_dir`, newest first. A missing
/// directory is just an empty site.
pub(crate) fn list_posts(posts_dir: &Path) -> anyhow::Result<Vec<Post>> {
    let entries = match std::fs::read_dir(posts_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{posts_dir:?} does not exist. no posts.");
            return Ok(vec![]);
        }
        Err(e) => return Err(e).with_context(|| format!("while reading {posts_dir:?}")),
    };

    let mut posts = vec![];
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !file_name.ends_with(".html") {
            continue;
        }

        match read_post(&entry.path(), &file_name) {
            Ok(post) => posts.push(post),
            Err(e) => warn!("skipping {:?}: {e}", entry.path()),
        }
    }
    posts.sort_by(sort_post);

    Ok(posts)
}
