use std::path::{Path, PathBuf};

use anyhow::bail;
use log::debug;

pub(crate) const TEMPLATE_FILE: &str = "post-template.html";
pub(crate) const INDEX_FILE: &str = "index.html";
pub(crate) const FEED_FILE: &str = "feed.xml";
pub(crate) const POSTS_DIR: &str = "posts";

/// File layout of the site checkout.
#[derive(Debug, Clone)]
pub(crate) struct Site {
    pub root: PathBuf,
}

impl Site {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walks up from `start` until a directory holding both the post template
    /// and the homepage is found.
    pub fn discover(start: &Path) -> anyhow::Result<Self> {
        for dir in start.ancestors() {
            debug!("looking for site root in {dir:?}");
            if dir.join(TEMPLATE_FILE).is_file() && dir.join(INDEX_FILE).is_file() {
                return Ok(Self::new(dir));
            }
        }
        bail!("repo root not found (run from project directory)");
    }

    pub fn template_path(&self) -> PathBuf {
        self.root.join(TEMPLATE_FILE)
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn feed_path(&self) -> PathBuf {
        self.root.join(FEED_FILE)
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.root.join(POSTS_DIR)
    }

    pub fn post_path(&self, slug: &str) -> PathBuf {
        self.posts_dir().join(format!("{slug}.html"))
    }
}
