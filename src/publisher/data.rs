/// Everything asked of the author for a new post. Only the title is required,
/// the rest gets defaults while the post is written.
#[derive(Debug, Clone, Default)]
pub(crate) struct PostDraft {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub date: Option<String>,
    pub slug: Option<String>,
}

/// Metadata read back from a post, checked and ready to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
}

impl Entry {
    pub fn url(&self) -> String {
        format!("{}/posts/{}.html", super::BASE_URL, self.slug)
    }
}
