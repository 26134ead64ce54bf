use std::path::Path;

use anyhow::bail;

use crate::site::Site;

const FALLBACK_EDITOR: &str = "nano";

/// Settings resolved once at startup and handed to every command.
#[derive(Debug)]
pub(crate) struct Context {
    pub site: Site,
    pub editor: String,
}

impl Context {
    /// Uses `root` when given, otherwise looks for the site above `cwd`.
    pub fn resolve(root: Option<&Path>, cwd: &Path, editor: String) -> anyhow::Result<Self> {
        let site = match root {
            Some(root) => {
                if !root.is_dir() {
                    bail!("root must be a directory.");
                }
                Site::new(root)
            }
            None => Site::discover(cwd)?,
        };

        Ok(Self { site, editor })
    }
}

/// `$EDITOR`, then `$VISUAL`, then nano.
pub(crate) fn editor_from_env() -> String {
    ["EDITOR", "VISUAL"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}
