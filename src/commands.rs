use std::{
    io::{BufRead, Write},
    path::Path,
    process::Command,
};

use anyhow::{anyhow, bail, Context};
use log::debug;

use crate::{
    post::{list_posts, Post},
    prompt::Prompter,
    publisher::{create_post, data::PostDraft, sync_post, BASE_URL},
    site::{Site, FEED_FILE, INDEX_FILE, POSTS_DIR},
    text::{slugify, today},
};

/// Fields given on the command line for `new`. Whatever is missing is asked
/// for.
#[derive(Debug, Clone, Default)]
pub(crate) struct NewArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub date: Option<String>,
    pub slug: Option<String>,
}

fn given_or_ask<R: BufRead, W: Write>(
    given: Option<String>,
    prompter: &mut Prompter<R, W>,
    label: &str,
    default: &str,
) -> anyhow::Result<String> {
    match given {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => prompter.ask(label, default),
    }
}

fn draft_from<R: BufRead, W: Write>(
    args: NewArgs,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<PostDraft> {
    let title = given_or_ask(args.title, prompter, "Title", "")?;
    let title = title.trim().to_string();
    if title.is_empty() {
        bail!("title is required");
    }

    let description =
        given_or_ask(args.description, prompter, "Description (meta, one line)", "")?;
    let keywords = given_or_ask(args.keywords, prompter, "Keywords (comma-separated)", "")?;
    let date = given_or_ask(args.date, prompter, "Date (YYYY-MM-DD)", &today())?;
    let slug = given_or_ask(args.slug, prompter, "Slug (filename)", &slugify(&title))?;

    Ok(PostDraft {
        title,
        description,
        keywords,
        date: Some(date),
        slug: Some(slug),
    })
}

pub(crate) fn run_new<R: BufRead, W: Write>(
    site: &Site,
    args: NewArgs,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let draft = draft_from(args, prompter)?;
    let path = create_post(site, &draft)?;

    let out = prompter.output();
    writeln!(out, "Created: {}", path.display())?;
    writeln!(out, "Updated {INDEX_FILE} and {FEED_FILE}.")?;
    writeln!(out)?;
    writeln!(out, "Next: edit the post body in {}", path.display())?;

    Ok(())
}

/// Runs the editor on `path` with the terminal handed over, and waits for it.
pub(crate) fn open_in_editor(editor: &str, path: &Path) -> anyhow::Result<()> {
    let mut words = editor.split_whitespace();
    let program = words.next().ok_or_else(|| anyhow!("no editor configured"))?;

    debug!("running {program:?} on {path:?}");
    let status = Command::new(program)
        .args(words)
        .arg(path)
        .status()
        .with_context(|| format!("failed to start editor {editor:?}"))?;
    if !status.success() {
        bail!("editor {editor:?} exited with {status}");
    }

    Ok(())
}

fn choose_post<R: BufRead, W: Write>(
    posts: Vec<Post>,
    slug: Option<&str>,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<Post> {
    if let Some(slug) = slug {
        let wanted = slug.strip_suffix(".html").unwrap_or(slug);
        return posts
            .into_iter()
            .find(|p| p.slug == wanted)
            .ok_or_else(|| anyhow!("post not found: {slug}"));
    }

    let out = prompter.output();
    writeln!(out)?;
    for (i, post) in posts.iter().enumerate() {
        if post.date.is_empty() {
            writeln!(out, "  {}) {}", i + 1, post.title)?;
        } else {
            writeln!(out, "  {}) {} ({})", i + 1, post.title, post.date)?;
        }
    }
    writeln!(out)?;

    let choice = prompter.ask(&format!("Edit which? (1-{})", posts.len()), "")?;
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| posts.into_iter().nth(i))
        .ok_or_else(|| anyhow!("invalid number"))
}

pub(crate) fn run_edit<R: BufRead, W: Write>(
    site: &Site,
    editor: &str,
    slug: Option<&str>,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let posts = list_posts(&site.posts_dir())?;
    if posts.is_empty() {
        bail!("no posts yet; create one with: postcli new");
    }

    let target = choose_post(posts, slug, prompter)?;
    writeln!(prompter.output(), "Opening {} in {editor}...\n", target.file)?;
    prompter.output().flush()?;
    open_in_editor(editor, &target.path)?;

    writeln!(
        prompter.output(),
        "Done. Run 'postcli update-links {POSTS_DIR}/{}' if you changed title/date/description.",
        target.file
    )?;

    Ok(())
}

pub(crate) fn run_list(site: &Site, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let posts = list_posts(&site.posts_dir())?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &posts)?;
        writeln!(out)?;
        return Ok(());
    }

    if posts.is_empty() {
        writeln!(out, "  No posts.")?;
        return Ok(());
    }
    writeln!(out)?;
    for post in &posts {
        writeln!(out, "  {}", post.title)?;
        if post.date.is_empty() {
            writeln!(out, "    {POSTS_DIR}/{}", post.file)?;
        } else {
            writeln!(out, "    {POSTS_DIR}/{}  {}", post.file, post.date)?;
        }
    }
    writeln!(out)?;

    Ok(())
}

pub(crate) fn run_update_links(
    site: &Site,
    post_path: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if !post_path.starts_with(&format!("{POSTS_DIR}/")) || !post_path.ends_with(".html") {
        bail!("path must be {POSTS_DIR}/...html");
    }
    let full_path = site.root.join(post_path);
    if !full_path.is_file() {
        bail!("post file not found: {full_path:?}");
    }

    let entry = sync_post(site, &full_path)?;
    writeln!(out, "Updated {INDEX_FILE} (Writing section).")?;
    writeln!(out, "Updated {FEED_FILE}.")?;
    writeln!(out, "Done. New post added to homepage and RSS: {}", entry.title)?;

    Ok(())
}

/// Main menu, shown again after every command until the user quits.
pub(crate) fn run_menu<R: BufRead, W: Write>(
    site: &Site,
    editor: &str,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let host = BASE_URL
        .split_once("://")
        .map_or(BASE_URL, |(_, host)| host);
    loop {
        let out = prompter.output();
        writeln!(out, "\n  Posts — {host}\n")?;
        writeln!(out, "  1) New post")?;
        writeln!(out, "  2) Edit post")?;
        writeln!(out, "  3) List posts")?;
        writeln!(out, "  q) Quit\n")?;
        write!(out, "  Choice (1-3 or q): ")?;
        out.flush()?;

        let Some(choice) = prompter.read_line()? else {
            return Ok(());
        };
        let res = match choice.to_lowercase().as_str() {
            "" | "q" | "quit" => return Ok(()),
            "1" | "new" | "n" => run_new(site, NewArgs::default(), prompter),
            "2" | "edit" | "e" => run_edit(site, editor, None, prompter),
            "3" | "list" | "l" => run_list(site, false, prompter.output()),
            _ => {
                writeln!(prompter.output(), "  Unknown option. Use 1-3 or q.")?;
                Ok(())
            }
        };
        if let Err(e) = res {
            eprintln!("{e:#}");
        }
    }
}
