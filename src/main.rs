use std::path::PathBuf;

use anyhow::bail;
use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::NewArgs;
use context::Context;
use prompt::Prompter;

mod commands;
mod context;
mod meta;
mod post;
mod prompt;
mod publisher;
mod site;
mod text;

fn cli() -> Command {
    command!()
        .about("Create and edit posts, and keep the homepage and RSS feed in sync.")
        .arg(
            Arg::new("root")
                .long("root")
                .help("Site root. Defaults to the nearest directory above holding post-template.html and index.html")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("new")
                .visible_alias("n")
                .about("Create a new post. Missing fields are prompted for")
                .args([
                    Arg::new("title").help("Post title"),
                    Arg::new("description").help("One line description"),
                    Arg::new("keywords").help("Comma separated keywords"),
                    Arg::new("date").help("Publish date (YYYY-MM-DD), today if empty"),
                    Arg::new("slug").help("File name without .html, derived from the title if empty"),
                ]),
        )
        .subcommand(
            Command::new("edit")
                .visible_alias("e")
                .about("Open a post in $EDITOR. Without a slug, pick one from the list")
                .arg(Arg::new("slug").help("Slug of the post to edit")),
        )
        .subcommand(
            Command::new("list")
                .visible_alias("l")
                .about("List all posts, newest first")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("update-links")
                .visible_alias("sync")
                .about("Add a post to index.html and feed.xml")
                .arg(
                    Arg::new("path")
                        .help("Post file relative to the site root, e.g. posts/my-post.html")
                        .required(true),
                ),
        )
}

fn new_args(matches: &ArgMatches) -> NewArgs {
    let get = |name: &str| matches.get_one::<String>(name).cloned();
    NewArgs {
        title: get("title"),
        description: get("description"),
        keywords: get("keywords"),
        date: get("date"),
        slug: get("slug"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = cli().get_matches();

    let ctx = Context::resolve(
        matches.get_one::<PathBuf>("root").map(PathBuf::as_path),
        &std::env::current_dir()?,
        context::editor_from_env(),
    )?;
    let stdin = std::io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());

    match matches.subcommand() {
        None => commands::run_menu(&ctx.site, &ctx.editor, &mut prompter),
        Some(("new", sub)) => commands::run_new(&ctx.site, new_args(sub), &mut prompter),
        Some(("edit", sub)) => commands::run_edit(
            &ctx.site,
            &ctx.editor,
            sub.get_one::<String>("slug").map(String::as_str),
            &mut prompter,
        ),
        Some(("list", sub)) => {
            commands::run_list(&ctx.site, sub.get_flag("json"), &mut std::io::stdout())
        }
        Some(("update-links", sub)) => {
            let path = sub
                .get_one::<String>("path")
                .map(String::as_str)
                .unwrap_or_default();
            commands::run_update_links(&ctx.site, path, &mut std::io::stdout())
        }
        Some((name, _)) => bail!("unknown command {name}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_new_and_aliases() {
        let matches = cli()
            .try_get_matches_from(["postcli", "n", "Hello, World!", "A test post."])
            .unwrap();
        let Some(("new", sub)) = matches.subcommand() else {
            panic!("expected new");
        };
        let args = new_args(sub);
        assert_eq!(args.title.as_deref(), Some("Hello, World!"));
        assert_eq!(args.description.as_deref(), Some("A test post."));
        assert_eq!(args.slug, None);

        let matches = cli()
            .try_get_matches_from(["postcli", "sync", "posts/a.html", "--root", "/tmp"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("root"),
            Some(&PathBuf::from("/tmp"))
        );
        assert_eq!(matches.subcommand_name(), Some("update-links"));
    }
}
