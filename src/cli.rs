use std::path::PathBuf;

mod config;
mod list;
mod shell;
mod terminal;

use clap::ArgAction;
use list::List;
use todo::{Config, FileBackend, ItemId, ItemStore, View};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory the list is stored in
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List items, newest first (default)
    List(List),

    /// Add a new item
    Add(Add),

    /// Replace the text of an item
    Edit(Edit),

    /// Mark an item as completed
    Done(Target),

    /// Mark an item as not completed
    Undo(Target),

    /// Complete an open item or reopen a completed one
    Toggle(Target),

    /// Delete an item
    #[command(alias = "delete")]
    Rm(Target),

    /// Work on the list interactively
    Shell,

    /// Show or change the configuration
    Config(config::Config),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        match self {
            Self::List(command) => command.run(root)?,
            Self::Add(command) => command.run(root),
            Self::Edit(command) => command.run(root)?,
            Self::Done(target) => {
                let (mut view, id) = target.open(root)?;
                view.complete(id)?;
                println!("{}", format!("✅ Completed {id}").success());
            }
            Self::Undo(target) => {
                let (mut view, id) = target.open(root)?;
                view.uncomplete(id)?;
                println!("{}", format!("Reopened {id}").success());
            }
            Self::Toggle(target) => {
                let (mut view, id) = target.open(root)?;
                let verb = if view.toggle(id)? { "✅ Completed" } else { "Reopened" };
                println!("{}", format!("{verb} {id}").success());
            }
            Self::Rm(target) => {
                let (mut view, id) = target.open(root)?;
                let item = view.delete(id)?;
                println!("{}", format!("Deleted '{}'", item.text()).success());
            }
            Self::Shell => shell::run(root)?,
            Self::Config(command) => command.run(&root)?,
        }
        Ok(())
    }
}

/// Loads the configuration and the saved items under `root`.
fn open(root: PathBuf) -> (Config, View<FileBackend>) {
    let config = Config::load_or_default(&root);
    let store = ItemStore::new(FileBackend::new(root), config.storage_key());
    let mut view = View::new(store);
    view.load();
    (config, view)
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    /// The text of the item. Words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
}

impl Add {
    #[instrument]
    fn run(self, root: PathBuf) {
        use terminal::Colorize;

        let (_config, mut view) = open(root);
        view.set_draft(self.text.join(" "));

        let message = view.submit_draft().map_or_else(
            || "Empty text, nothing added".warning(),
            |id| format!("Added {id}").success(),
        );
        println!("{message}");
    }
}

#[derive(Debug, clap::Parser)]
pub struct Edit {
    /// The item's id, or a unique prefix of it
    id: String,

    /// The new text. Words are joined with spaces.
    #[arg(num_args = 0..)]
    text: Vec<String>,
}

impl Edit {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let (mut view, id) = Target { id: self.id }.open(root)?;
        view.start_editing(id)?;
        view.edit_draft(id, self.text.join(" "));
        view.finish_editing(id)?;

        println!("{}", format!("Updated {id}").success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Target {
    /// The item's id, or a unique prefix of it
    id: String,
}

impl Target {
    /// Opens the list and resolves the id.
    fn open(self, root: PathBuf) -> anyhow::Result<(View<FileBackend>, ItemId)> {
        let (_config, view) = open(root);
        let id = view.store().items().resolve(&self.id)?;
        Ok((view, id))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::tempdir;
    use todo::{Backend, Item};

    use super::*;

    /// Writes a snapshot of open items straight to `<root>/toDos.json`.
    fn seed(root: &Path, entries: &[(&str, &str, i64)]) {
        let snapshot: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|&(id, text, created)| {
                let item = serde_json::json!({
                    "id": id,
                    "text": text,
                    "isCompleted": false,
                    "createdAt": created,
                });
                (id.to_string(), item)
            })
            .collect();
        FileBackend::new(root.to_path_buf())
            .set("toDos", &serde_json::Value::Object(snapshot).to_string())
            .unwrap();
    }

    fn only_item(root: &Path) -> Item {
        let (_config, view) = open(root.to_path_buf());
        let items = view.store().items().sorted();
        assert_eq!(items.len(), 1);
        items[0].clone()
    }

    fn target(id: &str) -> Target {
        Target { id: id.to_string() }
    }

    #[test]
    fn commands_persist_across_runs() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        Add {
            text: vec!["buy".to_string(), "milk".to_string()],
        }
        .run(root.clone());
        let item = only_item(&root);
        assert_eq!(item.text(), "buy milk");
        assert!(!item.is_completed());
        assert!(root.join("toDos.json").exists());

        let id = item.id().to_string();
        let prefix = &id[..8];

        Edit {
            id: prefix.to_string(),
            text: vec!["buy oat milk".to_string()],
        }
        .run(root.clone())
        .unwrap();
        assert_eq!(only_item(&root).text(), "buy oat milk");

        Command::Done(target(prefix)).run(root.clone()).unwrap();
        assert!(only_item(&root).is_completed());

        Command::Toggle(target(prefix)).run(root.clone()).unwrap();
        assert!(!only_item(&root).is_completed());

        Command::Toggle(target(&id)).run(root.clone()).unwrap();
        Command::Undo(target(&id)).run(root.clone()).unwrap();
        let item = only_item(&root);
        assert!(!item.is_completed());
        assert_eq!(item.text(), "buy oat milk");

        Command::Rm(target(prefix)).run(root.clone()).unwrap();
        let (_config, view) = open(root);
        assert!(view.store().is_empty());
    }

    #[test]
    fn empty_add_writes_nothing() {
        let tmp = tempdir().unwrap();

        Add {
            text: vec![String::new()],
        }
        .run(tmp.path().to_path_buf());

        assert!(!tmp.path().join("toDos.json").exists());
    }

    #[test]
    fn unresolvable_targets_are_errors() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        seed(
            &root,
            &[
                ("abcd0000-0000-4000-8000-000000000001", "one", 1),
                ("abce0000-0000-4000-8000-000000000002", "two", 2),
            ],
        );

        for id in ["ffff", "abc", "", "  "] {
            assert!(Command::Done(target(id)).run(root.clone()).is_err());
            assert!(Command::Rm(target(id)).run(root.clone()).is_err());
        }

        let (_config, view) = open(root.clone());
        assert_eq!(view.store().len(), 2);
        assert_eq!(view.store().items().completed_count(), 0);

        Command::Done(target("abcd")).run(root.clone()).unwrap();
        let (_config, view) = open(root);
        assert_eq!(view.store().items().completed_count(), 1);
    }

    #[test]
    fn rendered_rows_are_newest_first() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        seed(
            &root,
            &[
                ("00000000-0000-4000-8000-000000000001", "oldest", 100),
                ("00000000-0000-4000-8000-000000000002", "newest", 300),
                ("00000000-0000-4000-8000-000000000003", "middle", 200),
            ],
        );

        let (_config, view) = open(root);
        let lines = list::render(&view.rows(), None);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("newest"));
        assert!(lines[1].contains("middle"));
        assert!(lines[2].contains("oldest"));
    }

    #[test]
    fn narrow_rows_are_truncated() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        seed(
            &root,
            &[("00000000-0000-4000-8000-000000000001", "buy oat milk today", 1)],
        );

        let (_config, view) = open(root);
        let rows = view.rows();

        let narrow = list::render(&rows, Some(20));
        assert!(narrow[0].contains("buy oa…"));
        assert!(!narrow[0].contains("today"));

        let wide = list::render(&rows, None);
        assert!(wide[0].contains("buy oat milk today"));
    }
}
