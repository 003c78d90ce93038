use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, ValueEnum};
use todo::{Item, Row};
use tracing::instrument;

use super::terminal::{is_narrow, truncate, Colorize};

/// Characters of the id shown in tables; enough to address an item.
const SHORT_ID: usize = 8;

/// Command arguments for `todo list`.
#[derive(Debug, Parser, Default)]
#[command(about = "List items, newest first")]
pub struct List {
    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and colours; print `ID<TAB>DONE<TAB>TEXT` lines.
    #[arg(long, short)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (config, view) = super::open(root);
        let rows = view.rows();

        match self.output {
            OutputFormat::Json => {
                let items: Vec<&Item> = rows.iter().map(|row| row.item).collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            }
            OutputFormat::Table if self.quiet => {
                for row in &rows {
                    let item = row.item;
                    println!("{}\t{}\t{}", item.id(), u8::from(item.is_completed()), item.text());
                }
            }
            OutputFormat::Table => {
                if rows.is_empty() {
                    println!("Nothing to do. Add an item with 'todo add <TEXT>'.");
                    return Ok(());
                }
                let width = is_narrow(config.narrow_width).then_some(usize::from(config.narrow_width));
                for line in render(&rows, width) {
                    println!("{line}");
                }
                let done = view.store().items().completed_count();
                println!(
                    "\n{}",
                    format!("{} items, {done} done", rows.len()).dim()
                );
            }
        }
        Ok(())
    }
}

/// Formats rows for display, one line per item.
///
/// With `width`, the text column is shortened so each line fits.
pub fn render(rows: &[Row<'_>], width: Option<usize>) -> Vec<String> {
    rows.iter()
        .map(|row| {
            let item = row.item;
            let id = item.id().to_string();
            let short_id = &id[..SHORT_ID];
            let mark = if item.is_completed() { "[x]" } else { "[ ]" };
            let created = item
                .created_at()
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string();

            let (text, editing) = row
                .editing
                .map_or((item.text(), ""), |buffer| (buffer, " (editing)"));
            // id, mark and two separating spaces
            let text = width.map_or_else(
                || text.to_string(),
                |width| truncate(text, width.saturating_sub(SHORT_ID + 5).max(1)),
            );
            let text = if item.is_completed() { text.done() } else { text };

            if width.is_some() {
                format!("{} {mark} {text}{editing}", short_id.info())
            } else {
                format!(
                    "{} {mark} {text}{}  {}",
                    short_id.info(),
                    editing.warning(),
                    created.dim()
                )
            }
        })
        .collect()
}
