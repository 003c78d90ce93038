use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use todo::{FileBackend, ItemId, View};
use tracing::instrument;

use super::{
    list,
    terminal::{is_narrow, Colorize},
};

#[derive(Debug, Clone, Copy)]
enum Action {
    Add,
    Toggle,
    Edit,
    Delete,
    Quit,
}

impl Action {
    const ALL: [Self; 5] = [Self::Add, Self::Toggle, Self::Edit, Self::Delete, Self::Quit];

    const fn label(self) -> &'static str {
        match self {
            Self::Add => "Add an item",
            Self::Toggle => "Complete / reopen an item",
            Self::Edit => "Edit an item",
            Self::Delete => "Delete an item",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive session until the user quits.
#[instrument(level = "debug")]
pub fn run(root: PathBuf) -> anyhow::Result<()> {
    let (config, mut view) = super::open(root);
    let width = is_narrow(config.narrow_width).then_some(usize::from(config.narrow_width));

    loop {
        println!();
        let rows = view.rows();
        if rows.is_empty() {
            println!("{}", "Nothing to do yet.".dim());
        }
        for line in list::render(&rows, width) {
            println!("{line}");
        }
        println!();

        let labels = Action::ALL.map(Action::label);
        let Some(choice) = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact_opt()?
        else {
            break;
        };

        match Action::ALL[choice] {
            Action::Add => add(&mut view)?,
            Action::Toggle => {
                if let Some(id) = pick(&view, "Toggle which item?")? {
                    let completed = view.toggle(id)?;
                    let verb = if completed { "Completed" } else { "Reopened" };
                    println!("{}", verb.success());
                }
            }
            Action::Edit => {
                if let Some(id) = pick(&view, "Edit which item?")? {
                    edit(&mut view, id)?;
                }
            }
            Action::Delete => {
                if let Some(id) = pick(&view, "Delete which item?")? {
                    let confirmed = Confirm::new()
                        .with_prompt("Delete this item?")
                        .default(false)
                        .interact()?;
                    if confirmed {
                        view.delete(id)?;
                        println!("{}", "Deleted".success());
                    }
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

fn add(view: &mut View<FileBackend>) -> anyhow::Result<()> {
    let text: String = Input::new()
        .with_prompt("New to-do")
        .allow_empty(true)
        .interact_text()?;
    view.set_draft(text);

    let message = view
        .submit_draft()
        .map_or_else(|| "Nothing added".dim(), |_| "Added".success());
    println!("{message}");
    Ok(())
}

fn edit(view: &mut View<FileBackend>, id: ItemId) -> anyhow::Result<()> {
    view.start_editing(id)?;
    let current = view
        .rows()
        .iter()
        .find(|row| row.item.id() == id)
        .and_then(|row| row.editing)
        .unwrap_or_default()
        .to_string();

    let text: String = Input::new()
        .with_prompt("Text")
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    view.edit_draft(id, text);

    let save = Confirm::new()
        .with_prompt("Save changes?")
        .default(true)
        .interact()?;
    if save {
        view.finish_editing(id)?;
        println!("{}", "Saved".success());
    } else {
        view.cancel_editing(id);
        println!("{}", "Discarded".warning());
    }
    Ok(())
}

fn pick(view: &View<FileBackend>, prompt: &str) -> anyhow::Result<Option<ItemId>> {
    let rows = view.rows();
    if rows.is_empty() {
        println!("{}", "No items yet.".warning());
        return Ok(None);
    }

    let labels: Vec<String> = rows
        .iter()
        .map(|row| {
            let mark = if row.item.is_completed() { "[x]" } else { "[ ]" };
            format!("{mark} {}", row.item.text())
        })
        .collect();

    let choice = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|index| rows[index].item.id()))
}
