//! Terminal view over an `ItemList`.
//!
//! # Design
//! `App` turns typed lines into `ItemList` intents and outcomes into text.
//! It never runs a request: every reaction carries the `Call`s to dispatch,
//! so the event loop decides how they execute and the view stays testable.

use std::fmt::Write as _;

use listitems_core::{ApiError, Call, HttpResponse, ItemList, ListError, RowKey, Ticket};

use crate::command::{Command, HELP};

/// A destructive intent waiting for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirm {
    Delete(RowKey),
    ClearCompleted,
}

#[derive(Debug, Default)]
pub struct Reaction {
    pub output: Vec<String>,
    pub calls: Vec<Call>,
    pub quit: bool,
}

impl Reaction {
    fn say(mut self, line: impl Into<String>) -> Self {
        self.output.push(line.into());
        self
    }
}

pub struct App {
    list: ItemList,
    assume_yes: bool,
    confirm: Option<Confirm>,
}

impl App {
    pub fn new(list: ItemList, assume_yes: bool) -> Self {
        Self {
            list,
            assume_yes,
            confirm: None,
        }
    }

    #[cfg(test)]
    pub fn list(&self) -> &ItemList {
        &self.list
    }

    /// The initial fetch.
    pub fn start(&self) -> Call {
        self.list.load()
    }

    /// Handle one line of user input.
    pub fn handle_line(&mut self, line: &str) -> Reaction {
        if let Some(confirm) = self.confirm.take() {
            return match line.trim() {
                "y" | "Y" | "yes" => self.confirmed(confirm),
                "" | "n" | "N" | "no" => Reaction::default().say("Cancelled."),
                // any other answer cancels and runs as a command
                _ => {
                    let mut reaction = self.handle_line(line);
                    reaction.output.insert(0, "Cancelled.".to_string());
                    reaction
                }
            };
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => return Reaction::default().say(err.to_string()),
        };

        match command {
            Command::Add(title) => self.intent(|list| list.add(&title)),
            Command::Toggle(n) => self.row_intent(n, |list, key| list.toggle_complete(key)),
            Command::Rename(n, title) => self.row_intent(n, |list, key| list.rename(key, &title)),
            Command::Delete(n) => match self.key_at(n) {
                Ok(key) => self.ask(Confirm::Delete(key)),
                Err(reaction) => reaction,
            },
            Command::ClearCompleted => self.ask(Confirm::ClearCompleted),
            Command::List => Reaction::default().say(self.render()),
            Command::Help => Reaction::default().say(HELP),
            Command::Quit => Reaction {
                quit: true,
                ..Reaction::default()
            },
        }
    }

    /// Apply the outcome of a dispatched call.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<HttpResponse, ApiError>) -> Reaction {
        let mut reaction = Reaction::default();
        if let Some(notice) = self.list.complete(ticket, outcome) {
            reaction = reaction.say(format!("! {notice}"));
        }
        reaction.say(self.render())
    }

    fn key_at(&self, n: usize) -> Result<RowKey, Reaction> {
        self.list
            .rows()
            .get(n - 1)
            .map(|row| row.key())
            .ok_or_else(|| Reaction::default().say(format!("There is no row {n}.")))
    }

    fn ask(&mut self, confirm: Confirm) -> Reaction {
        let prompt = match confirm {
            Confirm::Delete(key) => match self.list.delete_prompt(key) {
                Ok(prompt) => prompt,
                Err(err) => return Reaction::default().say(err.to_string()),
            },
            Confirm::ClearCompleted => match self.list.clear_completed_prompt() {
                Some(prompt) => prompt,
                None => return Reaction::default().say("Nothing to clear."),
            },
        };
        if self.assume_yes {
            return self.confirmed(confirm);
        }
        self.confirm = Some(confirm);
        Reaction::default().say(format!("{prompt} [y/N]"))
    }

    fn confirmed(&mut self, confirm: Confirm) -> Reaction {
        match confirm {
            Confirm::Delete(key) => self.intent(|list| list.delete(key)),
            Confirm::ClearCompleted => {
                let calls = self.list.clear_completed();
                Reaction {
                    calls,
                    ..Reaction::default()
                }
                .say(self.render())
            }
        }
    }

    fn intent<F>(&mut self, f: F) -> Reaction
    where
        F: FnOnce(&mut ItemList) -> Result<Call, ListError>,
    {
        match f(&mut self.list) {
            Ok(call) => Reaction {
                calls: vec![call],
                ..Reaction::default()
            }
            .say(self.render()),
            Err(err) => Reaction::default().say(err.to_string()),
        }
    }

    fn row_intent<F>(&mut self, n: usize, f: F) -> Reaction
    where
        F: FnOnce(&mut ItemList, RowKey) -> Result<Call, ListError>,
    {
        match self.key_at(n) {
            Ok(key) => self.intent(|list| f(list, key)),
            Err(reaction) => reaction,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.list.is_empty() {
            out.push_str("  (no items)\n");
        }
        for (n, row) in self.list.rows().iter().enumerate() {
            let item = row.item();
            let mark = if item.is_completed { 'x' } else { ' ' };
            let _ = write!(out, "{:>3}. [{mark}] {}", n + 1, item.title);
            if row.is_pending() {
                out.push_str("  (saving...)");
            }
            out.push('\n');
        }
        let _ = write!(
            out,
            "{} active, {} completed",
            self.list.active_count(),
            self.list.completed_count()
        );
        out
    }
}
