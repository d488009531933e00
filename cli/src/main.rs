//! Interactive terminal front end for the list item API.
//!
//! Reads commands from stdin and keeps the list on screen. Every server call
//! runs as its own task; outcomes come back over a channel and are applied
//! as they arrive, so typing never waits on the network.

mod app;
mod command;
mod transport;

use std::io::Write as _;

use clap::Parser;
use listitems_core::{ApiError, Call, HttpResponse, ItemList, ListItemClient, Ticket};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Reaction};

type Outcome = (Ticket, Result<HttpResponse, ApiError>);

#[derive(Parser)]
#[command(name = "listitems")]
#[command(about = "Keep a todo list on a list item server")]
struct Cli {
    /// Server to talk to.
    #[arg(long, env = "LISTITEMS_URL", default_value = "http://localhost:5299")]
    base_url: String,
    /// Do not ask before deleting.
    #[arg(long, default_value_t = false)]
    yes: bool,
}

fn dispatch(agent: &ureq::Agent, tx: &mpsc::UnboundedSender<Outcome>, call: Call) {
    let agent = agent.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let Call { ticket, request } = call;
        let outcome = tokio::task::spawn_blocking(move || transport::execute(&agent, request))
            .await
            .unwrap_or_else(|e| Err(ApiError::Transport(e.to_string())));
        if tx.send((ticket, outcome)).is_err() {
            tracing::debug!("outcome arrived after shutdown");
        }
    });
}

fn show(reaction: &Reaction) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    for line in &reaction.output {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let agent = transport::agent();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();

    let mut app = App::new(ItemList::new(ListItemClient::new(&cli.base_url)), cli.yes);
    println!("Connected to {}. Type `help` for commands.", cli.base_url);
    dispatch(&agent, &tx, app.start());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let reaction = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => app.handle_line(&line),
                None => break,
            },
            Some((ticket, outcome)) = rx.recv() => app.settle(ticket, outcome),
        };
        show(&reaction)?;
        if reaction.quit {
            break;
        }
        for call in reaction.calls {
            dispatch(&agent, &tx, call);
        }
    }
    Ok(())
}
