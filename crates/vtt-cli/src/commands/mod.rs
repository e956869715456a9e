pub mod create;
pub mod delete;
pub mod join;
pub mod note;
pub mod push;
pub mod roll;
pub mod show;
pub mod watch;

use std::time::Duration;

use anyhow::Context;
use colored::Colorize;
use vtt_client::HttpTransport;
use vtt_core::{DiceRoll, SessionId};

/// Where the server lives and how long to wait for it.
pub struct Remote {
    server: String,
    timeout: Duration,
}

impl Remote {
    pub fn new(server: String, timeout: Duration) -> Self {
        Self { server, timeout }
    }

    pub fn transport(&self) -> anyhow::Result<HttpTransport> {
        HttpTransport::new(&self.server, self.timeout)
            .with_context(|| format!("cannot set up a client for {}", self.server))
    }
}

/// Parse a session id given on the command line.
fn session_id(raw: &str) -> anyhow::Result<SessionId> {
    SessionId::parse(raw).with_context(|| format!("'{raw}' is not a valid session id"))
}

/// One line per roll, faces colored: sixes green, stress ones red.
fn print_roll(roll: &DiceRoll) {
    let faces = |values: &[u8], ones_red: bool| {
        values
            .iter()
            .map(|&v| match v {
                6 => v.to_string().green().bold().to_string(),
                1 if ones_red => v.to_string().red().bold().to_string(),
                _ => v.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    };

    let label = match (&roll.attribute, &roll.skill) {
        (Some(a), Some(s)) => format!(" ({a}/{s})"),
        (Some(a), None) => format!(" ({a})"),
        (None, Some(s)) => format!(" ({s})"),
        (None, None) => String::new(),
    };

    println!(
        "  {}{}  base [{}]  stress [{}]",
        roll.player_name.bold(),
        label.dimmed(),
        faces(&roll.base_results, false),
        faces(&roll.stress_results, true),
    );

    let verdict = vtt_dice::outcome(roll);
    let verdict = if verdict.is_success() {
        verdict.to_string().green()
    } else {
        verdict.to_string().yellow()
    };
    let pushed = if roll.pushed { " pushed" } else { "" };
    println!("    {verdict}{}  {}", pushed.dimmed(), roll.id.dimmed());
}
