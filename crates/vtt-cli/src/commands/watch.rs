use std::collections::HashSet;
use std::time::Duration;

use colored::Colorize;
use tokio::sync::{mpsc, watch};
use vtt_client::{NoticeLevel, SessionTransport, SyncConfig, Synchronizer};

use super::Remote;

/// What the watcher has already printed.
#[derive(Default)]
struct Seen {
    rolls: HashSet<String>,
    pushed: HashSet<String>,
    players: HashSet<String>,
    primed: bool,
}

pub async fn run(
    remote: &Remote,
    raw_id: &str,
    interval: Duration,
    polls: Option<u64>,
) -> anyhow::Result<()> {
    let id = super::session_id(raw_id)?;
    let transport = remote.transport()?;
    let config = SyncConfig::default().with_poll_interval(interval);
    let mut sync = Synchronizer::new(transport, id, config);

    // Fail fast on a missing session or unreachable server.
    sync.poll_once().await?;
    println!(
        "  {} {} {}",
        "Watching".bold(),
        sync.session_id().to_string().bold(),
        "(Ctrl-C to stop)".dimmed()
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let ctrl_c_tx = stop_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = ctrl_c_tx.send(true);
        }
    });

    let mut seen = Seen::default();
    report(&mut sync, &mut seen);

    // Watching is read-only; the loop gets no commands.
    let (_commands, command_rx) = mpsc::channel(1);
    let mut remaining = polls;
    sync.run(command_rx, stop_rx, |sync| {
        report(sync, &mut seen);
        if let Some(left) = remaining.as_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                let _ = stop_tx.send(true);
            }
        }
    })
    .await;

    Ok(())
}

fn report<T: SessionTransport>(sync: &mut Synchronizer<T>, seen: &mut Seen) {
    for notice in sync.take_notices() {
        let tag = match notice.level {
            NoticeLevel::Warning => "warn".yellow().bold(),
            NoticeLevel::Info => "info".cyan().bold(),
        };
        eprintln!("  {tag} {}", notice.message);
    }

    let Some(session) = sync.view() else {
        return;
    };

    for player in &session.players {
        if seen.players.insert(player.id.clone()) && seen.primed {
            println!("  {} {}", "+".green().bold(), player.name);
        }
    }

    // The log is newest first; print oldest first.
    let rolls: Vec<_> = session.dice_rolls.iter().collect();
    for roll in rolls.into_iter().rev() {
        let new_roll = seen.rolls.insert(roll.id.clone());
        let new_push = roll.pushed && seen.pushed.insert(roll.id.clone());
        if !seen.primed {
            continue;
        }
        if new_roll || new_push {
            if new_push && !new_roll {
                println!("  {}", "Pushed".yellow().bold());
            }
            super::print_roll(roll);
        }
    }

    if !seen.primed {
        seen.primed = true;
        if let Some(latest) = session.dice_rolls.latest() {
            super::print_roll(latest);
        }
    }
}
