use chrono::{Duration, Utc};
use colored::Colorize;
use vtt_client::SessionTransport;

use super::Remote;

/// Players seen this recently count as at the table.
const ACTIVE_WINDOW_MINUTES: i64 = 5;

pub async fn run(remote: &Remote, raw_id: &str, json: bool, rolls: usize) -> anyhow::Result<()> {
    let id = super::session_id(raw_id)?;
    let session = remote.transport()?.read_session(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    let title = if session.title.is_empty() {
        "(untitled)".to_string()
    } else {
        session.title.clone()
    };
    println!("  {} [{}]", title.bold(), session.id.to_string().dimmed());
    println!(
        "  {}",
        format!("updated {}", session.last_updated.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
    );

    let scene: &str = if session.scene.name.is_empty() {
        "(unnamed)"
    } else {
        &session.scene.name
    };
    println!();
    println!("  Scene: {scene}");
    if let Some(track) = &session.current_track {
        println!("  Music: {}", track.name);
    }

    println!();
    let active: Vec<&str> = session
        .active_players(Utc::now(), Duration::minutes(ACTIVE_WINDOW_MINUTES))
        .into_iter()
        .map(|p| p.id.as_str())
        .collect();
    println!(
        "  {} {}",
        "Players".bold().underline(),
        format!("({} active)", active.len()).dimmed()
    );
    if session.players.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for player in &session.players {
        let gm = if player.is_owner { " GM" } else { "" };
        let away = if active.contains(&player.id.as_str()) {
            ""
        } else {
            " away"
        };
        let character = player
            .character_id
            .as_deref()
            .and_then(|cid| session.character(cid))
            .map(|c| format!(" as {}", c.name))
            .unwrap_or_default();
        println!(
            "    {}{}{}{}",
            player.name,
            gm.cyan(),
            character.dimmed(),
            away.yellow()
        );
    }

    if !session.characters.is_empty() {
        println!();
        println!("  {}", "Characters".bold().underline());
        for sheet in &session.characters {
            println!(
                "    {}  health {}  stress {}",
                sheet.name, sheet.health, sheet.stress
            );
        }
    }

    if !session.npcs.is_empty() {
        println!();
        println!("  {}", "NPCs".bold().underline());
        for npc in &session.npcs {
            println!("    {}", npc.name);
        }
    }

    println!();
    println!("  {} {}", "Tokens:".bold(), session.tokens.len());

    if !session.shared_notes.is_empty() {
        println!();
        println!("  {}", "Notes".bold().underline());
        for line in session.shared_notes.lines() {
            println!("    {line}");
        }
    }

    if rolls > 0 && !session.dice_rolls.is_empty() {
        println!();
        println!("  {}", "Recent rolls".bold().underline());
        for roll in session.dice_rolls.iter().take(rolls) {
            super::print_roll(roll);
        }
    }

    Ok(())
}
