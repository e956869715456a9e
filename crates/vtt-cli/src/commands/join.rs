use colored::Colorize;
use vtt_client::SessionTransport;
use vtt_core::PlayerJoin;
use vtt_session::Action;

use super::Remote;

pub async fn run(
    remote: &Remote,
    raw_id: &str,
    player: String,
    name: Option<String>,
    color: String,
    character: Option<String>,
) -> anyhow::Result<()> {
    let id = super::session_id(raw_id)?;
    let join = PlayerJoin {
        name: name.unwrap_or_else(|| player.clone()),
        id: player,
        color,
        character_id: character,
    };
    let player_id = join.id.clone();
    let session = remote
        .transport()?
        .submit(&id, &Action::JoinPlayer(join))
        .await?;

    let role = if session.is_owner(&player_id) {
        "game master"
    } else {
        "player"
    };
    println!(
        "  {} {} as {role} ({} at the table)",
        "Joined".green().bold(),
        session.id.to_string().bold(),
        session.players.len()
    );
    Ok(())
}
