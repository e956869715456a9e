use anyhow::Context;
use vtt_client::SessionTransport;
use vtt_dice::RollRequest;
use vtt_session::Action;

use super::Remote;

pub async fn run(remote: &Remote, raw_id: &str, request: RollRequest) -> anyhow::Result<()> {
    let id = super::session_id(raw_id)?;
    let player_id = request.player_id.clone();
    let session = remote
        .transport()?
        .submit(&id, &Action::RollDice(request))
        .await?;

    // The newest roll by this player is the one we just made, barring a
    // racing roll by the same player.
    let roll = session
        .dice_rolls
        .iter()
        .find(|r| r.player_id == player_id)
        .context("the server did not record the roll")?;
    super::print_roll(roll);
    Ok(())
}
