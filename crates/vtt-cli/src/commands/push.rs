use anyhow::{Context, bail};
use colored::Colorize;
use vtt_client::SessionTransport;
use vtt_session::Action;

use super::Remote;

pub async fn run(remote: &Remote, raw_id: &str, roll_id: Option<&str>) -> anyhow::Result<()> {
    let id = super::session_id(raw_id)?;
    let transport = remote.transport()?;

    let roll_id = match roll_id {
        Some(roll_id) => roll_id.to_string(),
        None => {
            let session = transport.read_session(&id).await?;
            session
                .dice_rolls
                .iter()
                .find(|r| !r.pushed)
                .map(|r| r.id.clone())
                .context("no unpushed roll to push")?
        }
    };

    let session = transport
        .submit(
            &id,
            &Action::PushRoll {
                roll_id: roll_id.clone(),
            },
        )
        .await?;

    let Some(roll) = session.dice_rolls.get(&roll_id) else {
        bail!("roll '{roll_id}' is not in the session's log");
    };
    println!("  {}", "Pushed".yellow().bold());
    super::print_roll(roll);
    Ok(())
}
