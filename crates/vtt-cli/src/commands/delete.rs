use colored::Colorize;
use vtt_client::SessionTransport;

use super::Remote;

pub async fn run(remote: &Remote, raw_id: &str, requester: &str) -> anyhow::Result<()> {
    let id = super::session_id(raw_id)?;
    remote.transport()?.delete_session(&id, requester).await?;
    println!("  {} session {}", "Deleted".red().bold(), id.to_string().bold());
    Ok(())
}
