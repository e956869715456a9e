use colored::Colorize;
use vtt_client::SessionTransport;
use vtt_session::Action;

use super::Remote;

pub async fn run(remote: &Remote, raw_id: &str, text: String) -> anyhow::Result<()> {
    let id = super::session_id(raw_id)?;
    let session = remote
        .transport()?
        .submit(&id, &Action::UpdateSharedNotes { notes: text })
        .await?;
    println!(
        "  {} notes ({} chars)",
        "Updated".green().bold(),
        session.shared_notes.chars().count()
    );
    Ok(())
}
