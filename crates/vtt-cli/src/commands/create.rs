use colored::Colorize;
use vtt_client::SessionTransport;
use vtt_session::CreateSession;

use super::Remote;

pub async fn run(
    remote: &Remote,
    title: String,
    owner: String,
    name: Option<String>,
    id: Option<String>,
) -> anyhow::Result<()> {
    let transport = remote.transport()?;
    let request = CreateSession {
        id,
        title,
        owner_name: name.unwrap_or_else(|| owner.clone()),
        owner_id: owner,
        owner_color: String::new(),
    };
    let session = transport.create_session(&request).await?;

    println!("  {} session {}", "Created".green().bold(), session.id.to_string().bold());
    if !session.title.is_empty() {
        println!("  {}", session.title);
    }
    println!("  owner: {}", session.owner_id);
    Ok(())
}
