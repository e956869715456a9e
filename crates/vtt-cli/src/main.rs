//! `vtt`: command-line client for Spieltisch sessions.

mod commands;

use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};

use commands::Remote;

#[derive(Parser)]
#[command(
    name = "vtt",
    about = "Spieltisch: a polling virtual tabletop for d6 stress-dice games",
    version,
    propagate_version = true
)]
struct Cli {
    /// Server base URL
    #[arg(short, long, global = true, default_value = "http://127.0.0.1:8787")]
    server: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "5")]
    timeout: u64,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new session owned by you
    Create {
        /// Session title
        title: String,

        /// Your player id (becomes the game master)
        #[arg(long)]
        owner: String,

        /// Your display name (default: the owner id)
        #[arg(long)]
        name: Option<String>,

        /// Requested session id (default: generated)
        #[arg(long)]
        id: Option<String>,
    },

    /// Show a session
    Show {
        /// Session id
        session: String,

        /// Print the raw JSON document
        #[arg(long)]
        json: bool,

        /// Number of recent rolls to list
        #[arg(long, default_value = "5")]
        rolls: usize,
    },

    /// Join a session as a player
    Join {
        /// Session id
        session: String,

        /// Your player id
        #[arg(long)]
        player: String,

        /// Your display name (default: the player id)
        #[arg(long)]
        name: Option<String>,

        /// Your color
        #[arg(long, default_value = "")]
        color: String,

        /// The character sheet you play
        #[arg(long)]
        character: Option<String>,
    },

    /// Roll base and stress dice
    Roll {
        /// Session id
        session: String,

        /// Rolling player id
        #[arg(long)]
        player: String,

        /// Display name (default: the player id)
        #[arg(long)]
        name: Option<String>,

        /// Number of base dice
        #[arg(short, long)]
        base: u32,

        /// Number of stress dice
        #[arg(short = 'S', long, default_value = "0")]
        stress: u32,

        /// Attribute label
        #[arg(long)]
        attribute: Option<String>,

        /// Skill label
        #[arg(long)]
        skill: Option<String>,

        /// Modifier already included in the base dice, for display
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        modifier: i32,
    },

    /// Push a roll: reroll everything but sixes
    Push {
        /// Session id
        session: String,

        /// Roll id (default: the newest unpushed roll)
        roll: Option<String>,
    },

    /// Replace the shared notes
    Note {
        /// Session id
        session: String,

        /// New notes text
        text: String,
    },

    /// Delete a session (owner only)
    Delete {
        /// Session id
        session: String,

        /// Your player id
        #[arg(long)]
        requester: String,
    },

    /// Follow a session, printing new rolls and players as they arrive
    Watch {
        /// Session id
        session: String,

        /// Poll interval in milliseconds
        #[arg(long, default_value = "1000")]
        interval: u64,

        /// Stop after this many polls (default: until Ctrl-C)
        #[arg(long)]
        polls: Option<u64>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let remote = Remote::new(cli.server, Duration::from_secs(cli.timeout));

    let result = match cli.command {
        Commands::Create {
            title,
            owner,
            name,
            id,
        } => commands::create::run(&remote, title, owner, name, id).await,
        Commands::Show {
            session,
            json,
            rolls,
        } => commands::show::run(&remote, &session, json, rolls).await,
        Commands::Join {
            session,
            player,
            name,
            color,
            character,
        } => commands::join::run(&remote, &session, player, name, color, character).await,
        Commands::Roll {
            session,
            player,
            name,
            base,
            stress,
            attribute,
            skill,
            modifier,
        } => {
            let request = vtt_dice::RollRequest {
                player_name: name.unwrap_or_else(|| player.clone()),
                player_id: player,
                attribute,
                skill,
                base_dice: base,
                stress_dice: stress,
                modifier,
            };
            commands::roll::run(&remote, &session, request).await
        }
        Commands::Push { session, roll } => {
            commands::push::run(&remote, &session, roll.as_deref()).await
        }
        Commands::Note { session, text } => commands::note::run(&remote, &session, text).await,
        Commands::Delete { session, requester } => {
            commands::delete::run(&remote, &session, &requester).await
        }
        Commands::Watch {
            session,
            interval,
            polls,
        } => commands::watch::run(&remote, &session, Duration::from_millis(interval), polls).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
