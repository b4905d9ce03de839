/// Lyra - catalog browser and playback dry-run tool
use clap::{Parser, Subcommand};
use lyra_catalog_client::{CatalogClient, ClientConfig};
use lyra_core::{PlaylistId, UserId};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod dry_run;

use dry_run::PlaybackArgs;

#[derive(Parser)]
#[command(name = "lyra")]
#[command(about = "Browse a Lyra catalog and simulate playback", long_about = None)]
struct Cli {
    /// Catalog server URL
    #[arg(long, global = true, env = "LYRA_SERVER", default_value = "http://localhost:8080")]
    server: String,

    /// Print catalog results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every track in the catalog
    Tracks,
    /// Search tracks by title, artist or album
    Search {
        query: String,
    },
    /// List the playlists of a user
    Playlists {
        /// Owner user id
        #[arg(short, long)]
        user: i64,
    },
    /// Show a playlist, optionally playing it on the simulated clock
    Playlist {
        id: i64,
        /// Run the playlist through the player
        #[arg(long)]
        play: bool,
        #[command(flatten)]
        playback: PlaybackArgs,
    },
    /// Play local files on the simulated clock and log every player event
    DryRun {
        /// Audio files, played in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        playback: PlaybackArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lyra=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tracks => {
            let client = connect(&cli.server)?;
            catalog::list_tracks(&client, cli.json).await?;
        }
        Commands::Search { query } => {
            let client = connect(&cli.server)?;
            catalog::search(&client, &query, cli.json).await?;
        }
        Commands::Playlists { user } => {
            let client = connect(&cli.server)?;
            catalog::list_playlists(&client, UserId::new(user), cli.json).await?;
        }
        Commands::Playlist { id, play, playback } => {
            let client = connect(&cli.server)?;
            if play {
                dry_run::play_playlist(client, PlaylistId::new(id), playback).await?;
            } else {
                catalog::show_playlist(&client, PlaylistId::new(id), cli.json).await?;
            }
        }
        Commands::DryRun { files, playback } => {
            tokio::task::spawn_blocking(move || dry_run::play_files(&files, &playback)).await??;
        }
    }

    Ok(())
}

fn connect(server: &str) -> anyhow::Result<CatalogClient> {
    Ok(CatalogClient::new(ClientConfig::new(server))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dry_run_parses_playback_flags() {
        let cli = Cli::try_parse_from([
            "lyra",
            "dry-run",
            "a.flac",
            "b.flac",
            "--strategy",
            "repeat-all",
            "--speed",
            "50",
        ])
        .unwrap();

        let Commands::DryRun { files, playback } = cli.command else {
            panic!("expected dry-run");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(
            playback.strategy,
            Some(lyra_playback::PlaybackStrategy::RepeatAll)
        );
        assert_eq!(playback.speed, 50.0);
    }

    #[test]
    fn dry_run_requires_files() {
        assert!(Cli::try_parse_from(["lyra", "dry-run"]).is_err());
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let result = Cli::try_parse_from(["lyra", "dry-run", "a.flac", "--strategy", "loop"]);
        assert!(result.is_err());
    }
}
