/// Reel - terminal player for repository-hosted music
use clap::Parser;
use reel_library::{LibraryOutcome, LibraryResolver};
use reel_playback::PlaybackController;
use reel_repo_client::{RepoClient, RepoConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod sink;

use sink::RodioSink;

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "Play music straight from a repository's folder structure", long_about = None)]
struct Cli {
    /// Repository owner (user or organisation)
    owner: String,

    /// Repository name
    repo: String,

    /// Branch the listings and raw URLs are pinned to
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Resolve and print the library, then exit without playing
    #[arg(long)]
    list_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let client = RepoClient::new(RepoConfig::new(cli.owner, cli.repo, cli.branch))?;
    let resolver = LibraryResolver::new(client);

    tracing::info!("Loading repository");
    let library = match resolver.build().await? {
        LibraryOutcome::Library(library) => library,
        LibraryOutcome::Empty => {
            // A repository without audio is a valid outcome, not an error.
            println!("No playlists or audio files found in this repository.");
            println!("Add folders with mp3/wav/ogg/m4a files to create playlists.");
            return Ok(());
        }
    };
    tracing::info!(playlists = library.len(), "Library loaded");

    if cli.list_only {
        for playlist in library.playlists() {
            println!("{} ({} tracks)", playlist.name, playlist.len());
            for (index, track) in playlist.tracks.iter().enumerate() {
                println!("  [{index}] {}", track.name);
            }
        }
        return Ok(());
    }

    let sink = RodioSink::new()?;
    let controller = PlaybackController::new(library, sink);
    app::run(controller).await
}
