//! Interactive command loop.
//!
//! One logical thread of control: stdin commands and the periodic
//! playback tick are multiplexed on the same task, and the controller is
//! the only thing that ever touches the sink.

use crate::sink::RodioSink;
use reel_core::{format_duration, Library};
use reel_playback::{PlaybackController, PlaybackEvent, Transport};
use std::time::Duration;
use tokio::io::AsyncBufReadExt;

/// One parsed stdin command.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Playlists,
    Tracks(Option<String>),
    Play { playlist: String, index: usize },
    Pause,
    Next,
    Prev,
    Seek(f64),
    Enqueue { playlist: String, index: usize },
    ShowQueue,
    Now,
    Help,
    Quit,
}

impl Command {
    fn parse(input: &str) -> Result<Self, String> {
        let mut parts = input.split_whitespace();
        let keyword = parts.next().unwrap_or_default();
        let rest: Vec<&str> = parts.collect();

        match keyword {
            "playlists" | "ls" => Ok(Self::Playlists),
            "tracks" => Ok(Self::Tracks(if rest.is_empty() {
                None
            } else {
                Some(rest.join(" "))
            })),
            "play" | "p" => {
                let (playlist, index) = parse_target(&rest)
                    .ok_or_else(|| "Usage: play <playlist> <index>".to_string())?;
                Ok(Self::Play { playlist, index })
            }
            "pause" | "toggle" => Ok(Self::Pause),
            "next" | "n" => Ok(Self::Next),
            "prev" | "previous" => Ok(Self::Prev),
            "seek" => {
                let secs = rest
                    .first()
                    .and_then(|s| s.parse::<f64>().ok())
                    .ok_or_else(|| "Usage: seek <seconds>".to_string())?;
                Ok(Self::Seek(secs))
            }
            "queue" | "q" => {
                if rest.is_empty() {
                    Ok(Self::ShowQueue)
                } else {
                    let (playlist, index) = parse_target(&rest)
                        .ok_or_else(|| "Usage: queue <playlist> <index>".to_string())?;
                    Ok(Self::Enqueue { playlist, index })
                }
            }
            "now" => Ok(Self::Now),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command {other:?}; type `help`.")),
        }
    }
}

/// Split `<playlist...> <index>`, letting playlist names contain spaces.
fn parse_target(rest: &[&str]) -> Option<(String, usize)> {
    let (index_str, name_parts) = rest.split_last()?;
    if name_parts.is_empty() {
        return None;
    }
    let index = index_str.parse().ok()?;
    Some((name_parts.join(" "), index))
}

/// Run the interactive loop until `quit` or end of input.
pub async fn run(mut controller: PlaybackController<RodioSink>) -> anyhow::Result<()> {
    print_playlists(controller.library());
    println!("Type `help` for commands.");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&mut controller, command).await,
                    Err(message) => println!("{message}"),
                }
            }
            _ = ticker.tick() => {
                if let Err(e) = controller.tick().await {
                    println!("Playback stopped: {e}");
                }
            }
        }

        for event in controller.take_events() {
            render_event(&event);
        }
    }

    Ok(())
}

async fn execute(controller: &mut PlaybackController<RodioSink>, command: Command) {
    match command {
        Command::Playlists => print_playlists(controller.library()),
        Command::Tracks(name) => print_tracks(controller, name).await,
        Command::Play { playlist, index } => {
            if let Err(e) = controller.select_track(&playlist, index).await {
                println!("{e}");
            }
        }
        Command::Pause => controller.toggle_play_pause(),
        Command::Next => {
            if let Err(e) = controller.next().await {
                println!("{e}");
            }
        }
        Command::Prev => {
            if let Err(e) = controller.previous().await {
                println!("{e}");
            }
        }
        Command::Seek(secs) => {
            if let Err(e) = controller.seek(secs) {
                println!("{e}");
            }
        }
        Command::Enqueue { playlist, index } => match controller.enqueue(&playlist, index) {
            Ok(()) => {}
            Err(e) => println!("{e}"),
        },
        Command::ShowQueue => print_queue(controller),
        Command::Now => print_now(controller),
        Command::Help => print_help(),
        Command::Quit => {}
    }
}

fn render_event(event: &PlaybackEvent) {
    match event {
        PlaybackEvent::TrackChanged { playlist, name, .. } => {
            println!("▶ {name} • {playlist}");
        }
        PlaybackEvent::TrackFailed { index, message, .. } => {
            println!("Skipping track {index}: {message}");
        }
        PlaybackEvent::PlaylistExhausted { playlist } => {
            println!("No playable track in {playlist:?}.");
        }
        PlaybackEvent::QueueChanged { length } => {
            println!("Queue: {length} pending.");
        }
        PlaybackEvent::StateChanged { .. } | PlaybackEvent::PositionUpdate { .. } => {}
    }
}

fn print_playlists(library: &Library) {
    println!("Playlists:");
    for playlist in library.playlists() {
        println!("  {} ({} tracks)", playlist.name, playlist.len());
    }
}

async fn print_tracks(controller: &mut PlaybackController<RodioSink>, name: Option<String>) {
    let name = name
        .or_else(|| controller.status().playlist)
        .or_else(|| controller.library().names().next().map(String::from));
    let Some(name) = name else {
        println!("No playlists.");
        return;
    };
    let Some(len) = controller.library().playlist(&name).map(reel_core::Playlist::len) else {
        println!("Unknown playlist: {name:?}");
        return;
    };

    println!("{name}:");
    for index in 0..len {
        // Durations come from on-demand probes, cached per track.
        let duration = controller.probe_duration(&name, index).await;
        let track_name = controller
            .library()
            .track(&name, index)
            .map(|t| t.name.clone())
            .unwrap_or_default();
        println!("  [{index}] {track_name}  {}", format_duration(duration));
    }
}

fn print_queue(controller: &PlaybackController<RodioSink>) {
    if controller.queue().is_empty() {
        println!("Queue is empty.");
        return;
    }
    println!("Queue:");
    for entry in controller.queue().entries() {
        let name = controller
            .library()
            .track(&entry.playlist, entry.index)
            .map(|t| t.name.as_str())
            .unwrap_or("(no longer in library)");
        println!("  {} [{}] {name}", entry.playlist, entry.index);
    }
}

fn print_now(controller: &mut PlaybackController<RodioSink>) {
    let name = controller.current_track().map(|t| t.name.clone());
    let status = controller.status();
    let progress = controller.progress();
    match name {
        Some(name) => println!(
            "{name} • {} ({})",
            progress.label(),
            transport_label(status.transport)
        ),
        None => println!("Nothing selected."),
    }
}

fn transport_label(transport: Transport) -> &'static str {
    match transport {
        Transport::Idle => "idle",
        Transport::Loading => "loading",
        Transport::Playing => "playing",
        Transport::Paused => "paused",
        Transport::Errored => "errored",
    }
}

fn print_help() {
    println!("Commands:");
    println!("  playlists              List playlists");
    println!("  tracks [playlist]      List tracks (durations probed on demand)");
    println!("  play <playlist> <i>    Play track i; repeat to pause/resume");
    println!("  pause                  Toggle play/pause");
    println!("  next / prev            Skip with wraparound");
    println!("  seek <seconds>         Seek within the current track");
    println!("  queue <playlist> <i>   Add a track to the play-next queue");
    println!("  queue                  Show the queue");
    println!("  now                    Show the current track and position");
    println!("  quit                   Exit");
}
