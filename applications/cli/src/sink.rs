//! Streaming audio sink backed by rodio.
//!
//! The output stream is confined to a dedicated audio thread (rodio's
//! stream is not `Send`), commanded over a channel. The handle side
//! fetches track bytes over HTTP, probes durations with lofty, and tracks
//! the playback position; the thread side decodes and owns the rodio
//! `Sink`.

use async_trait::async_trait;
use bytes::Bytes;
use lofty::prelude::*;
use lofty::probe::Probe;
use reel_playback::{AudioSink, SinkError, SinkResult};
use rodio::{Decoder, OutputStreamBuilder, Sink, Source};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::debug;

enum AudioCmd {
    /// Decode `bytes` and start playback from the beginning.
    Load {
        bytes: Bytes,
        reply: oneshot::Sender<Result<(), String>>,
    },
    Pause,
    Resume,
    Stop,
    /// Rebuild the decoder at `position` within the current bytes.
    Seek { position: Duration },
    Quit,
}

/// Handle to the audio thread, implementing [`AudioSink`].
pub struct RodioSink {
    http: reqwest::Client,
    tx: Sender<AudioCmd>,
    finished: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,

    duration: Option<Duration>,
    accumulated: Duration,
    started_at: Option<Instant>,
    paused: bool,
    loaded: bool,
}

impl RodioSink {
    /// Spawn the audio thread and build the HTTP client used to fetch
    /// track bytes.
    pub fn new() -> anyhow::Result<Self> {
        let (tx, rx) = std::sync::mpsc::channel::<AudioCmd>();
        let finished = Arc::new(AtomicBool::new(false));
        let join = spawn_audio_thread(rx, finished.clone());

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("ReelPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            tx,
            finished,
            join: Some(join),
            duration: None,
            accumulated: Duration::ZERO,
            started_at: None,
            paused: false,
            loaded: false,
        })
    }

    async fn fetch(&self, url: &str) -> SinkResult<Bytes> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SinkError::Network(format!(
                "fetch failed with status {} for {url}",
                response.status()
            )));
        }
        response
            .bytes()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))
    }

    fn send(&self, cmd: AudioCmd) {
        // A send failure means the audio thread is gone; every subsequent
        // operation degrades to a no-op rather than a panic.
        let _ = self.tx.send(cmd);
    }
}

#[async_trait]
impl AudioSink for RodioSink {
    async fn load(&mut self, url: &str) -> SinkResult<Option<Duration>> {
        let bytes = self.fetch(url).await?;
        let duration = duration_of(bytes.clone());

        let (reply, confirm) = oneshot::channel();
        self.send(AudioCmd::Load { bytes, reply });
        confirm
            .await
            .map_err(|_| SinkError::Decode("audio thread gone".to_string()))?
            .map_err(SinkError::Decode)?;

        self.finished.store(false, Ordering::SeqCst);
        self.duration = duration;
        self.accumulated = Duration::ZERO;
        self.started_at = Some(Instant::now());
        self.paused = false;
        self.loaded = true;
        Ok(duration)
    }

    fn pause(&mut self) {
        if !self.loaded || self.paused {
            return;
        }
        self.send(AudioCmd::Pause);
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
        self.paused = true;
    }

    fn resume(&mut self) {
        if !self.loaded || !self.paused {
            return;
        }
        self.send(AudioCmd::Resume);
        self.started_at = Some(Instant::now());
        self.paused = false;
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
        self.duration = None;
        self.accumulated = Duration::ZERO;
        self.started_at = None;
        self.paused = false;
        self.loaded = false;
    }

    fn seek(&mut self, position: Duration) -> SinkResult<()> {
        if !self.loaded {
            return Err(SinkError::Seek("no source loaded".to_string()));
        }

        // Fire-and-forget: the audio thread rebuilds the decoder at the
        // target position on its own time.
        self.send(AudioCmd::Seek { position });
        self.accumulated = position;
        self.started_at = if self.paused {
            None
        } else {
            Some(Instant::now())
        };
        Ok(())
    }

    fn position(&self) -> Duration {
        let elapsed = self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |started| started.elapsed());
        match self.duration {
            Some(duration) => elapsed.min(duration),
            None => elapsed,
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn finished(&self) -> bool {
        self.loaded && self.finished.load(Ordering::SeqCst)
    }

    async fn probe_duration(&self, url: &str) -> Option<Duration> {
        let bytes = self.fetch(url).await.ok()?;
        duration_of(bytes)
    }
}

impl Drop for RodioSink {
    fn drop(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Read the duration out of fetched audio bytes.
///
/// lofty reads it from the container metadata; for formats it cannot
/// probe, rodio's decoder is asked instead (which may still not know).
fn duration_of(bytes: Bytes) -> Option<Duration> {
    let probe = Probe::new(Cursor::new(bytes.clone())).guess_file_type().ok()?;
    if let Ok(tagged) = probe.read() {
        return Some(tagged.properties().duration());
    }
    Decoder::new(Cursor::new(bytes)).ok()?.total_duration()
}

fn spawn_audio_thread(rx: Receiver<AudioCmd>, finished: Arc<AtomicBool>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                // Without an output device every command becomes a no-op;
                // the player still works for listing and queueing.
                tracing::error!(error = %e, "No audio output device");
                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCmd::Load { reply, .. } => {
                            let _ = reply.send(Err("no audio output device".to_string()));
                        }
                        AudioCmd::Quit => break,
                        _ => {}
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when the stream drops; noisy for a CLI.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut bytes: Option<Bytes> = None;
        let mut paused = false;

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AudioCmd::Load {
                    bytes: new_bytes,
                    reply,
                }) => {
                    let result = Decoder::new(Cursor::new(new_bytes.clone()));
                    match result {
                        Ok(source) => {
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            let new_sink = Sink::connect_new(stream.mixer());
                            new_sink.append(source);
                            new_sink.play();
                            sink = Some(new_sink);
                            bytes = Some(new_bytes);
                            paused = false;
                            finished.store(false, Ordering::SeqCst);
                            let _ = reply.send(Ok(()));
                        }
                        Err(e) => {
                            debug!(error = %e, "Decode failed");
                            let _ = reply.send(Err(e.to_string()));
                        }
                    }
                }
                Ok(AudioCmd::Pause) => {
                    if let Some(ref s) = sink {
                        s.pause();
                        paused = true;
                    }
                }
                Ok(AudioCmd::Resume) => {
                    if let Some(ref s) = sink {
                        s.play();
                        paused = false;
                    }
                }
                Ok(AudioCmd::Stop) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    bytes = None;
                    paused = false;
                    finished.store(false, Ordering::SeqCst);
                }
                Ok(AudioCmd::Seek { position }) => {
                    // Scrubbing: rebuild the decoder and skip into the
                    // source; works for the common formats.
                    if let Some(current) = bytes.clone() {
                        match Decoder::new(Cursor::new(current)) {
                            Ok(source) => {
                                if let Some(old) = sink.take() {
                                    old.stop();
                                }
                                let new_sink = Sink::connect_new(stream.mixer());
                                new_sink.append(source.skip_duration(position));
                                if paused {
                                    new_sink.pause();
                                } else {
                                    new_sink.play();
                                }
                                sink = Some(new_sink);
                                finished.store(false, Ordering::SeqCst);
                            }
                            Err(e) => {
                                debug!(error = %e, "Seek rebuild failed");
                            }
                        }
                    }
                }
                Ok(AudioCmd::Quit) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic end-of-track check.
                    let done = sink.as_ref().map(Sink::empty).unwrap_or(false) && !paused;
                    finished.store(done, Ordering::SeqCst);
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
