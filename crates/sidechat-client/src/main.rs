//! sidechat terminal tail.
//!
//! Follows the chat stream configured in `sidechat.yaml`, prints transcript
//! lines to stdout, logs playback commands instead of driving a player, and
//! forwards typed lines back to the endpoint. Ctrl-C or stdin EOF disposes
//! the session.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use sidechat_client::config;
use sidechat_client::dispatch::{PlayerControl, TranscriptSink};
use sidechat_client::panel::ChatPanel;
use sidechat_client::session::{ChatSession, Started};

struct StdoutTranscript;

impl TranscriptSink for StdoutTranscript {
    fn append(&self, user: &str, text: &str) {
        println!("{user}: {text}");
    }
}

/// No player behind a terminal; commands are logged so the stream's control
/// traffic stays visible.
struct LoggingPlayer;

impl PlayerControl for LoggingPlayer {
    fn pause(&self) {
        tracing::info!("player: pause");
    }
    fn play(&self) {
        tracing::info!("player: play");
    }
    fn seek(&self, time: f64) {
        tracing::info!(time, "player: seek");
    }
    fn set_rate(&self, value: f64) {
        tracing::info!(value, "player: rate");
    }
    fn set_muted(&self, muted: bool) {
        tracing::info!(muted, "player: muted");
    }
    fn set_source(&self, src: &str, media_type: &str) {
        tracing::info!(src, media_type, "player: source");
    }
    fn seekable_to_start(&self) -> bool {
        true
    }
}

/// The terminal has no panel to show or hide.
struct NoPanel;

impl ChatPanel for NoPanel {
    fn set_visible(&self, _visible: bool) {}
    fn scroll_to_latest(&self) {}
    fn focus_input(&self) {}
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("sidechat.yaml").expect("config load failed");
    let session = ChatSession::new(
        cfg,
        Arc::new(StdoutTranscript),
        Arc::new(LoggingPlayer),
        Arc::new(NoPanel),
    )
    .expect("session build failed");

    match session.start_polling().await {
        Started::Polling => tracing::info!("following chat stream"),
        Started::Skipped => tracing::warn!("no endpoint configured; local echo only"),
        Started::AlreadyRunning => {}
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => session.send_message(&line),
                _ => break,
            },
        }
    }

    session.dispose().await;
}
