//! Sync loop behavior against a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use sidechat_core::error::{ChatError, Result};
use sidechat_core::protocol::wire::MessageBatch;

use sidechat_client::config::SessionConfig;
use sidechat_client::dispatch::{CommandExecutor, PlayerControl, TranscriptSink};
use sidechat_client::obs::ChatCounters;
use sidechat_client::session::{ChatSession, Started};
use sidechat_client::sync::SyncLoop;
use sidechat_client::transport::ChatTransport;

const BACKOFF: Duration = Duration::from_millis(20);

/// One scripted poll outcome.
enum Step {
    Batch(&'static str),
    Fail(u16),
    /// Never resolves; aborted only by loop cancellation.
    Hang,
}

/// Transport that replays a script and records every call. Once the script
/// is exhausted, polls return empty batches after a short pause.
struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    polls: Mutex<Vec<Option<String>>>,
    sends: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            polls: Mutex::new(Vec::new()),
            sends: Mutex::new(Vec::new()),
        })
    }

    fn polls(&self) -> Vec<Option<String>> {
        self.polls.lock().unwrap().clone()
    }

    fn sends(&self) -> Vec<String> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn poll(&self, since_id: Option<&str>) -> Result<MessageBatch> {
        self.polls
            .lock()
            .unwrap()
            .push(since_id.map(str::to_owned));

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Batch(json)) => {
                Ok(serde_json::from_str(json).expect("scripted batch must parse"))
            }
            Some(Step::Fail(status)) => Err(ChatError::Status(status)),
            Some(Step::Hang) => std::future::pending().await,
            None => {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(MessageBatch::default())
            }
        }
    }

    async fn send(&self, message: &str) -> Result<()> {
        self.sends.lock().unwrap().push(message.to_owned());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSink {
    lines: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    fn lines(&self) -> Vec<(String, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl TranscriptSink for RecordingSink {
    fn append(&self, user: &str, text: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((user.to_owned(), text.to_owned()));
    }
}

#[derive(Default)]
struct RecordingPlayer {
    calls: Mutex<Vec<String>>,
}

impl RecordingPlayer {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl PlayerControl for RecordingPlayer {
    fn pause(&self) {
        self.push("pause");
    }
    fn play(&self) {
        self.push("play");
    }
    fn seek(&self, time: f64) {
        self.push(format!("seek {time}"));
    }
    fn set_rate(&self, value: f64) {
        self.push(format!("rate {value}"));
    }
    fn set_muted(&self, muted: bool) {
        self.push(format!("muted {muted}"));
    }
    fn set_source(&self, src: &str, media_type: &str) {
        self.push(format!("source {src} {media_type}"));
    }
    fn seekable_to_start(&self) -> bool {
        true
    }
}

fn spawn_loop(
    transport: Arc<ScriptedTransport>,
    sink: Arc<RecordingSink>,
    player: Arc<RecordingPlayer>,
    counters: Arc<ChatCounters>,
) -> sidechat_client::sync::RunningPoller {
    SyncLoop::new(
        transport,
        sink,
        CommandExecutor::new(player),
        counters,
        "Bot".to_owned(),
        BACKOFF,
    )
    .spawn()
}

/// Poll a condition until it holds or two seconds elapse.
async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..400 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within 2s");
}

#[tokio::test]
async fn dispatches_in_order_and_advances_cursor() {
    let transport = ScriptedTransport::new(vec![Step::Batch(
        r#"{"messages":[
            {"id":"5","type":"text","user":"Bot","text":"hi"},
            {"id":"6","type":"command","command":"pause"},
            {"type":"command","command":"seek","args":{"time":42}}
        ]}"#,
    )]);
    let sink = Arc::new(RecordingSink::default());
    let player = Arc::new(RecordingPlayer::default());
    let counters = Arc::new(ChatCounters::default());

    let running = spawn_loop(
        transport.clone(),
        sink.clone(),
        player.clone(),
        counters.clone(),
    );

    wait_until(|| transport.polls().len() >= 2).await;
    running.shutdown().await;

    assert_eq!(sink.lines(), [("Bot".to_owned(), "hi".to_owned())]);
    assert_eq!(player.calls(), ["pause", "seek 42"]);

    // First poll has no cursor; the next carries the last id-bearing
    // message even though a later id-less command followed it.
    let polls = transport.polls();
    assert_eq!(polls[0], None);
    assert_eq!(polls[1].as_deref(), Some("6"));

    assert_eq!(counters.dispatches.get(&[("kind", "text")]), 1);
    assert_eq!(counters.dispatches.get(&[("kind", "command")]), 2);
}

#[tokio::test]
async fn id_less_batches_leave_cursor_unset() {
    let transport = ScriptedTransport::new(vec![Step::Batch(
        r#"{"messages":[{"type":"command","command":"seek","args":{"time":42}}]}"#,
    )]);
    let sink = Arc::new(RecordingSink::default());
    let player = Arc::new(RecordingPlayer::default());

    let running = spawn_loop(
        transport.clone(),
        sink.clone(),
        player.clone(),
        Arc::new(ChatCounters::default()),
    );

    wait_until(|| transport.polls().len() >= 2).await;
    running.shutdown().await;

    assert_eq!(player.calls(), ["seek 42"]);
    assert_eq!(transport.polls()[1], None);
}

#[tokio::test]
async fn failure_backs_off_and_retries_with_same_cursor() {
    let transport = ScriptedTransport::new(vec![
        Step::Batch(r#"{"messages":[{"id":"5","type":"text","user":"Bot","text":"hi"}]}"#),
        Step::Fail(500),
    ]);
    let sink = Arc::new(RecordingSink::default());
    let player = Arc::new(RecordingPlayer::default());
    let counters = Arc::new(ChatCounters::default());

    let running = spawn_loop(
        transport.clone(),
        sink.clone(),
        player.clone(),
        counters.clone(),
    );

    wait_until(|| transport.polls().len() >= 3).await;
    running.shutdown().await;

    // The failed poll produced no dispatch and did not move the cursor.
    assert_eq!(sink.lines().len(), 1);
    assert!(player.calls().is_empty());

    let polls = transport.polls();
    assert_eq!(polls[1].as_deref(), Some("5"));
    assert_eq!(polls[2].as_deref(), Some("5"));
    assert_eq!(counters.polls.get(&[("outcome", "status")]), 1);
}

#[tokio::test]
async fn repeated_failures_never_terminate_the_loop() {
    let transport = ScriptedTransport::new(vec![
        Step::Fail(500),
        Step::Fail(502),
        Step::Fail(503),
        Step::Batch(r#"{"messages":[{"id":"1","type":"text","text":"back"}]}"#),
    ]);
    let sink = Arc::new(RecordingSink::default());

    let running = spawn_loop(
        transport.clone(),
        sink.clone(),
        Arc::new(RecordingPlayer::default()),
        Arc::new(ChatCounters::default()),
    );

    wait_until(|| !sink.lines().is_empty()).await;
    running.shutdown().await;

    assert_eq!(sink.lines(), [("Bot".to_owned(), "back".to_owned())]);
}

#[tokio::test]
async fn shutdown_aborts_inflight_poll_without_dispatch() {
    let transport = ScriptedTransport::new(vec![Step::Hang]);
    let sink = Arc::new(RecordingSink::default());
    let player = Arc::new(RecordingPlayer::default());

    let running = spawn_loop(
        transport.clone(),
        sink.clone(),
        player.clone(),
        Arc::new(ChatCounters::default()),
    );

    wait_until(|| transport.polls().len() == 1).await;

    tokio::time::timeout(Duration::from_secs(1), running.shutdown())
        .await
        .expect("shutdown must not wait for the hung poll");

    assert!(sink.lines().is_empty());
    assert!(player.calls().is_empty());
    // The aborted request is never re-issued.
    assert_eq!(transport.polls().len(), 1);
}

#[tokio::test]
async fn second_start_is_a_noop_and_dispose_is_idempotent() {
    let transport = ScriptedTransport::new(vec![]);
    let session = ChatSession::with_transport(
        SessionConfig::new("http://chat.example"),
        Some(transport.clone()),
        Arc::new(RecordingSink::default()),
        Arc::new(RecordingPlayer::default()),
        Arc::new(NoPanel),
    );

    assert_eq!(session.start_polling().await, Started::Polling);
    assert_eq!(session.start_polling().await, Started::AlreadyRunning);

    session.dispose().await;
    session.dispose().await;

    // A fresh start after dispose spawns a new loop.
    assert_eq!(session.start_polling().await, Started::Polling);
    session.dispose().await;
}

#[tokio::test]
async fn no_endpoint_means_no_polling_but_local_echo_works() {
    let sink = Arc::new(RecordingSink::default());
    let session = ChatSession::with_transport(
        SessionConfig::default(),
        None,
        sink.clone(),
        Arc::new(RecordingPlayer::default()),
        Arc::new(NoPanel),
    );

    assert_eq!(session.start_polling().await, Started::Skipped);

    session.send_message("still here");
    assert_eq!(
        sink.lines(),
        [("You".to_owned(), "still here".to_owned())]
    );

    session.dispose().await;
}

#[tokio::test]
async fn send_trims_echoes_and_forwards() {
    let transport = ScriptedTransport::new(vec![Step::Hang]);
    let sink = Arc::new(RecordingSink::default());
    let session = ChatSession::with_transport(
        SessionConfig::new("http://chat.example"),
        Some(transport.clone()),
        sink.clone(),
        Arc::new(RecordingPlayer::default()),
        Arc::new(NoPanel),
    );

    session.send_message("  hi there  ");
    session.send_message("   ");
    session.send_message("");

    wait_until(|| session.counters().sends.get(&[("outcome", "ok")]) == 1).await;

    assert_eq!(sink.lines(), [("You".to_owned(), "hi there".to_owned())]);
    assert_eq!(transport.sends(), ["hi there"]);

    session.dispose().await;
}

struct NoPanel;

impl sidechat_client::panel::ChatPanel for NoPanel {
    fn set_visible(&self, _visible: bool) {}
    fn scroll_to_latest(&self) {}
    fn focus_input(&self) {}
}
