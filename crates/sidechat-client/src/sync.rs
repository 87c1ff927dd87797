//! Long-poll sync loop.
//!
//! One task per session: poll, classify, dispatch, back off on failure,
//! stop on cancellation. The loop owns the cursor and the running flag;
//! nothing else writes them. Polls are strictly serialized — the next one
//! is not issued until the previous one resolved or was aborted.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use sidechat_core::classify::{classify, Classified};
use sidechat_core::cursor::Cursor;
use sidechat_core::protocol::wire::InboundMessage;

use crate::dispatch::{CommandExecutor, TranscriptSink};
use crate::obs::ChatCounters;
use crate::transport::ChatTransport;

/// Handle to a running poll task.
#[derive(Debug)]
pub struct RunningPoller {
    stop: CancellationToken,
    task: JoinHandle<()>,
}

impl RunningPoller {
    /// Cancel the loop and wait for the current iteration to unwind.
    ///
    /// Cancellation aborts an in-flight poll (the loop races the request
    /// against the token, and dropping the request future aborts it).
    /// Awaiting the task guarantees that once this returns, no further
    /// transcript or player calls occur.
    pub async fn shutdown(self) {
        self.stop.cancel();
        let _ = self.task.await;
    }
}

/// The scheduling core binding transport, classifier, and executor.
pub struct SyncLoop {
    transport: Arc<dyn ChatTransport>,
    transcript: Arc<dyn TranscriptSink>,
    executor: CommandExecutor,
    counters: Arc<ChatCounters>,
    bot_name: String,
    backoff: Duration,
}

impl SyncLoop {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        transcript: Arc<dyn TranscriptSink>,
        executor: CommandExecutor,
        counters: Arc<ChatCounters>,
        bot_name: String,
        backoff: Duration,
    ) -> Self {
        Self {
            transport,
            transcript,
            executor,
            counters,
            bot_name,
            backoff,
        }
    }

    /// Spawn the loop on the current runtime and return its handle.
    pub fn spawn(self) -> RunningPoller {
        let stop = CancellationToken::new();
        let stop_child = stop.child_token();
        let task = tokio::spawn(self.run(stop_child));
        RunningPoller { stop, task }
    }

    async fn run(self, stop: CancellationToken) {
        let mut cursor = Cursor::new();
        tracing::debug!("chat poll loop started");

        loop {
            let outcome = tokio::select! {
                _ = stop.cancelled() => break,
                res = self.transport.poll(cursor.since_id()) => res,
            };

            match outcome {
                Ok(batch) => {
                    self.counters.polls.inc(&[("outcome", "ok")]);
                    for msg in &batch.messages {
                        // Cancellation may fire mid-batch; stop dispatching
                        // the instant it does.
                        if stop.is_cancelled() {
                            break;
                        }
                        self.dispatch(msg);
                        cursor.advance(msg.id.as_deref());
                    }
                }
                Err(err) => {
                    self.counters.polls.inc(&[("outcome", err.label())]);
                    tracing::debug!(error = %err, "poll failed; backing off");
                    tokio::select! {
                        _ = stop.cancelled() => break,
                        _ = tokio::time::sleep(self.backoff) => {}
                    }
                }
            }
        }

        tracing::debug!("chat poll loop stopped");
    }

    fn dispatch(&self, msg: &InboundMessage) {
        match classify(msg, &self.bot_name) {
            Classified::Transcript { user, text } => {
                self.counters.dispatches.inc(&[("kind", "text")]);
                self.transcript.append(&user, &text);
            }
            Classified::Command(cmd) => {
                self.counters.dispatches.inc(&[("kind", "command")]);
                self.executor.execute(cmd);
            }
            Classified::Dropped(reason) => {
                self.counters.dropped.inc(&[("reason", reason.label())]);
                tracing::debug!(reason = reason.label(), "inbound message dropped");
            }
        }
    }
}
