//! Session facade.
//!
//! `ChatSession` owns the configuration, the collaborator trait objects,
//! and the running poller. UI adapters wire their lifecycle into it:
//! `start_polling` on open, `toggle_panel` on the chat button, `dispose`
//! exactly once on teardown.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::Mutex;

use sidechat_core::error::Result;

use crate::config::SessionConfig;
use crate::dispatch::{CommandExecutor, PlayerControl, TranscriptSink};
use crate::obs::ChatCounters;
use crate::panel::{ChatPanel, PanelState, PanelToggle};
use crate::sync::{RunningPoller, SyncLoop};
use crate::transport::{ChatTransport, HttpTransport};

/// Outcome of a `start_polling` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Started {
    /// A new poll loop was spawned.
    Polling,
    /// A loop is already running; nothing changed.
    AlreadyRunning,
    /// No endpoint configured; chat stays purely local.
    Skipped,
}

pub struct ChatSession {
    config: SessionConfig,
    transport: Option<Arc<dyn ChatTransport>>,
    transcript: Arc<dyn TranscriptSink>,
    player: Arc<dyn PlayerControl>,
    panel: Arc<dyn ChatPanel>,
    toggle: StdMutex<PanelToggle>,
    counters: Arc<ChatCounters>,
    poller: Mutex<Option<RunningPoller>>,
}

impl ChatSession {
    /// Build a session with the HTTP transport implied by `config`.
    /// A session without an endpoint gets no transport and stays local.
    pub fn new(
        config: SessionConfig,
        transcript: Arc<dyn TranscriptSink>,
        player: Arc<dyn PlayerControl>,
        panel: Arc<dyn ChatPanel>,
    ) -> Result<Self> {
        config.validate()?;
        let transport: Option<Arc<dyn ChatTransport>> = if config.polling_enabled() {
            Some(Arc::new(HttpTransport::from_config(&config)?))
        } else {
            None
        };
        Ok(Self::with_transport(
            config, transport, transcript, player, panel,
        ))
    }

    /// Build a session around an injected transport (tests, alternative
    /// protocols). `None` behaves like an endpoint-less config.
    pub fn with_transport(
        config: SessionConfig,
        transport: Option<Arc<dyn ChatTransport>>,
        transcript: Arc<dyn TranscriptSink>,
        player: Arc<dyn PlayerControl>,
        panel: Arc<dyn ChatPanel>,
    ) -> Self {
        Self {
            config,
            transport,
            transcript,
            player,
            panel,
            toggle: StdMutex::new(PanelToggle::new()),
            counters: Arc::new(ChatCounters::default()),
            poller: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn counters(&self) -> &ChatCounters {
        &self.counters
    }

    /// Start the poll loop. Idempotent: a second call while one is running
    /// is a no-op, and a session without an endpoint never polls.
    pub async fn start_polling(&self) -> Started {
        let Some(transport) = self.transport.clone() else {
            return Started::Skipped;
        };

        let mut guard = self.poller.lock().await;
        if guard.is_some() {
            return Started::AlreadyRunning;
        }

        let sync = SyncLoop::new(
            transport,
            self.transcript.clone(),
            CommandExecutor::new(self.player.clone()),
            self.counters.clone(),
            self.config.bot_name.clone(),
            Duration::from_millis(self.config.backoff_ms),
        );
        *guard = Some(sync.spawn());
        tracing::debug!("polling started");
        Started::Polling
    }

    /// Echo locally and hand the message to the network as a detached task.
    /// Outbound chat is best-effort: delivery failures are counted and
    /// logged, never surfaced. Empty or whitespace-only input is ignored.
    pub fn send_message(&self, input: &str) {
        let text = input.trim();
        if text.is_empty() {
            return;
        }

        self.transcript.append(&self.config.local_name, text);

        let Some(transport) = self.transport.clone() else {
            return;
        };
        let counters = self.counters.clone();
        let text = text.to_owned();
        tokio::spawn(async move {
            match transport.send(&text).await {
                Ok(()) => counters.sends.inc(&[("outcome", "ok")]),
                Err(err) => {
                    counters.sends.inc(&[("outcome", err.label())]);
                    tracing::debug!(error = %err, "send failed; message dropped");
                }
            }
        });
    }

    /// Flip panel visibility, applying the transition's side effects.
    pub fn toggle_panel(&self) -> PanelState {
        let mut toggle = self.toggle.lock().expect("lock poisoned");
        toggle.toggle(self.panel.as_ref())
    }

    /// Current panel state without side effects.
    pub fn panel_state(&self) -> PanelState {
        self.toggle.lock().expect("lock poisoned").state()
    }

    /// Stop polling and wait for the loop to unwind. After this returns no
    /// further transcript or player calls occur. Idempotent; the owning UI
    /// calls it exactly once on teardown.
    pub async fn dispose(&self) {
        let running = self.poller.lock().await.take();
        if let Some(running) = running {
            running.shutdown().await;
            tracing::debug!("polling stopped");
        }
    }
}
