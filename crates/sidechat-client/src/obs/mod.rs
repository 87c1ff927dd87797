//! Lightweight in-process counters.
//!
//! Dropped commands and transport failures are deliberately invisible to
//! the end user; these counters plus `tracing` events are the only place
//! that behavior is observable. Counters are stored as atomics behind
//! label vectors and rendered in text exposition format.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Escape label values for text rendering.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Counter with dynamic labels. Labels are flattened into sorted key
/// vectors to keep deterministic ordering.
#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_default();
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 when never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let labels = r
                .key()
                .iter()
                .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "{name}{{{labels}}} {}", r.value().load(Ordering::Relaxed));
        }
    }
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

/// Counter registry for one chat session.
#[derive(Default)]
pub struct ChatCounters {
    /// Poll attempts by outcome (`ok` or an error label).
    pub polls: CounterVec,
    /// Dispatched messages by kind (`text` / `command`).
    pub dispatches: CounterVec,
    /// Dropped messages by reason.
    pub dropped: CounterVec,
    /// Outbound sends by outcome.
    pub sends: CounterVec,
}

impl ChatCounters {
    /// Render all counters in text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.polls.render("sidechat_polls_total", &mut out);
        self.dispatches.render("sidechat_dispatches_total", &mut out);
        self.dropped.render("sidechat_dropped_total", &mut out);
        self.sends.render("sidechat_sends_total", &mut out);
        out
    }
}
