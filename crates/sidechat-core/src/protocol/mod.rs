//! Chat wire protocol.
//!
//! Two message kinds share one channel:
//! - text: human-readable transcript lines.
//! - command: remote playback control.
//!
//! All parsing is panic-free and tolerant of fields it does not understand;
//! unknown kinds and command names are surfaced as explicit variants so the
//! classifier can drop them without failing the batch.

pub mod command;
pub mod wire;
