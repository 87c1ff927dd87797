//! sidechat core: transport-agnostic chat protocol primitives.
//!
//! This crate defines the wire-level contracts for the chat stream (poll
//! batches, playback commands), the batch classifier, the cursor used for
//! fetch-since requests, and the shared error surface. It intentionally
//! carries no transport or runtime dependencies so the sync loop can be
//! tested against scripted batches.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `ChatError`/`Result` so a hostile or
//! buggy chat server can never crash the host player.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod classify;
pub mod cursor;
pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ChatError, Result};

pub use classify::{classify, Classified, DropReason};
pub use cursor::Cursor;
pub use protocol::command::{CommandError, PlayerCommand};
pub use protocol::wire::{InboundMessage, MessageBatch, MessageKind, SendBody};
