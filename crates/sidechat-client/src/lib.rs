//! sidechat client library entry.
//!
//! This crate wires the HTTP transport, sync loop, command executor, panel
//! state machine, and counters into a session facade consumed by UI adapters
//! and by the terminal binary (`main.rs`).

pub mod config;
pub mod dispatch;
pub mod obs;
pub mod panel;
pub mod session;
pub mod sync;
pub mod transport;
