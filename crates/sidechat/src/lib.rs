//! Top-level facade crate for sidechat.
//!
//! Re-exports the protocol core and the client runtime so embedders can
//! depend on a single crate.

pub mod core {
    pub use sidechat_core::*;
}

pub mod client {
    pub use sidechat_client::*;
}
