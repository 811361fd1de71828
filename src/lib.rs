//! Soft keyboard touch engine.
//!
//! Geometry, hit resolution and gesture primitives live in `softkey-core`,
//! the dispatch state machine in `softkey-session`. This crate adds the UniFFI
//! surface used by mobile hosts.

uniffi::setup_scaffolding!();

pub mod api;
mod trace_init;

pub use softkey_core;
pub use softkey_session;
