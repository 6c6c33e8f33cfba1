//! Platform abstraction layer
//!
//! The simulation is headless; this layer only forwards pointer and timer
//! events from a host page and hands back JSON snapshots.

#[cfg(target_arch = "wasm32")]
pub mod web;
