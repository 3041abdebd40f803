//! GarageDoor daemon library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. The binary in `main.rs` wires the adapters together and
//! runs the control loop.

#![deny(unused_must_use)]

// Links the std critical-section implementation backing embassy-sync's
// channel mutex on the host.
use critical_section as _;

pub mod app;
pub mod config;
pub mod door;
pub mod events;
pub mod link;

pub mod adapters;
