//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the garage door: intent
//! resolution (open/close/stop down to toggle pulses), the query
//! handlers, and per-tick motion orchestration. All interaction with
//! the outside world happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without a transport.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
