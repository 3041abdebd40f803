//! Transport-agnostic command link.
//!
//! Line-oriented text command layer bridging an external message
//! transport to the door service.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      Link Stack                            │
//! │                                                            │
//! │  ┌───────────┐   ┌──────────┐   ┌──────────────────────┐   │
//! │  │ Transport │──▶│  Codec   │──▶│  Engine (dispatcher) │   │
//! │  │ (trait)   │   │ (lines)  │   │  → DoorService       │   │
//! │  └───────────┘   └──────────┘   └──────────────────────┘   │
//! │       ▲                                    │               │
//! │       │              ┌─────────────────────┘               │
//! │       │              ▼                                     │
//! │  ┌───────────┐   ┌──────────┐                              │
//! │  │ Transport │◀──│  Reply   │   (one sentence per line)    │
//! │  │ (write)   │   │  channel │                              │
//! │  └───────────┘   └──────────┘                              │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod channels;
pub mod codec;
pub mod engine;
pub mod io_task;
pub mod session;
pub mod transport;
