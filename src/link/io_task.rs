//! Async link I/O task — reactor-driven multi-peer transport bridge.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! multi-task scheduling and `async-io-mini` for reactor-driven timers
//! (no busy-spinning). Three concurrent futures:
//!
//! 1. **Accept** — polls `try_accept()` every 50ms via reactor timer
//! 2. **Read** — polls `read_peer()` every 1ms via reactor timer
//! 3. **Write** — truly async via `REPLY_CHANNEL.receive().await`
//!    (wakes instantly when the control loop enqueues a reply)
//!
//! The thread entry wraps the listener in an indefinitely-retrying
//! bind loop with a fixed delay between attempts, so a busy port or a
//! transient network failure never kills the daemon. The door keeps
//! moving regardless — motion belongs to the control loop, not here.
//!
//! ```text
//!  ┌────────────────────────────────────────────────────────────┐
//!  │  Link I/O Thread                                           │
//!  │  bind ──fail──▶ sleep(retry) ──▶ bind ...                  │
//!  │   │ok                                                      │
//!  │   ▼                                                        │
//!  │  ┌──────────────────────────────────────────────────────┐  │
//!  │  │  futures_lite::block_on (drives reactor + futures)   │  │
//!  │  │  ┌──────────────────────────────────────────────────┐│  │
//!  │  │  │  edge_executor::LocalExecutor                    ││  │
//!  │  │  │  ┌─────────┐  ┌──────────┐  ┌───────────────┐    ││  │
//!  │  │  │  │ Accept  │  │ Read All │  │ Write (async) │    ││  │
//!  │  │  │  │ 50ms ⏱  │  │ 1ms ⏱    │  │ wake-on-send  │    ││  │
//!  │  │  │  └─────────┘  └──────────┘  └───────────────┘    ││  │
//!  │  │  └──────────────────────────────────────────────────┘│  │
//!  │  └──────────────────────────────────────────────────────┘  │
//!  └────────────────────────────────────────────────────────────┘
//! ```

use core::cell::RefCell;
use core::time::Duration;
use log::{info, warn};
use std::rc::Rc;

use crate::adapters::tcp_link::TcpLink;
use crate::app::ports::PeerHandle;
use crate::config::SystemConfig;

use super::channels::{CMD_CHANNEL, CommandMsg, LINK_CHANNEL, LinkNotice, REPLY_CHANNEL};
use super::codec::LineDecoder;
use super::session::MAX_PEERS;
use super::transport::{LinkError, LinkTransport};

const READ_BUF_SIZE: usize = 512;

// ── Per-peer decoder state ───────────────────────────────────

struct IoSlot {
    decoder: LineDecoder,
}

impl IoSlot {
    fn new() -> Self {
        Self {
            decoder: LineDecoder::new(),
        }
    }

    fn reset(&mut self) {
        self.decoder.reset();
    }
}

// ── Line feeding + channel dispatch ──────────────────────────

fn feed_slot_bytes(slot: &mut IoSlot, peer: PeerHandle, data: &[u8]) {
    slot.decoder.feed(data, |line| {
        let mut buf = heapless::String::new();
        if buf.push_str(line).is_err() {
            warn!("IO[{}]: line too large for channel buffer", peer);
            return;
        }
        let msg = CommandMsg { peer, line: buf };
        if CMD_CHANNEL.try_send(msg).is_err() {
            warn!("IO[{}]: command channel full, dropping line", peer);
        }
    });
}

fn notify(notice: LinkNotice) {
    if LINK_CHANNEL.try_send(notice).is_err() {
        warn!("IO: link notice channel full, dropping {:?}", notice);
    }
}

// ── Async I/O loops ──────────────────────────────────────────

type SharedSlots = Rc<RefCell<[IoSlot; MAX_PEERS]>>;

/// Accept task — checks for new connections at 50ms intervals.
/// Lower frequency is fine since connection setup is infrequent.
async fn accept_loop<T: LinkTransport>(transport: Rc<RefCell<T>>, slots: SharedSlots) {
    loop {
        {
            let mut t = transport.borrow_mut();
            if let Some(peer) = t.try_accept() {
                info!("IO: peer {} connected", peer);
                slots.borrow_mut()[peer as usize].reset();
                notify(LinkNotice::Connected(peer));
            }
            while let Some((peer, success)) = t.poll_auth() {
                notify(LinkNotice::AuthResult { peer, success });
            }
        }
        async_io_mini::Timer::after(Duration::from_millis(50)).await;
    }
}

/// Read task — polls all connected peers at 1ms intervals.
/// The 1ms reactor timer is wake-based (not thread::sleep), so the
/// executor can service the write task between ticks.
async fn read_loop<T: LinkTransport>(transport: Rc<RefCell<T>>, slots: SharedSlots) {
    let mut read_buf = [0u8; READ_BUF_SIZE];
    loop {
        {
            let mut t = transport.borrow_mut();
            let mut s = slots.borrow_mut();
            for idx in 0..MAX_PEERS {
                let peer = idx as PeerHandle;
                if !t.is_connected(peer) {
                    continue;
                }
                match t.read_peer(peer, &mut read_buf) {
                    Ok(0) => {}
                    Ok(n) => {
                        feed_slot_bytes(&mut s[idx], peer, &read_buf[..n]);
                    }
                    Err(LinkError::NotConnected) => {
                        info!("IO: peer {} disconnected (read)", peer);
                        t.disconnect(peer);
                        s[idx].reset();
                        notify(LinkNotice::Disconnected(peer));
                    }
                    Err(e) => {
                        warn!("IO: peer {} read error ({}), disconnecting", peer, e);
                        t.disconnect(peer);
                        s[idx].reset();
                        notify(LinkNotice::Disconnected(peer));
                    }
                }
            }
        }
        async_io_mini::Timer::after(Duration::from_millis(1)).await;
    }
}

/// Write task — truly async, wakes instantly when the control loop
/// enqueues a reply via `REPLY_CHANNEL.try_send()`. No polling.
async fn write_loop<T: LinkTransport>(transport: Rc<RefCell<T>>, slots: SharedSlots) {
    loop {
        let reply = REPLY_CHANNEL.receive().await;
        let peer = reply.peer;

        let mut t = transport.borrow_mut();
        if !t.is_connected(peer) {
            continue;
        }

        if let Err(e) = write_reply(&mut *t, peer, reply.text.as_bytes()) {
            warn!("IO: write to peer {} failed: {}", peer, e);
            t.disconnect(peer);
            slots.borrow_mut()[peer as usize].reset();
            notify(LinkNotice::Disconnected(peer));
        }
    }
}

fn write_reply<T: LinkTransport>(
    t: &mut T,
    peer: PeerHandle,
    text: &[u8],
) -> Result<(), LinkError> {
    t.write_peer(peer, text)?;
    t.write_peer(peer, b"\n")?;
    t.flush_peer(peer)
}

/// Drive the three I/O futures over a bound transport. Never returns.
fn run_io_loop<T: LinkTransport>(transport: T) {
    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

    let transport = Rc::new(RefCell::new(transport));
    let slots: SharedSlots = Rc::new(RefCell::new(core::array::from_fn(|_| IoSlot::new())));

    executor
        .spawn(accept_loop(transport.clone(), slots.clone()))
        .detach();
    executor
        .spawn(read_loop(transport.clone(), slots.clone()))
        .detach();
    executor
        .spawn(write_loop(transport.clone(), slots.clone()))
        .detach();

    info!("IO task started (async, reactor-driven, {} max peers)", MAX_PEERS);

    // block_on drives the reactor (timers, I/O readiness) while the
    // executor drives the three spawned tasks.
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

/// Bind the TCP link and keep it bound: on failure, retry indefinitely
/// with a fixed delay between attempts.
fn bind_loop(config: &SystemConfig) {
    let retry = Duration::from_secs(u64::from(config.link_retry_secs));
    loop {
        match TcpLink::bind(config.listen_addr.as_str()) {
            Ok(transport) => {
                info!("link: listening on {}", config.listen_addr);
                run_io_loop(transport);
            }
            Err(e) => {
                warn!(
                    "link: bind to {} failed ({}), retrying in {}s",
                    config.listen_addr, e, config.link_retry_secs
                );
            }
        }
        std::thread::sleep(retry);
    }
}

// ── Thread spawn ─────────────────────────────────────────────

/// Spawn the link I/O task in a dedicated thread.
pub fn spawn(config: SystemConfig) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("link-io".into())
        .spawn(move || bind_loop(&config))
}

// ── Channel accessors for the control loop ───────────────────

/// Try to receive an inbound command line from the I/O task.
pub fn try_recv_command() -> Option<CommandMsg> {
    CMD_CHANNEL.try_receive().ok()
}

/// Try to receive a link lifecycle notice.
pub fn try_recv_notice() -> Option<LinkNotice> {
    LINK_CHANNEL.try_receive().ok()
}

/// Whether any command lines are waiting.
pub fn commands_pending() -> bool {
    !CMD_CHANNEL.is_empty()
}

// ── Tests ────────────────────────────────────────────────────
