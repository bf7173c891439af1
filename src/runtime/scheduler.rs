//! Click debounce timers
//!
//! The controller only emits `ArmClickTimer`/`CancelClickTimer`; a scheduler
//! turns those into `CellMsg::ClickTimerExpired` messages later on. Stale
//! expirations are harmless (the controller ignores generations it is not
//! waiting for), so a cancel that races a firing timer may still deliver.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::messages::CellMsg;

/// Delivers timer expirations back to the controller
pub trait Scheduler {
    fn arm(&mut self, generation: u64, delay_ms: u64);

    fn cancel(&mut self, generation: u64);

    /// Let `ms` milliseconds pass and return the timer messages that came due
    fn advance(&mut self, ms: u64) -> Vec<CellMsg>;
}

/// Virtual clock for deterministic replays and tests
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    /// (due time, generation), in arming order
    timers: Vec<(u64, u64)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, generation: u64, delay_ms: u64) {
        self.timers.push((self.now_ms + delay_ms, generation));
    }

    fn cancel(&mut self, generation: u64) {
        self.timers.retain(|&(_, g)| g != generation);
    }

    fn advance(&mut self, ms: u64) -> Vec<CellMsg> {
        self.now_ms += ms;
        let now = self.now_ms;

        let (mut due, pending): (Vec<(u64, u64)>, Vec<(u64, u64)>) =
            std::mem::take(&mut self.timers)
                .into_iter()
                .partition(|&(at, _)| at <= now);
        self.timers = pending;
        due.sort_by_key(|&(at, generation)| (at, generation));

        due.into_iter()
            .map(|(_, generation)| CellMsg::ClickTimerExpired { generation })
            .collect()
    }
}

/// Wall-clock timers on background threads
///
/// Each armed timer sleeps on its own thread and sends its expiry through a
/// channel; `advance` blocks for the requested time while collecting them.
/// Only generations still in the live set are delivered.
pub struct ThreadScheduler {
    msg_tx: Sender<CellMsg>,
    msg_rx: Receiver<CellMsg>,
    live: Arc<Mutex<HashSet<u64>>>,
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadScheduler {
    pub fn new() -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            msg_tx,
            msg_rx,
            live: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Timers armed but neither fired nor cancelled
    pub fn live_timers(&self) -> usize {
        self.live.lock().map(|set| set.len()).unwrap_or(0)
    }
}

impl Scheduler for ThreadScheduler {
    fn arm(&mut self, generation: u64, delay_ms: u64) {
        if let Ok(mut set) = self.live.lock() {
            set.insert(generation);
        }
        let tx = self.msg_tx.clone();
        let live = Arc::clone(&self.live);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(delay_ms));
            let still_live = live
                .lock()
                .map(|mut set| set.remove(&generation))
                .unwrap_or(false);
            if still_live {
                let _ = tx.send(CellMsg::ClickTimerExpired { generation });
            }
        });
    }

    fn cancel(&mut self, generation: u64) {
        if let Ok(mut set) = self.live.lock() {
            set.remove(&generation);
        }
    }

    fn advance(&mut self, ms: u64) -> Vec<CellMsg> {
        let deadline = Instant::now() + Duration::from_millis(ms);
        let mut msgs = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => msgs.push(msg),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        msgs
    }
}
