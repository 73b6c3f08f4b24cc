//! Deferred note spawns.
//!
//! Every chart entry becomes one timer that fires `time_sec` after playback
//! starts. The scheduler keeps the handles of one session so a restart or stop
//! can cancel whatever has not fired yet.

use crate::chart::Chart;
use crate::lane::Lane;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Payload delivered back to the session when a spawn timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSpawn {
    pub session: SessionId,
    pub lane: Lane,
    pub chart_index: usize,
}

/// Platform timer used to defer spawns (setTimeout in the browser, a virtual
/// clock on the host).
pub trait SpawnTimer {
    type Handle;

    /// Arm a timer firing `delay` after `now`.
    fn schedule(&mut self, now: Duration, delay: Duration, spawn: PendingSpawn) -> Self::Handle;

    /// Cancelling a handle that already fired must be harmless.
    fn cancel(&mut self, handle: Self::Handle);
}

pub struct NoteScheduler<T: SpawnTimer> {
    timer: T,
    handles: Vec<T::Handle>,
}

impl<T: SpawnTimer> NoteScheduler<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            handles: Vec::new(),
        }
    }

    /// Cancel the previous session's timers, then arm one per chart entry.
    /// Returns the number of armed spawns.
    pub fn arm(&mut self, chart: &Chart, session: SessionId, now: Duration) -> usize {
        self.cancel_all();
        for (chart_index, entry) in chart.entries().iter().enumerate() {
            let delay = match Duration::try_from_secs_f64(entry.time_sec) {
                Ok(d) => d,
                Err(e) => {
                    log::warn!(
                        "[scheduler] skipping note {} at {}s: {}",
                        chart_index,
                        entry.time_sec,
                        e
                    );
                    continue;
                }
            };
            let handle = self.timer.schedule(
                now,
                delay,
                PendingSpawn {
                    session,
                    lane: entry.lane,
                    chart_index,
                },
            );
            self.handles.push(handle);
        }
        self.handles.len()
    }

    /// Returns how many handles were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.handles.len();
        for handle in self.handles.drain(..) {
            self.timer.cancel(handle);
        }
        n
    }

    /// Handles held for the current session (fired or not).
    #[inline]
    pub fn armed(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

impl<T: SpawnTimer> Drop for NoteScheduler<T> {
    // platform timers may outlive the scheduler; nothing may fire afterwards
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Virtual-clock timer for headless drivers and tests.
#[derive(Debug, Default)]
pub struct ManualTimer {
    now: Duration,
    next_handle: u64,
    pending: Vec<(u64, Duration, PendingSpawn)>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Timers armed but not fired or cancelled.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward and return the spawns that came due, in deadline
    /// order (ties in arming order).
    pub fn advance_to(&mut self, now: Duration) -> Vec<PendingSpawn> {
        self.now = self.now.max(now);
        let clock = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(_, at, _)| *at <= clock);
        self.pending = rest;
        due.sort_by_key(|(handle, at, _)| (*at, *handle));
        due.into_iter().map(|(_, _, spawn)| spawn).collect()
    }
}

impl SpawnTimer for ManualTimer {
    type Handle = u64;

    fn schedule(&mut self, now: Duration, delay: Duration, spawn: PendingSpawn) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.pending.push((handle, now + delay, spawn));
        handle
    }

    fn cancel(&mut self, handle: u64) {
        self.pending.retain(|(h, _, _)| *h != handle);
    }
}
