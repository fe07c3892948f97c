use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::lock;
use crate::error::{FormstateError, Result};

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Callback run once when a timer elapses
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// One-shot timers with explicit cancellation.
///
/// Implementations must never run `task` from inside `schedule`.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;

    /// Returns false when the timer already fired or was cancelled
    fn cancel(&self, handle: TimerHandle) -> bool;

    /// Timers scheduled but neither fired nor cancelled
    fn pending(&self) -> usize;
}

/// Timers backed by `tokio::time::sleep` tasks on a runtime
pub struct TokioScheduler {
    runtime: Handle,
    next_id: AtomicU64,
    tasks: Arc<Mutex<HashMap<TimerHandle, JoinHandle<()>>>>,
}

impl std::fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl TokioScheduler {
    /// Use the runtime the caller is currently running on
    pub fn new() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| FormstateError::NoRuntime)?;
        Ok(Self::with_handle(runtime))
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let handle = TimerHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        let tasks = Arc::clone(&self.tasks);

        // Hold the map while spawning so the task cannot finish before it is registered.
        let mut registered = lock(&self.tasks);
        let join = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if lock(&tasks).remove(&handle).is_some() {
                task();
            }
        });
        registered.insert(handle, join);
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        match lock(&self.tasks).remove(&handle) {
            Some(join) => {
                join.abort();
                true
            }
            None => false,
        }
    }

    fn pending(&self) -> usize {
        lock(&self.tasks).len()
    }
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    // Keyed by (deadline, handle) so equal deadlines fire in scheduling order
    queue: BTreeMap<(Duration, TimerHandle), TimerTask>,
}

/// Deterministic scheduler driven by an explicitly advanced virtual clock
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        lock(&self.state).now
    }

    /// Move the clock forward, running every timer that comes due.
    ///
    /// Timers scheduled by a running task are picked up if they fall inside
    /// the window. Returns the number of timers fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = lock(&self.state).now + by;
        let mut fired = 0;

        loop {
            let due = {
                let mut state = lock(&self.state);
                let next = state
                    .queue
                    .first_key_value()
                    .map(|(key, _)| *key)
                    .filter(|(deadline, _)| *deadline <= target);
                match next {
                    Some(key) => {
                        state.now = key.0;
                        state.queue.remove(&key)
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };

            match due {
                Some(task) => {
                    task();
                    fired += 1;
                }
                None => return fired,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let mut state = lock(&self.state);
        state.next_id += 1;
        let handle = TimerHandle(state.next_id);
        let deadline = state.now + delay;
        state.queue.insert((deadline, handle), task);
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut state = lock(&self.state);
        let key = state.queue.keys().find(|(_, queued)| *queued == handle).copied();
        key.and_then(|key| state.queue.remove(&key)).is_some()
    }

    fn pending(&self) -> usize {
        lock(&self.state).queue.len()
    }
}
