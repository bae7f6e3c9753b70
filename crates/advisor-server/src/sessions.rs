//! Registry of live calls keyed by the gateway's call id.

use advisor_call::CallSession;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

/// One live call.
///
/// The session sits behind an async mutex because a turn holds it across
/// provider calls. The hang-up flag lives outside that lock so a status
/// callback can raise it while a turn is still in flight.
pub struct CallHandle {
    pub session: tokio::sync::Mutex<CallSession>,
    hung_up: AtomicBool,
    last_activity: Mutex<Instant>,
}

impl CallHandle {
    fn new(session: CallSession) -> Self {
        Self {
            session: tokio::sync::Mutex::new(session),
            hung_up: AtomicBool::new(false),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    /// Records that a callback arrived for this call.
    pub fn touch(&self) {
        match self.last_activity.lock() {
            Ok(mut at) => *at = Instant::now(),
            Err(poisoned) => *poisoned.into_inner() = Instant::now(),
        }
    }

    pub fn idle_for(&self) -> Duration {
        match self.last_activity.lock() {
            Ok(at) => at.elapsed(),
            Err(poisoned) => poisoned.into_inner().elapsed(),
        }
    }

    /// Flags the call as gone. Results of in-flight work are discarded.
    pub fn mark_hung_up(&self) {
        self.hung_up.store(true, Ordering::SeqCst);
    }

    pub fn is_hung_up(&self) -> bool {
        self.hung_up.load(Ordering::SeqCst)
    }
}

/// Result of looking up a call id.
pub enum Lookup {
    Live(Arc<CallHandle>),
    /// The call ended recently; callbacks for it are no-ops.
    Ended,
    Unknown,
}

/// Live calls plus tombstones for recently ended ones.
///
/// Uses `std::sync` locks: every acquisition is a brief map operation that
/// never spans an `.await`.
#[derive(Default)]
pub struct SessionRegistry {
    calls: RwLock<HashMap<String, Arc<CallHandle>>>,
    ended: Mutex<HashMap<String, Instant>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn calls_read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<CallHandle>>> {
        match self.calls.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("session registry lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn calls_write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<CallHandle>>> {
        match self.calls.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("session registry lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn ended(&self) -> std::sync::MutexGuard<'_, HashMap<String, Instant>> {
        match self.ended.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("session tombstone lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Registers a new call. Returns `None` if the id is already live or
    /// has recently ended.
    pub fn open(&self, session: CallSession) -> Option<Arc<CallHandle>> {
        let call_id = session.call_id().to_string();

        // Lock order is `calls` then `ended`. `finish` writes the tombstone
        // before removing the live entry, so one of the two checks sees it.
        let mut calls = self.calls_write();
        if calls.contains_key(&call_id) || self.ended().contains_key(&call_id) {
            return None;
        }
        let handle = Arc::new(CallHandle::new(session));
        calls.insert(call_id, handle.clone());
        Some(handle)
    }

    pub fn lookup(&self, call_id: &str) -> Lookup {
        if let Some(handle) = self.calls_read().get(call_id) {
            return Lookup::Live(handle.clone());
        }
        if self.ended().contains_key(call_id) {
            Lookup::Ended
        } else {
            Lookup::Unknown
        }
    }

    /// Discards a call's session and remembers that it ended. Idempotent.
    pub fn finish(&self, call_id: &str) {
        self.ended().insert(call_id.to_string(), Instant::now());
        if let Some(handle) = self.calls_write().remove(call_id) {
            handle.mark_hung_up();
        }
    }

    pub fn active_calls(&self) -> usize {
        self.calls_read().len()
    }

    /// Evicts calls idle longer than `idle_timeout` and forgets tombstones
    /// older than `tombstone_ttl`. Returns `(evicted, forgotten)`.
    pub fn reap(&self, idle_timeout: Duration, tombstone_ttl: Duration) -> (usize, usize) {
        let stale: Vec<String> = self
            .calls_read()
            .iter()
            .filter(|(_, handle)| handle.idle_for() > idle_timeout)
            .map(|(call_id, _)| call_id.clone())
            .collect();
        for call_id in &stale {
            tracing::info!(call_id = %call_id, "evicting idle call session");
            self.finish(call_id);
        }

        let mut ended = self.ended();
        let before = ended.len();
        ended.retain(|_, at| at.elapsed() <= tombstone_ttl);
        (stale.len(), before - ended.len())
    }
}
