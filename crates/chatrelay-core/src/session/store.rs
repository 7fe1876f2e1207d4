//! In-memory session store with a sliding window and idle expiry.
//!
//! One `Mutex` guards the whole map. Every operation is a short synchronous
//! critical section with no I/O, so callers must never hold a read result
//! "open" across an upstream call: read, release, call the provider, then
//! append in a second critical section.
//!
//! Timestamps are taken after the lock is acquired, so `last_access` only
//! ever moves forward.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use chatrelay_types::chat::{Role, Turn};

use super::clock::{Clock, SystemClock};

/// Per-session state. Only ever touched under the store lock.
#[derive(Debug)]
struct Session {
    messages: Vec<Turn>,
    last_access: DateTime<Utc>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            messages: Vec::new(),
            last_access: now,
        }
    }

    /// Drop the oldest turns until at most `max` remain.
    fn truncate_front(&mut self, max: usize) {
        if self.messages.len() > max {
            let excess = self.messages.len() - max;
            self.messages.drain(..excess);
        }
    }
}

/// Process-wide store of conversation history, keyed by session id.
///
/// Constructed once at startup and shared behind an `Arc`. Reads hand out
/// copies, so a caller's view is never affected by later writes.
pub struct SessionStore<C: Clock = SystemClock> {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: TimeDelta,
    max_messages: usize,
    clock: C,
}

impl SessionStore<SystemClock> {
    pub fn new(ttl: Duration, max_messages: usize) -> Self {
        Self::with_clock(ttl, max_messages, SystemClock)
    }
}

impl<C: Clock> SessionStore<C> {
    pub fn with_clock(ttl: Duration, max_messages: usize, clock: C) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            max_messages,
            clock,
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    // Every mutation leaves the map consistent, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of a session's turns, oldest first.
    ///
    /// Unknown sessions read as empty. Reading refreshes `last_access`.
    pub fn read(&self, session_id: &str) -> Vec<Turn> {
        let mut sessions = self.lock();
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.last_access = self.clock.now();
                session.messages.clone()
            }
            None => Vec::new(),
        }
    }

    /// Append one turn, creating the session on first write.
    pub fn append(&self, session_id: &str, role: Role, content: impl Into<String>) {
        self.append_many(session_id, [Turn::new(role, content)]);
    }

    /// Append several turns in a single critical section.
    ///
    /// The turns land adjacently and in order even if another request for the
    /// same session is appending concurrently.
    pub fn append_many(&self, session_id: &str, turns: impl IntoIterator<Item = Turn>) {
        let mut sessions = self.lock();
        let now = self.clock.now();
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(now));
        session.last_access = now;
        session.messages.extend(turns);
        session.truncate_front(self.max_messages);
    }

    /// Remove every session idle for longer than the TTL.
    ///
    /// Returns how many sessions were removed.
    pub fn sweep_expired(&self) -> usize {
        let mut sessions = self.lock();
        let now = self.clock.now();
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_access <= self.ttl);
        before - sessions.len()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
