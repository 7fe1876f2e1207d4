//! Short-lived conversation history.
//!
//! [`store::SessionStore`] keeps a sliding window of turns per session and
//! forgets sessions that sit idle past their TTL. [`sweeper::spawn_sweeper`]
//! drives the expiry on a fixed interval.

pub mod clock;
pub mod store;
pub mod sweeper;
