//! Query cache and per-view fetch orchestration.
//!
//! A [`QueryCache`] is created once per dashboard session and shared by every view.
//! Views talk to it through a [`QueryObserver`], which owns the
//! `Idle -> Loading -> Success | Error` state of one query.

mod key;
mod observer;
mod state;
mod store;
mod tests;

pub use self::key::QueryKey;
pub use self::observer::{QueryObserver, Ticket};
pub use self::state::QueryState;
pub use self::store::{CachePayload, QueryCache};
