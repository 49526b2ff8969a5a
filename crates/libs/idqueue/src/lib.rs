//! Bounded FIFO set of 128-bit identifiers.
//!
//! [`BoundedUniqueQueue`] remembers up to `capacity` distinct [`Identifier`]s
//! and forgets the oldest one when a new identifier would overflow it. Typical
//! use is "have I seen this message/packet/request before" tracking where the
//! memory bound matters more than perfect recall.
//!
//! - **Uniqueness**: re-adding a present identifier is a no-op and does not
//!   move it to the newest end.
//! - **Eviction**: strictly by insertion order, also when the capacity is
//!   lowered at runtime.
//! - **Persistence**: a flat file of raw 16-byte records, oldest first (see
//!   [`record_file`]). Loading is best-effort; saving reports a `bool`
//!   ([`BoundedUniqueQueue::save`]) or a `Result` ([`BoundedUniqueQueue::try_save`]).
//! - **Concurrency**: every operation runs under one exclusive lock; iteration
//!   walks a snapshot copied under that lock.
//!
//! [`FifoSet`] is the same structure without the lock, for single-threaded
//! owners.

pub mod config;
pub mod error;
pub mod fifo_set;
pub mod identifier;
pub mod queue;
pub mod record_file;

mod sync;

pub use config::QueueConfig;
pub use error::QueueError;
pub use fifo_set::FifoSet;
pub use identifier::{Identifier, IDENTIFIER_SIZE};
pub use queue::BoundedUniqueQueue;
pub use record_file::{LoadReport, RECORD_SIZE};
