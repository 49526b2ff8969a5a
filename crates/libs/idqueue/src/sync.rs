//! Lock primitive for the queue. Builds with `--cfg loom` swap in loom's
//! model-checked mutex; everything else uses std.

#[cfg(loom)]
pub(crate) use loom::sync::{Mutex, MutexGuard};
#[cfg(not(loom))]
pub(crate) use std::sync::{Mutex, MutexGuard};
