use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::PoisonError;

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::fifo_set::FifoSet;
use crate::identifier::Identifier;
use crate::record_file::{self, LoadReport};
use crate::sync::{Mutex, MutexGuard};

/// Thread-safe [`FifoSet`] with optional file persistence.
///
/// Every method takes the same exclusive lock for its whole duration, so each
/// call is atomic with respect to every other call. [`save`](Self::save) keeps
/// the lock while writing, which stalls other callers for the length of the
/// disk write.
pub struct BoundedUniqueQueue {
    inner: Mutex<FifoSet>,
    source_path: Option<PathBuf>,
}

impl BoundedUniqueQueue {
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        Self::open(capacity, None)
    }

    pub fn with_source<P: Into<PathBuf>>(capacity: usize, path: P) -> Result<Self, QueueError> {
        Self::open(capacity, Some(path.into()))
    }

    pub fn from_config(config: &QueueConfig) -> Result<Self, QueueError> {
        config.validate()?;
        Self::open(config.capacity, config.source_path.clone())
    }

    /// Creates the queue and, when `source_path` is set, restores it from that
    /// file.
    ///
    /// Restoring is best-effort: a missing, unreadable or damaged file never
    /// fails construction. Records read before a failure are kept, and if the
    /// file holds more than `capacity` identifiers the oldest are dropped.
    pub fn open(capacity: usize, source_path: Option<PathBuf>) -> Result<Self, QueueError> {
        let mut set = FifoSet::new(capacity)?;
        if let Some(path) = source_path.as_deref() {
            restore_from(&mut set, path);
        }
        Ok(Self { inner: Mutex::new(set), source_path })
    }

    fn lock(&self) -> MutexGuard<'_, FifoSet> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.lock().contains(id)
    }

    /// Adds `id` as the newest entry, evicting the oldest ones past capacity.
    /// Returns `false` if `id` was already present; its position is kept.
    pub fn add(&self, id: Identifier) -> bool {
        let mut set = self.lock();
        let before = set.len();
        let added = set.insert(id);
        if added && set.len() == before {
            log::trace!("idqueue: evicted oldest to admit {id}");
        }
        added
    }

    /// Adds every identifier under a single lock acquisition and returns how
    /// many were new.
    ///
    /// `ids` is drained before the lock is taken, so the iterator may itself
    /// call back into this queue.
    pub fn add_all<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = Identifier>,
    {
        let ids: Vec<Identifier> = ids.into_iter().collect();
        let mut set = self.lock();
        ids.into_iter().filter(|id| set.insert(*id)).count()
    }

    pub fn try_remove_oldest(&self) -> Option<Identifier> {
        self.lock().pop_oldest()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Lowering the capacity below the current length evicts the oldest
    /// entries before the call returns. Zero is rejected and nothing changes.
    pub fn set_capacity(&self, capacity: usize) -> Result<(), QueueError> {
        let evicted = self.lock().set_capacity(capacity)?;
        if evicted > 0 {
            log::debug!("idqueue: capacity set to {capacity}, evicted {evicted}");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Writes the contents, oldest first, to `path` or else to the source
    /// path given at construction.
    ///
    /// Returns `false` when neither path exists or the write fails; the
    /// failure is logged and the in-memory contents are untouched.
    pub fn save(&self, path: Option<&Path>) -> bool {
        match self.try_save(path) {
            Ok(_) => true,
            Err(QueueError::NoPersistencePath) => false,
            Err(err) => {
                log::warn!("idqueue: save failed: {err}");
                false
            }
        }
    }

    /// Like [`save`](Self::save) but reports why a save failed. Returns the
    /// number of identifiers written.
    pub fn try_save(&self, path: Option<&Path>) -> Result<usize, QueueError> {
        let path = path.or(self.source_path.as_deref()).ok_or(QueueError::NoPersistencePath)?;
        let set = self.lock();
        let written = record_file::write_file(path, set.iter())?;
        log::debug!("idqueue: saved {written} identifiers to {}", path.display());
        Ok(written)
    }

    /// Copy of the contents, oldest first.
    pub fn snapshot(&self) -> Vec<Identifier> {
        self.lock().iter().copied().collect()
    }

    /// Iterates a snapshot taken when this is called; later changes to the
    /// queue are not observed.
    pub fn iter(&self) -> std::vec::IntoIter<Identifier> {
        self.snapshot().into_iter()
    }
}

impl<'a> IntoIterator for &'a BoundedUniqueQueue {
    type Item = Identifier;
    type IntoIter = std::vec::IntoIter<Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for BoundedUniqueQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = self.lock();
        f.debug_struct("BoundedUniqueQueue")
            .field("capacity", &set.capacity())
            .field("len", &set.len())
            .field("source_path", &self.source_path)
            .finish()
    }
}

fn restore_from(set: &mut FifoSet, path: &Path) {
    apply_report(set, path, record_file::read_file(path));
}

fn apply_report(set: &mut FifoSet, path: &Path, report: LoadReport) {
    let read = report.identifiers.len();
    let restored = report.identifiers.into_iter().filter(|id| set.restore(*id)).count();

    match report.error {
        Some(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("idqueue: no saved state at {}", path.display());
        }
        Some(err) if read > 0 => {
            log::warn!(
                "idqueue: load of {} stopped after {read} records, keeping partial state: {err}",
                path.display()
            );
        }
        Some(err) => {
            log::warn!("idqueue: load of {} failed, starting empty: {err}", path.display());
        }
        None => {}
    }
    if report.trailing_bytes > 0 {
        log::warn!(
            "idqueue: ignored {} trailing bytes in {}",
            report.trailing_bytes,
            path.display()
        );
    }
    if restored < read {
        log::debug!("idqueue: skipped {} duplicate records in {}", read - restored, path.display());
    }

    let evicted = set.evict_overflow();
    if evicted > 0 {
        log::debug!(
            "idqueue: evicted {evicted} oldest restored identifiers to fit capacity {}",
            set.capacity()
        );
    }
    log::debug!("idqueue: restored {} identifiers from {}", set.len(), path.display());
}
