//! Per-project serialization of task writes.
//!
//! Conflict validation reads the project's tasks and then writes; without a
//! serialization point two concurrent writers can both pass validation and
//! store overlapping tasks. Holding a project's lock across the
//! read-check-write sequence closes that window within one process. Separate
//! processes sharing a database are not coordinated.

use crate::project::domain::ProjectId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async mutexes keyed by project.
#[derive(Debug, Clone, Default)]
pub struct ProjectLocks {
    locks: Arc<Mutex<HashMap<ProjectId, Arc<AsyncMutex<()>>>>>,
}

/// Guard proving exclusive access to a project's task list.
pub type ProjectGuard = OwnedMutexGuard<()>;

impl ProjectLocks {
    /// Creates an empty lock registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the project.
    pub async fn acquire(&self, project_id: ProjectId) -> ProjectGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(project_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Drops the lock entry of a deleted project.
    ///
    /// Holders of an existing guard keep it; later callers get a fresh lock.
    pub fn forget(&self, project_id: ProjectId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.remove(&project_id);
    }

    /// Returns how many projects currently have a lock entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when no project has a lock entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
