pub mod data_loader;

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Owns the background tasks spawned for data loading and mutations.
///
/// Tasks are keyed by id; spawning under an id that is already running
/// aborts the old task first, so at most one fetch per key is in flight.
pub struct BackgroundTaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    pub fn spawn_load_task<F>(&mut self, task_id: String, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(existing) = self.tasks.remove(&task_id) {
            tracing::debug!("Aborting in-flight task '{}'", task_id);
            existing.abort();
        }

        self.tasks.retain(|_, handle| !handle.is_finished());

        let handle = tokio::spawn(future);
        self.tasks.insert(task_id, handle);
    }

    pub fn cancel_all(&mut self) {
        for (task_id, handle) in self.tasks.drain() {
            tracing::debug!("Cancelling task '{}'", task_id);
            handle.abort();
        }
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
