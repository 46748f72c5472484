use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;

/* Scheduler owns every fire-once timer in the bot, keyed by session id
 * (giveaway close, tic-tac-toe idle timeout, reminder delivery). A timer
 * that is no longer wanted is cancelled by key instead of being left to
 * fire on dead state. Handles of timers that already fired are pruned
 * lazily on the next schedule call.
 */

pub struct Scheduler {
    tasks: Mutex<HashMap<String, AbortHandle>>,
}

impl Scheduler {
    pub fn new() -> Scheduler {
        Scheduler {
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /* Runs the task once after the delay. Scheduling a key that already
     * has a pending timer replaces (and aborts) the old one.
     */
    pub async fn schedule<F>(&self, key: &str, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        let mut tasks = self.tasks.lock().await;
        tasks.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = tasks.insert(key.to_string(), handle.abort_handle()) {
            previous.abort();
        }
    }

    // Aborts a timer. Returns whether one was still pending under the key.
    pub async fn cancel(&self, key: &str) -> bool {
        match self.tasks.lock().await.remove(key) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    #[allow(dead_code)]
    pub async fn pending(&self) -> usize {
        self.tasks
            .lock()
            .await
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl Default for Scheduler {
    fn default() -> Scheduler {
        Scheduler::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn bump(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_timer_fires_once() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule("t1", Duration::from_millis(20), bump(&fired))
            .await;
        assert_eq!(scheduler.pending().await, 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending().await, 0);
    }

    #[tokio::test]
    async fn test_cancel_prevents_firing() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule("t1", Duration::from_millis(30), bump(&fired))
            .await;
        assert!(scheduler.cancel("t1").await);
        assert!(!scheduler.cancel("t1").await);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_after_firing_reports_nothing_pending() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule("t1", Duration::from_millis(10), bump(&fired))
            .await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(!scheduler.cancel("t1").await);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reschedule_replaces_pending_timer() {
        let scheduler = Scheduler::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule("t1", Duration::from_millis(30), bump(&first))
            .await;
        scheduler
            .schedule("t1", Duration::from_millis(30), bump(&second))
            .await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
