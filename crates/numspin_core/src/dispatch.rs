//! UI-thread dispatch
//!
//! Widgets are owned by a single UI thread, but some of their callbacks run
//! elsewhere (the spin buttons' auto-repeat workers, for one). Work that must
//! touch UI-owned state is posted through a [`UiHandle`] and executed when the
//! UI thread drains its [`UiQueue`].
//!
//! ```rust
//! use numspin_core::dispatch::ui_queue;
//!
//! let (handle, queue) = ui_queue();
//! let worker = std::thread::spawn(move || {
//!     handle.post(|| println!("running on the UI thread"));
//! });
//! worker.join().unwrap();
//! assert_eq!(queue.run_pending(), 1);
//! ```

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use parking_lot::RwLock;

/// A unit of work to run on the UI thread
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Callback for waking up the UI event loop after a post
///
/// Typically forwards to the platform's event loop proxy.
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// Wake slot shared by a queue and every handle cloned from it
type SharedWake = Arc<RwLock<Option<WakeCallback>>>;

/// Create a connected handle/queue pair
pub fn ui_queue() -> (UiHandle, UiQueue) {
    let (tx, rx) = mpsc::channel();
    let handle = UiHandle {
        tx,
        wake: Arc::new(RwLock::new(None)),
    };
    let queue = UiQueue {
        rx,
        handle: handle.clone(),
    };
    (handle, queue)
}

/// Sending side of the UI queue; cheap to clone and `Send`
#[derive(Clone)]
pub struct UiHandle {
    tx: Sender<UiTask>,
    wake: SharedWake,
}

impl UiHandle {
    /// Post a task to run on the UI thread
    ///
    /// Never blocks. Returns false if the queue has been dropped, in which
    /// case the task is discarded.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.tx.send(Box::new(task)).is_err() {
            tracing::trace!("UiHandle: queue gone, dropping task");
            return false;
        }
        // Clone out so the callback runs without the slot locked
        let wake = self.wake.read().clone();
        if let Some(wake) = wake {
            wake();
        }
        true
    }
}

/// Receiving side of the UI queue; owned by the UI thread
pub struct UiQueue {
    rx: Receiver<UiTask>,
    handle: UiHandle,
}

impl UiQueue {
    /// Get a handle for posting to this queue
    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Set a callback invoked after every post
    ///
    /// Applies to every handle of this queue, including ones handed out
    /// before the call.
    pub fn set_wake_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.handle.wake.write() = Some(Arc::new(callback));
    }

    /// Run every task posted so far; returns how many ran
    ///
    /// Tasks posted while draining are picked up in the same call.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            count += 1;
        }
        if count > 0 {
            tracing::trace!(count, "UiQueue: ran pending tasks");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_post_from_other_thread() {
        let (handle, queue) = ui_queue();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        thread::spawn(move || {
            for _ in 0..3 {
                let h = h.clone();
                handle.post(move || {
                    h.fetch_add(1, Ordering::SeqCst);
                });
            }
        })
        .join()
        .unwrap();

        // Nothing runs until the UI thread drains
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(queue.run_pending(), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(queue.run_pending(), 0);
    }

    #[test]
    fn test_post_after_queue_dropped() {
        let (handle, queue) = ui_queue();
        drop(queue);
        assert!(!handle.post(|| {}));
    }

    #[test]
    fn test_wake_callback() {
        let (_, queue) = ui_queue();
        let wakes = Arc::new(AtomicUsize::new(0));
        let w = wakes.clone();
        queue.set_wake_callback(move || {
            w.fetch_add(1, Ordering::SeqCst);
        });

        let handle = queue.handle();
        handle.post(|| {});
        handle.post(|| {});
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
        assert_eq!(queue.run_pending(), 2);
    }

    #[test]
    fn test_wake_reaches_handles_taken_earlier() {
        let (early, queue) = ui_queue();
        let from_queue = queue.handle();
        let wakes = Arc::new(AtomicUsize::new(0));
        let w = wakes.clone();
        queue.set_wake_callback(move || {
            w.fetch_add(1, Ordering::SeqCst);
        });

        let worker = thread::spawn(move || {
            early.post(|| {});
            from_queue.post(|| {});
        });
        worker.join().unwrap();
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
        assert_eq!(queue.run_pending(), 2);
    }
}
