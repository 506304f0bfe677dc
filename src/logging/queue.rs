//! Serial execution queue
//!
//! A single named worker thread owns some state `S` and runs submitted tasks
//! against it one at a time, in submission order. The state is only ever
//! touched from inside those tasks, so it needs no lock.

use std::io;
use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};

type Task<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// FIFO, single-worker task queue owning its state
pub struct SerialQueue<S> {
    tx: Option<mpsc::UnboundedSender<Task<S>>>,
    worker: Option<JoinHandle<()>>,
}

impl<S: Send + 'static> SerialQueue<S> {
    /// Spawn the worker thread with the given name and initial state
    pub fn spawn(name: &str, mut state: S) -> io::Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Task<S>>();

        let worker = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Some(task) = rx.blocking_recv() {
                    task(&mut state);
                }
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Enqueue a task and return immediately
    ///
    /// Returns false if the worker is gone and the task was discarded.
    pub fn submit<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        match &self.tx {
            Some(tx) => tx.send(Box::new(task)).is_ok(),
            None => false,
        }
    }

    /// Enqueue a task whose result is delivered through a one-shot channel
    ///
    /// The receiver reports an error if the task never ran.
    pub fn run<F, R>(&self, task: F) -> oneshot::Receiver<R>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();
        self.submit(move |state| {
            // Ignore error if the caller stopped waiting
            let _ = result_tx.send(task(state));
        });
        result_rx
    }
}

impl<S> Drop for SerialQueue<S> {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain what is queued and exit
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_tasks_run_in_order() {
        let queue = SerialQueue::spawn("test-queue", Vec::new()).unwrap();
        for i in 0..100 {
            assert!(queue.submit(move |items: &mut Vec<i32>| items.push(i)));
        }

        let items = queue.run(|items| items.clone()).blocking_recv().unwrap();
        assert_eq!(items, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_run_returns_result() {
        let queue = SerialQueue::spawn("test-queue", 41u32).unwrap();
        queue.submit(|n| *n += 1);

        let value = tokio_test::block_on(queue.run(|n| *n)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_drop_drains_pending_tasks() {
        let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        {
            let queue = SerialQueue::spawn("test-queue", ()).unwrap();
            for _ in 0..50 {
                let counter = Arc::clone(&counter);
                queue.submit(move |_| {
                    counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                });
            }
        }
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 50);
    }

    #[test]
    fn test_submit_from_many_threads() {
        let queue = Arc::new(SerialQueue::spawn("test-queue", 0usize).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        queue.submit(|n| *n += 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let total = queue.run(|n| *n).blocking_recv().unwrap();
        assert_eq!(total, 200);
    }

    #[test]
    fn test_worker_thread_is_named() {
        let queue = SerialQueue::spawn("sglog-test", ()).unwrap();
        let name = queue
            .run(|_| std::thread::current().name().map(str::to_string))
            .blocking_recv()
            .unwrap();
        assert_eq!(name.as_deref(), Some("sglog-test"));
    }
}
