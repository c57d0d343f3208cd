//! Fixed-size worker pool with the same submission contract as
//! [`ThreadLauncher`](crate::launcher::ThreadLauncher).

use crate::error::{LambdaError, Result};
use crate::launcher::{prepare, Job, PreparedTask, Spawn, TaskHandle};
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

pub struct WorkerPool {
    queue: Option<Sender<PreparedTask>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(LambdaError::invalid_config(
                "workers",
                "pool needs at least one worker",
            ));
        }

        let (tx, rx) = unbounded::<PreparedTask>();
        let workers = (0..size)
            .map(|id| {
                let name = format!("pool-worker-{}", id);
                let rx = rx.clone();
                thread::Builder::new()
                    .name(name.clone())
                    .spawn(move || worker_loop(rx))
                    .map_err(|source| LambdaError::Spawn { name, source })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(workers = size, "worker pool started");
        Ok(Self {
            queue: Some(tx),
            workers,
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

fn worker_loop(rx: Receiver<PreparedTask>) {
    while let Ok(task) = rx.recv() {
        tracing::trace!(task = task.name(), "picked up");
        task.run();
    }
}

impl Spawn for WorkerPool {
    fn spawn_job(&self, name: String, job: Job) -> Result<TaskHandle> {
        let (task, handle) = prepare(name.clone(), job);
        let queue = self
            .queue
            .as_ref()
            .ok_or_else(|| LambdaError::PoolClosed { name: name.clone() })?;
        queue
            .send(task)
            .map_err(|_| LambdaError::PoolClosed { name })?;
        Ok(handle)
    }
}

impl Drop for WorkerPool {
    /// Closes the queue, lets workers drain it, then joins them.
    fn drop(&mut self) {
        drop(self.queue.take());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!("pool worker exited by panic");
            }
        }
        tracing::info!("worker pool stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::{SleepOutcome, TaskContext};
    use crossbeam::channel::unbounded;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(LambdaError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_every_submitted_job_runs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.size(), 3);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let counter = Arc::clone(&counter);
                pool.launch(format!("job-{i}"), move |_: &TaskContext| {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap()
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn test_submit_returns_while_workers_are_busy() {
        let pool = WorkerPool::new(1).unwrap();
        let busy = pool
            .launch("busy", |ctx: &TaskContext| {
                ctx.sleep(Duration::from_millis(300));
            })
            .unwrap();

        let started = Instant::now();
        let queued = pool.launch("queued", |_: &TaskContext| {}).unwrap();
        assert!(started.elapsed() < Duration::from_millis(200));

        busy.join().unwrap();
        queued.join().unwrap();
    }

    #[test]
    fn test_panicking_job_does_not_kill_worker() {
        let pool = WorkerPool::new(1).unwrap();
        let bad = pool
            .launch("bad", |_: &TaskContext| panic!("bad job"))
            .unwrap();
        assert!(matches!(bad.join(), Err(LambdaError::TaskPanicked { .. })));

        let (tx, rx) = unbounded();
        pool.launch("good", move |_: &TaskContext| tx.send(1).unwrap())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(rx.recv().unwrap(), 1);
    }

    #[test]
    fn test_cancel_pool_task() {
        let pool = WorkerPool::new(1).unwrap();
        let (tx, rx) = unbounded();
        let handle = pool
            .launch("cancellable", move |ctx: &TaskContext| {
                tx.send(ctx.sleep(Duration::from_secs(30))).unwrap();
            })
            .unwrap();
        thread::sleep(Duration::from_millis(20));
        handle.cancel();
        assert_eq!(rx.recv().unwrap(), SleepOutcome::Cancelled);
        handle.join().unwrap();
    }

    #[test]
    fn test_drop_drains_queued_jobs() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(2).unwrap();
            for i in 0..10 {
                let counter = Arc::clone(&counter);
                pool.fire_and_forget(format!("drain-{i}"), move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }
}
