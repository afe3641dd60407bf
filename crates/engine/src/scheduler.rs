//! Background scheduling of preheating jobs
//!
//! A bounded job queue feeds a fixed pool of workers. When the queue is full
//! the oldest pending job is discarded and its waiter, if any, receives a
//! failure result. A ticker task enqueues the configured strategy on every
//! schedule interval.

use crate::config::PreheatConfig;
use crate::executor::PreheatingExecutor;
use futures::FutureExt;
use parking_lot::Mutex;
use preheat_core::{Error, ExecutionResult, Result, StrategyType};
use preheat_utils::tracing as events;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Message delivered to the waiter of a job evicted from a full queue
pub const DROPPED_MESSAGE: &str = "dropped: preheating queue full";

struct Job {
    strategy_type: StrategyType,
    reply: Option<oneshot::Sender<ExecutionResult>>,
}

impl Job {
    fn reject(self, message: &str) {
        if let Some(reply) = self.reply {
            let _ = reply.send(ExecutionResult::failure(self.strategy_type, message, 0, 0));
        }
    }
}

/// Bounded drop-oldest queue shared by producers and workers
pub(crate) struct JobQueue {
    jobs: Mutex<VecDeque<Job>>,
    notify: Notify,
    capacity: usize,
    dropped: AtomicU64,
    shutdown: AtomicBool,
}

impl JobQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            jobs: Mutex::new(VecDeque::with_capacity(capacity)),
            notify: Notify::new(),
            capacity: capacity.max(1),
            dropped: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        }
    }

    fn push(&self, job: Job) -> Result<()> {
        let evicted = {
            let mut jobs = self.jobs.lock();
            // checked under the lock so a concurrent close cannot strand the job
            if self.is_shut_down() {
                return Err(Error::QueueClosed);
            }
            let evicted = if jobs.len() >= self.capacity {
                jobs.pop_front()
            } else {
                None
            };
            jobs.push_back(job);
            evicted
        };

        if let Some(old) = evicted {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            events::preheat_dropped(old.strategy_type.as_str(), self.capacity);
            old.reject(DROPPED_MESSAGE);
        }

        self.notify.notify_one();
        Ok(())
    }

    /// Wait for the next job; `None` once the queue is shut down
    async fn next(&self) -> Option<Job> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut jobs = self.jobs.lock();
                if self.is_shut_down() {
                    return None;
                }
                if let Some(job) = jobs.pop_front() {
                    return Some(job);
                }
            }

            notified.await;
        }
    }

    fn close(&self) -> Vec<Job> {
        let drained = {
            let mut jobs = self.jobs.lock();
            self.shutdown.store(true, Ordering::Release);
            jobs.drain(..).collect()
        };
        self.notify.notify_waiters();
        drained
    }

    fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Periodic and on-demand preheating on top of a shared executor
pub struct PreheatScheduler {
    executor: Arc<PreheatingExecutor>,
    queue: Arc<JobQueue>,
    interval: Duration,
    scheduled_strategy: StrategyType,
    workers: usize,
    worker_handles: Mutex<Vec<JoinHandle<()>>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl PreheatScheduler {
    pub fn new(executor: Arc<PreheatingExecutor>, config: &PreheatConfig) -> Self {
        Self {
            executor,
            queue: Arc::new(JobQueue::new(config.queue_capacity)),
            interval: config.schedule_interval(),
            scheduled_strategy: config.scheduled_strategy.clone(),
            workers: config.workers.max(1),
            worker_handles: Mutex::new(Vec::new()),
            ticker: Mutex::new(None),
        }
    }

    /// Spawn the workers and, when `with_ticker` is set, the interval ticker
    ///
    /// Must be called from within a tokio runtime. Calling it again is a no-op.
    pub fn start(&self, with_ticker: bool) {
        let mut handles = self.worker_handles.lock();
        if !handles.is_empty() || self.queue.is_shut_down() {
            return;
        }

        for worker in 0..self.workers {
            let queue = Arc::clone(&self.queue);
            let executor = Arc::clone(&self.executor);
            handles.push(tokio::spawn(async move {
                tracing::debug!(worker, "preheat worker started");
                while let Some(job) = queue.next().await {
                    let execution = AssertUnwindSafe(executor.execute(&job.strategy_type));
                    let result = match execution.catch_unwind().await {
                        Ok(result) => result,
                        Err(_) => {
                            tracing::error!(
                                worker,
                                strategy = %job.strategy_type,
                                "preheating execution panicked"
                            );
                            ExecutionResult::failure(
                                job.strategy_type.clone(),
                                "preheating execution panicked",
                                0,
                                0,
                            )
                        }
                    };
                    if let Some(reply) = job.reply {
                        let _ = reply.send(result);
                    }
                }
                tracing::debug!(worker, "preheat worker stopped");
            }));
        }

        if with_ticker {
            let queue = Arc::clone(&self.queue);
            let period = self.interval;
            let strategy_type = self.scheduled_strategy.clone();
            *self.ticker.lock() = Some(tokio::spawn(async move {
                let mut ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    ticker.tick().await;
                    if queue.is_shut_down() {
                        break;
                    }
                    let job = Job {
                        strategy_type: strategy_type.clone(),
                        reply: None,
                    };
                    if queue.push(job).is_err() {
                        break;
                    }
                }
            }));
        }

        tracing::info!(
            workers = self.workers,
            capacity = self.queue.capacity,
            interval_secs = self.interval.as_secs(),
            ticker = with_ticker,
            "preheat scheduler started"
        );
    }

    /// Enqueue a job nobody waits on
    pub fn trigger(&self, strategy_type: StrategyType) -> Result<()> {
        self.queue.push(Job {
            strategy_type,
            reply: None,
        })
    }

    /// Enqueue a job and get a receiver for its result
    pub fn submit(
        &self,
        strategy_type: StrategyType,
    ) -> Result<oneshot::Receiver<ExecutionResult>> {
        let (tx, rx) = oneshot::channel();
        self.queue.push(Job {
            strategy_type,
            reply: Some(tx),
        })?;
        Ok(rx)
    }

    /// Jobs discarded because the queue was full
    pub fn dropped_jobs(&self) -> u64 {
        self.queue.dropped()
    }

    /// Jobs waiting for a worker
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Stop accepting jobs, let in-flight executions finish, fail the rest
    pub async fn shutdown(&self) {
        let pending = self.queue.close();
        let pending_count = pending.len();
        for job in pending {
            job.reject(&Error::QueueClosed.to_string());
        }

        if let Some(ticker) = self.ticker.lock().take() {
            ticker.abort();
        }

        let handles: Vec<_> = self.worker_handles.lock().drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "preheat worker ended abnormally");
            }
        }

        tracing::info!(pending = pending_count, "preheat scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(strategy_type: StrategyType) -> (Job, oneshot::Receiver<ExecutionResult>) {
        let (tx, rx) = oneshot::channel();
        (
            Job {
                strategy_type,
                reply: Some(tx),
            },
            rx,
        )
    }

    #[tokio::test]
    async fn test_full_queue_drops_oldest() {
        let queue = JobQueue::new(2);
        let (first, mut first_rx) = job(StrategyType::Startup);
        let (second, _second_rx) = job(StrategyType::Scheduled);
        let (third, _third_rx) = job(StrategyType::Adaptive);

        queue.push(first).unwrap();
        queue.push(second).unwrap();
        assert!(first_rx.try_recv().is_err());

        queue.push(third).unwrap();
        let dropped = first_rx.await.unwrap();
        assert!(!dropped.success);
        assert_eq!(dropped.message, DROPPED_MESSAGE);
        assert_eq!(dropped.strategy_type, StrategyType::Startup);
        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.len(), 2);

        let next = queue.next().await.unwrap();
        assert_eq!(next.strategy_type, StrategyType::Scheduled);
    }

    #[test]
    fn test_close_racing_pushes_leaves_no_stranded_jobs() {
        let queue = Arc::new(JobQueue::new(100_000));
        let producers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    let mut receivers = Vec::new();
                    for _ in 0..2_000 {
                        let (queued, rx) = job(StrategyType::Scheduled);
                        let _ = queue.push(queued);
                        receivers.push(rx);
                    }
                    receivers
                })
            })
            .collect();

        std::thread::yield_now();
        drop(queue.close());

        let mut receivers = Vec::new();
        for producer in producers {
            receivers.extend(producer.join().unwrap());
        }

        assert_eq!(queue.len(), 0);
        for mut rx in receivers {
            assert!(matches!(
                rx.try_recv(),
                Err(oneshot::error::TryRecvError::Closed)
            ));
        }
    }

    #[tokio::test]
    async fn test_closed_queue_rejects_and_wakes_waiters() {
        let queue = Arc::new(JobQueue::new(4));
        let waiter = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.next().await.is_none() })
        };
        tokio::task::yield_now().await;

        let (pending, pending_rx) = job(StrategyType::Recovery);
        queue.jobs.lock().push_back(pending);
        let drained = queue.close();
        assert_eq!(drained.len(), 1);
        drop(drained);
        assert!(pending_rx.await.is_err());

        assert!(waiter.await.unwrap());
        let (late, _rx) = job(StrategyType::Startup);
        assert!(matches!(queue.push(late), Err(Error::QueueClosed)));
    }
}
