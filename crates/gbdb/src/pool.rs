//! Bounded worker pool with cooperative cancellation.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, unbounded};
use tracing::{debug, warn};

/// Granularity of [`CancelToken::sleep`].
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Shared stop flag. Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sleep for `duration` unless cancelled first. Returns `false` when the
    /// sleep was cut short.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }
}

/// Run `work` over `jobs` on up to `workers` threads.
///
/// Results are handed to `on_result` on the calling thread in completion
/// order. Once `cancel` fires no further job starts; jobs already running
/// finish and their results are still delivered. Returns the number of
/// results delivered.
pub fn run_pool<J, R, W, F>(
    jobs: Vec<J>,
    workers: usize,
    cancel: &CancelToken,
    work: W,
    mut on_result: F,
) -> io::Result<usize>
where
    J: Send,
    R: Send,
    W: Fn(J) -> R + Sync,
    F: FnMut(R),
{
    if jobs.is_empty() {
        return Ok(0);
    }
    let workers = workers.clamp(1, jobs.len());

    let (job_tx, job_rx) = unbounded::<J>();
    for job in jobs {
        // Receiver is alive until the scope below ends.
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    let (result_tx, result_rx) = unbounded::<R>();
    let work = &work;

    thread::scope(|scope| {
        start_workers(workers, &job_rx, |idx| {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            thread::Builder::new()
                .name(format!("gbdb-worker-{idx}"))
                .spawn_scoped(scope, move || {
                    while let Ok(job) = job_rx.recv() {
                        if cancel.is_cancelled() {
                            debug!("worker {idx} stopping after cancellation");
                            break;
                        }
                        if result_tx.send(work(job)).is_err() {
                            break;
                        }
                    }
                })
                .map(drop)
        })?;
        drop(result_tx);

        let mut delivered = 0;
        for result in result_rx.iter() {
            delivered += 1;
            on_result(result);
        }
        Ok(delivered)
    })
}

/// Call `spawn_one` for each worker index. If one fails, the queued jobs are
/// discarded so the workers already running stop after their current job.
fn start_workers<J>(
    workers: usize,
    job_rx: &Receiver<J>,
    mut spawn_one: impl FnMut(usize) -> io::Result<()>,
) -> io::Result<()> {
    for idx in 0..workers {
        if let Err(err) = spawn_one(idx) {
            let dropped = job_rx.try_iter().count();
            warn!("failed to start worker {idx}: {err}, dropped {dropped} queued jobs");
            return Err(err);
        }
    }
    Ok(())
}
