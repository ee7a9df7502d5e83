//! Batch driver: runs many independent generations, sequentially or on a bounded
//! worker pool, and tolerates per-run failures.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam_channel::{bounded, unbounded};
use tracing::{error, info, warn};

use crate::error::RunError;
use crate::run::RunOutput;

/// Outcome counts of a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: u32,
    pub failed: u32,
}

impl BatchReport {
    fn record(&mut self, index: u32, result: Result<RunOutput, RunError>) {
        match result {
            Ok(output) => {
                self.succeeded += 1;
                info!(
                    run = index,
                    seed = output.seed,
                    frames = output.frames,
                    planets = output.planets,
                    path = %output.gif_path.display(),
                    "run finished"
                );
            }
            Err(e) => {
                self.failed += 1;
                error!(run = index, "run failed: {e}");
            }
        }
    }

    fn record_panic(&mut self, index: u32) {
        self.failed += 1;
        error!(run = index, "run panicked");
    }

    /// True when at least one run was attempted and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }
}

/// How a batch schedules its runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    pub iterations: u32,
    pub workers: usize,
    pub sequential: bool,
}

impl BatchPlan {
    /// Worker threads actually spawned: never more than there are runs.
    pub fn effective_workers(&self) -> usize {
        if self.sequential {
            return 1;
        }
        let runs = usize::try_from(self.iterations).unwrap_or(usize::MAX).max(1);
        self.workers.clamp(1, runs)
    }
}

/// Execute `job` once per run index in `0..plan.iterations`.
pub fn run_batch<F>(plan: BatchPlan, job: F) -> BatchReport
where
    F: Fn(u32) -> Result<RunOutput, RunError> + Send + Sync + 'static,
{
    if plan.iterations == 0 {
        return BatchReport::default();
    }

    let workers = plan.effective_workers();
    let cpus = num_cpus::get();
    info!(
        iterations = plan.iterations,
        workers,
        available_cpus = cpus,
        "starting batch"
    );
    if workers > cpus {
        warn!(workers, cpus, "more workers than CPU cores; runs will contend");
    }

    if plan.sequential || workers == 1 {
        run_sequential(plan.iterations, &job)
    } else {
        run_pooled(plan.iterations, workers, Arc::new(job))
    }
}

fn run_sequential<F>(iterations: u32, job: &F) -> BatchReport
where
    F: Fn(u32) -> Result<RunOutput, RunError>,
{
    let mut report = BatchReport::default();
    for index in 0..iterations {
        match panic::catch_unwind(AssertUnwindSafe(|| job(index))) {
            Ok(result) => report.record(index, result),
            Err(_) => report.record_panic(index),
        }
    }
    report
}

fn run_pooled<F>(iterations: u32, workers: usize, job: Arc<F>) -> BatchReport
where
    F: Fn(u32) -> Result<RunOutput, RunError> + Send + Sync + 'static,
{
    let (task_sender, task_receiver) = bounded::<u32>(workers * 2);
    let (result_sender, result_receiver) = unbounded::<(u32, Result<RunOutput, RunError>)>();

    let mut handles = Vec::with_capacity(workers);
    for i in 0..workers {
        let receiver = task_receiver.clone();
        let sender = result_sender.clone();
        let job = Arc::clone(&job);

        let spawned = std::thread::Builder::new()
            .name(format!("helios-worker-{i}"))
            .spawn(move || {
                while let Ok(index) = receiver.recv() {
                    if sender.send((index, job(index))).is_err() {
                        break;
                    }
                }
            });
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => warn!("failed to spawn worker {i}: {e}"),
        }
    }
    drop(task_receiver);
    drop(result_sender);

    if handles.is_empty() {
        warn!("no workers available, falling back to sequential runs");
        return run_sequential(iterations, job.as_ref());
    }

    for index in 0..iterations {
        if task_sender.send(index).is_err() {
            break;
        }
    }
    drop(task_sender);

    let mut report = BatchReport::default();
    let mut seen = 0;
    for (index, result) in result_receiver.iter() {
        report.record(index, result);
        seen += 1;
    }

    for handle in handles {
        if handle.join().is_err() {
            error!("worker thread panicked");
        }
    }
    // Runs lost to a panicking worker never report back.
    if seen < iterations {
        error!(lost = iterations - seen, "runs did not report a result");
        report.failed += iterations - seen;
    }
    report
}
