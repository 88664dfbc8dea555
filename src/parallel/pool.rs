use crossbeam::channel::{Receiver, Sender, unbounded};

use super::partition::WorkBatch;
use super::progress::ProgressSink;
use crate::error::PipelineError;
use crate::external::{CommandExecutor, Job};

/// How one worker's batch ended
#[derive(Debug)]
pub enum WorkerOutcome {
    Success {
        worker: usize,
        completed: usize,
    },
    Failure {
        worker: usize,
        /// Position of the failed job within the worker's batch
        index: usize,
        error: PipelineError,
    },
}

enum WorkerEvent {
    Completed { worker: usize },
    Finished(WorkerOutcome),
}

/// Context for worker threads to avoid too many function parameters
struct WorkerContext<'e, E: ?Sized> {
    worker_id: usize,
    batch: WorkBatch<Job>,
    events: Sender<WorkerEvent>,
    executor: &'e E,
}

/// Runs one worker thread per batch
///
/// Workers execute their jobs strictly in order and report each completed
/// job over a channel to the thread that called [`WorkerPool::run`], which
/// forwards it to the progress sink. A worker stops at its first failing
/// job. Other workers are not interrupted and run to the end of their own
/// batches.
pub struct WorkerPool<'e, E: CommandExecutor + ?Sized> {
    executor: &'e E,
    phase: String,
}

impl<'e, E: CommandExecutor + ?Sized> WorkerPool<'e, E> {
    pub fn new(executor: &'e E, phase: impl Into<String>) -> Self {
        Self {
            executor,
            phase: phase.into(),
        }
    }

    /// Run every batch to completion
    ///
    /// Returns the number of completed jobs, or the first failure received
    /// once all workers have stopped. Output written by jobs that completed
    /// before a failure is left in place.
    pub fn run(
        &self,
        batches: Vec<WorkBatch<Job>>,
        progress: &dyn ProgressSink,
    ) -> Result<usize, PipelineError> {
        if batches.is_empty() {
            return Ok(0);
        }

        let batch_sizes: Vec<usize> = batches.iter().map(WorkBatch::len).collect();
        progress.phase_started(&batch_sizes);

        let (event_tx, event_rx) = unbounded();

        // Use crossbeam::thread::scope so workers can borrow the executor
        let collected = crossbeam::thread::scope(|s| {
            for batch in batches {
                let ctx = WorkerContext {
                    worker_id: batch.index(),
                    batch,
                    events: event_tx.clone(),
                    executor: self.executor,
                };
                s.spawn(move |_| worker_thread(ctx));
            }

            // Drop the original sender so the collector sees the end
            drop(event_tx);

            collect_events(event_rx, progress)
        });

        progress.phase_finished();

        let (completed, first_failure) = collected.map_err(|_| PipelineError::WorkerPanicked {
            phase: self.phase.clone(),
        })?;

        match first_failure {
            Some((worker, index, error)) => {
                tracing::warn!(
                    "{}: worker {worker} failed after {completed} completed jobs: {error}",
                    self.phase
                );
                Err(PipelineError::PoolFailure {
                    worker,
                    index,
                    source: Box::new(error),
                })
            }
            None => Ok(completed),
        }
    }
}

fn worker_thread<E: CommandExecutor + ?Sized>(ctx: WorkerContext<'_, E>) {
    let worker = ctx.worker_id;
    let mut completed = 0;

    for (index, job) in ctx.batch.jobs().iter().enumerate() {
        match ctx.executor.execute(job) {
            Ok(_) => {
                completed += 1;
                if ctx.events.send(WorkerEvent::Completed { worker }).is_err() {
                    return; // Collector dropped
                }
            }
            Err(error) => {
                tracing::debug!("worker {worker} stopping at job {index}: {job}");
                let _ = ctx.events.send(WorkerEvent::Finished(WorkerOutcome::Failure {
                    worker,
                    index,
                    error,
                }));
                return;
            }
        }
    }

    let _ = ctx
        .events
        .send(WorkerEvent::Finished(WorkerOutcome::Success { worker, completed }));
}

type FirstFailure = Option<(usize, usize, PipelineError)>;

/// Gather events until every worker has dropped its sender
fn collect_events(
    event_rx: Receiver<WorkerEvent>,
    progress: &dyn ProgressSink,
) -> (usize, FirstFailure) {
    let mut completed = 0;
    let mut first_failure: FirstFailure = None;

    while let Ok(event) = event_rx.recv() {
        match event {
            WorkerEvent::Completed { worker } => {
                completed += 1;
                progress.unit_completed(worker);
            }
            WorkerEvent::Finished(WorkerOutcome::Success {
                worker,
                completed: jobs,
            }) => {
                tracing::debug!("worker {worker} finished {jobs} jobs");
            }
            WorkerEvent::Finished(WorkerOutcome::Failure {
                worker,
                index,
                error,
            }) => {
                if first_failure.is_none() {
                    first_failure = Some((worker, index, error));
                } else {
                    tracing::warn!("worker {worker} also failed on job {index}: {error}");
                }
            }
        }
    }

    (completed, first_failure)
}
