//! Static-partition parallel execution
//!
//! Bulk phases (page segmentation, grayscale conversion, resizing) turn a
//! directory snapshot into a list of [`Job`]s, split it into contiguous
//! batches and run one worker thread per batch.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Resource Discovery**: samples available CPU cores once per phase with `num_cpus::get()`
//! - **Partitioning**: cuts the job list into at most that many near-equal contiguous batches
//! - **Execution**: one worker per batch, jobs in order, completion events over crossbeam channels
//!
//! ## What This Module Does NOT Do:
//! - **Rebalancing**: a batch that draws slow jobs prolongs the whole phase; there is no work stealing
//! - **Cancellation**: a failing worker does not stop its siblings
//! - **Job construction**: callers decide what each job runs
//!
//! ```text
//! jobs ──▶ partition ──▶ [batch 0] ──▶ worker 0 ──┐
//!                        [batch 1] ──▶ worker 1 ──┼──▶ events ──▶ ProgressSink
//!                        [batch 2] ──▶ worker 2 ──┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use comic_san::external::{ExecutionOutput, Job};
//! use comic_san::error::PipelineError;
//! use comic_san::parallel::{CountingProgress, run_phase};
//!
//! let executor = |_: &Job| -> Result<ExecutionOutput, PipelineError> {
//!     Ok(ExecutionOutput::default())
//! };
//! let jobs = (1..=6).map(|i| Job::new("true").arg(i.to_string())).collect();
//! let progress = CountingProgress::new();
//!
//! let completed = run_phase("demo", jobs, 4, &executor, &progress).unwrap();
//! assert_eq!(completed, 6);
//! assert_eq!(progress.completed(), 6);
//! ```

pub mod partition;
pub mod pool;
pub mod progress;

pub use partition::{WorkBatch, partition};
pub use pool::{WorkerOutcome, WorkerPool};
pub use progress::{CountingProgress, NoProgress, PhaseProgress, ProgressSink};

use crate::config::ParallelConfig;
use crate::error::PipelineError;
use crate::external::{CommandExecutor, Job};

/// Number of workers for a phase, sampled from the host
///
/// Applies `thread_percentage` to the logical CPU count, then the
/// `max_workers` cap (0 means no cap). Never less than 1.
pub fn available_parallelism(config: &ParallelConfig) -> usize {
    let available_cores = num_cpus::get();

    // Calculate workers based on percentage of available cores
    let workers_by_percentage =
        std::cmp::max(1, (available_cores * config.thread_percentage as usize) / 100);

    // Apply config limit if specified (0 means use percentage calculation only)
    if config.max_workers > 0 {
        std::cmp::min(config.max_workers, workers_by_percentage)
    } else {
        workers_by_percentage
    }
}

/// Partition `jobs` and run them on a worker pool
///
/// A zero `parallelism` fails before any worker starts.
pub fn run_phase<E>(
    phase: &str,
    jobs: Vec<Job>,
    parallelism: usize,
    executor: &E,
    progress: &dyn ProgressSink,
) -> Result<usize, PipelineError>
where
    E: CommandExecutor + ?Sized,
{
    let total = jobs.len();
    let batches = partition(jobs, parallelism)?;
    tracing::info!("{phase}: {total} jobs across {} workers", batches.len());

    let start = std::time::Instant::now();
    let completed = WorkerPool::new(executor, phase).run(batches, progress)?;

    tracing::info!(
        "{phase}: completed {completed} jobs in {:.2}s",
        start.elapsed().as_secs_f64()
    );
    Ok(completed)
}
