use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives one signal per completed unit of work
///
/// Pool phases call these methods from the thread that started the phase,
/// never from worker threads.
pub trait ProgressSink {
    /// A phase is about to start with batches of the given sizes
    fn phase_started(&self, _batch_sizes: &[usize]) {}

    /// `worker` finished one job
    fn unit_completed(&self, worker: usize);

    /// Every worker has finished or failed
    fn phase_finished(&self) {}
}

/// Discards progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn unit_completed(&self, _worker: usize) {}
}

/// Counts progress events, overall and per worker
#[derive(Debug, Default)]
pub struct CountingProgress {
    completed: AtomicUsize,
    per_worker: OnceLock<Vec<AtomicUsize>>,
}

impl CountingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Events received from `worker`
    pub fn completed_by(&self, worker: usize) -> usize {
        self.per_worker
            .get()
            .and_then(|counts| counts.get(worker))
            .map_or(0, |count| count.load(Ordering::Relaxed))
    }
}

impl ProgressSink for CountingProgress {
    fn phase_started(&self, batch_sizes: &[usize]) {
        let _ = self
            .per_worker
            .set(batch_sizes.iter().map(|_| AtomicUsize::new(0)).collect());
    }

    fn unit_completed(&self, worker: usize) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        if let Some(count) = self.per_worker.get().and_then(|counts| counts.get(worker)) {
            count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

struct Bars {
    multi: MultiProgress,
    overall: ProgressBar,
    workers: Vec<ProgressBar>,
}

/// Terminal progress for one phase: a bar per worker plus an overall bar
pub struct PhaseProgress {
    label: String,
    hidden: bool,
    bars: OnceLock<Bars>,
}

impl PhaseProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hidden: false,
            bars: OnceLock::new(),
        }
    }

    /// Progress that tracks counts but never draws
    pub fn hidden(label: impl Into<String>) -> Self {
        Self {
            hidden: true,
            ..Self::new(label)
        }
    }

    fn build(&self, batch_sizes: &[usize]) -> Bars {
        let target = if self.hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        let multi = MultiProgress::with_draw_target(target);

        // Colors for different workers
        let worker_colors = ["cyan/blue", "green/yellow", "magenta/red", "yellow/blue"];

        // A single worker is already described by the overall bar
        let workers = if batch_sizes.len() > 1 {
            batch_sizes
                .iter()
                .enumerate()
                .map(|(worker_id, &size)| {
                    let color = worker_colors[worker_id % worker_colors.len()];
                    let template = format!(
                        "[Worker {}] [{{elapsed_precise}}] {{bar:30.{color}}} {{pos:>5}}/{{len:5}}",
                        worker_id + 1
                    );
                    let bar = multi.add(ProgressBar::new(size as u64));
                    bar.set_style(bar_style(&template));
                    bar
                })
                .collect()
        } else {
            Vec::new()
        };

        let total: usize = batch_sizes.iter().sum();
        let overall = multi.add(ProgressBar::new(total as u64));
        overall.set_style(bar_style(
            "{msg:<12} [{elapsed_precise}] {bar:40.bright_white/dim} {pos:>5}/{len:5} ({percent}%)",
        ));
        overall.set_message(self.label.clone());

        Bars {
            multi,
            overall,
            workers,
        }
    }
}

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
}

impl ProgressSink for PhaseProgress {
    fn phase_started(&self, batch_sizes: &[usize]) {
        let _ = self.bars.get_or_init(|| self.build(batch_sizes));
    }

    fn unit_completed(&self, worker: usize) {
        if let Some(bars) = self.bars.get() {
            if let Some(bar) = bars.workers.get(worker) {
                bar.inc(1);
            }
            bars.overall.inc(1);
        }
    }

    fn phase_finished(&self) {
        if let Some(bars) = self.bars.get() {
            for bar in &bars.workers {
                bar.finish();
            }
            bars.overall.finish();
            let _ = bars.multi.clear();
        }
    }
}
