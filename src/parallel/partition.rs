use crate::error::PipelineError;

/// A contiguous, non-empty slice of a phase's jobs owned by one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkBatch<T> {
    index: usize,
    jobs: Vec<T>,
}

impl<T> WorkBatch<T> {
    /// Position of this batch in the partition, also the worker id
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn jobs(&self) -> &[T] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn into_jobs(self) -> Vec<T> {
        self.jobs
    }
}

/// Split `jobs` into at most `parallelism` contiguous batches
///
/// Every batch holds `ceil(len / parallelism)` jobs except possibly the
/// last, which holds the remainder. Fewer jobs than workers yields fewer
/// batches; no batch is ever empty. Concatenating the batches in order gives
/// back the original list.
pub fn partition<T>(jobs: Vec<T>, parallelism: usize) -> Result<Vec<WorkBatch<T>>, PipelineError> {
    if parallelism == 0 {
        return Err(PipelineError::config("parallelism must be at least 1"));
    }
    if jobs.is_empty() {
        return Ok(Vec::new());
    }

    let chunk_size = jobs.len().div_ceil(parallelism);
    let mut batches = Vec::with_capacity(parallelism.min(jobs.len()));
    let mut remaining = jobs.into_iter().peekable();

    while remaining.peek().is_some() {
        let chunk: Vec<T> = remaining.by_ref().take(chunk_size).collect();
        batches.push(WorkBatch {
            index: batches.len(),
            jobs: chunk,
        });
    }

    Ok(batches)
}
