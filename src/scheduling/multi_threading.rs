//! Multi-threaded back-end of the track selection

use crate::{
    qa::ObservationSink,
    scheduling::{select_batch, BatchResult, TRACK_BATCH_SIZE},
    selector::PidSelector,
    track::PidResponse,
};

use std::sync::Mutex;

/// Select tracks in multi-threaded mode
///
/// Each batch of tracks is handled by a task owning a fork of the selector.
/// The forks are merged back in batch order, so diagnostics do not depend on
/// task scheduling.
///
pub fn run_selection_impl<R, S>(selector: &mut PidSelector<R, S>, tracks: &[R::Track]) -> Vec<bool>
where
    R: PidResponse + Clone + Send,
    R::Track: Sync,
    S: ObservationSink + Send,
{
    // Each batch of tracks gets its own fork of the selector
    let tasks = tracks
        .chunks(TRACK_BATCH_SIZE)
        .map(|batch| (selector.fork(), batch))
        .collect::<Vec<_>>();
    let accumulator = ReproducibleAccumulator::new(tasks.len());

    // This function is a synchronization scope: it will only return
    // once all inner tasks have been executed
    rayon::scope(|scope| {
        for (batch_id, (task_selector, batch)) in tasks.into_iter().enumerate() {
            let accumulator_ref = &accumulator;
            scope.spawn(move |_| {
                let result = select_batch(task_selector, batch);
                accumulator_ref.set_task_result(batch_id, result);
            });
        }
    });

    // Merge the batch results in order
    let mut decisions = Vec::with_capacity(tracks.len());
    for result in accumulator.into_results() {
        decisions.extend(result.decisions);
        selector.absorb(result.selector);
    }
    decisions
}

/// Reproducibility-optimized results accumulation mechanism
struct ReproducibleAccumulator<R: PidResponse, S: ObservationSink> {
    /// Storage for the intermediary results of parallel tasks
    results: Box<[Mutex<Option<BatchResult<R, S>>>]>,
}
//
impl<R: PidResponse, S: ObservationSink> ReproducibleAccumulator<R, S> {
    /// Set up results storage for N parallel tasks
    fn new(num_tasks: usize) -> Self {
        assert!(num_tasks > 0, "There should be at least one task");
        Self {
            results: (0..num_tasks)
                .map(|_| Mutex::new(None))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }

    /// Integrate the results of the n-th selection task
    fn set_task_result(&self, task_id: usize, result: BatchResult<R, S>) {
        let mut lock = self.results[task_id]
            .lock()
            .expect("Mutex data should be valid");
        assert!(lock.is_none(), "Tasks should not report results twice");
        *lock = Some(result);
    }

    /// Hand out the task results in task order
    fn into_results(self) -> impl Iterator<Item = BatchResult<R, S>> {
        self.results.into_vec().into_iter().map(|entry| {
            entry
                .into_inner()
                .expect("Mutex data should be valid")
                .expect("Result should be ready")
        })
    }
}
