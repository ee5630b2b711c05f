//! This module takes care of scheduling the track selection work,
//! encapsulating use of multiple threads

#[cfg(feature = "multi-threading")]
mod multi_threading;
#[cfg(not(feature = "multi-threading"))]
mod sequential;

use crate::{qa::ObservationSink, selector::PidSelector, track::PidResponse};

/// Size of the track batches
///
/// Tracks are grouped in batches, each handled by a fork of the selector
/// whose diagnostics are merged back in batch order. This achieves identical
/// diagnostics between sequential and parallel runs.
///
pub const TRACK_BATCH_SIZE: usize = 10_000;

/// Run the selection in the manner that was configured at build time
///
/// Returns the decision for each track, in input order. The diagnostics of
/// all tracks end up in `selector`.
///
pub fn run_selection<R, S>(selector: &mut PidSelector<R, S>, tracks: &[R::Track]) -> Vec<bool>
where
    R: PidResponse + Clone + Send,
    R::Track: Sync,
    S: ObservationSink + Send,
{
    if tracks.is_empty() {
        return Vec::new();
    }

    // ...in sequential mode
    #[cfg(not(feature = "multi-threading"))]
    {
        sequential::run_selection_impl(selector, tracks)
    }

    // ...in multi-threaded mode
    #[cfg(feature = "multi-threading")]
    {
        multi_threading::run_selection_impl(selector, tracks)
    }
}

/// Select a batch of tracks with a fork of the selector
fn select_batch<R, S>(mut selector: PidSelector<R, S>, batch: &[R::Track]) -> BatchResult<R, S>
where
    R: PidResponse,
    S: ObservationSink,
{
    let decisions = batch
        .iter()
        .map(|track| selector.is_track_accepted(track))
        .collect();
    BatchResult {
        selector,
        decisions,
    }
}

/// Outcome of selecting one batch of tracks
struct BatchResult<R: PidResponse, S: ObservationSink> {
    /// Fork of the selector holding the diagnostics of the batch
    selector: PidSelector<R, S>,

    /// Decision for each track of the batch
    decisions: Vec<bool>,
}
