//! Sequential back-end of the track selection

use crate::{
    qa::ObservationSink,
    scheduling::{select_batch, TRACK_BATCH_SIZE},
    selector::PidSelector,
    track::PidResponse,
};

/// Select tracks in sequential mode
///
/// We use batched logic even in sequential mode, in order to achieve
/// reproducibility with respect to multi-threaded runs.
///
pub fn run_selection_impl<R, S>(selector: &mut PidSelector<R, S>, tracks: &[R::Track]) -> Vec<bool>
where
    R: PidResponse + Clone,
    S: ObservationSink,
{
    let mut decisions = Vec::with_capacity(tracks.len());
    for batch in tracks.chunks(TRACK_BATCH_SIZE) {
        let result = select_batch(selector.fork(), batch);
        decisions.extend(result.decisions);
        selector.absorb(result.selector);
    }
    decisions
}
