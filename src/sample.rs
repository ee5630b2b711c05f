//! Track samples with precomputed PID inputs, and the PID response which
//! serves them

use crate::{config::ConfigItem, Result};

use eyre::{ensure, WrapErr};
use pidcuts::{
    track::{velocity_fraction, Reading, TofStatus},
    Float, PidResponse, Species, TrackPid,
};

use std::fs;

/// Number of values on a track sample line which carries β
const NUM_TRACK_FIELDS: usize = 9;

/// Number of values on a track sample line which carries the raw TOF timing
const NUM_TIMED_TRACK_FIELDS: usize = 11;

/// Load a track sample
///
/// Each non-blank line describes one track with the whitespace-separated
/// values `p its_signal its_nsigma tpc_signal tpc_nsigma tof_in mismatch
/// tof_nsigma beta`. Instead of β, a line may end with `length_cm
/// tof_signal_ps start_time_ps`, from which β is derived. Everything after a
/// `#` is a comment.
///
pub fn load_tracks(file_name: &str) -> Result<Vec<TrackPid>> {
    let sample = fs::read_to_string(file_name)
        .wrap_err_with(|| format!("Could not read track sample {}", file_name))?;
    parse_tracks(&sample).wrap_err_with(|| format!("Invalid track sample {}", file_name))
}

/// Decode the tracks of a track sample
fn parse_tracks(sample: &str) -> Result<Vec<TrackPid>> {
    let mut tracks = Vec::new();
    for (line_idx, line) in sample.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default();
        if content.trim().is_empty() {
            continue;
        }
        let track = parse_track(content).wrap_err_with(|| format!("On line {}", line_idx + 1))?;
        tracks.push(track);
    }
    Ok(tracks)
}

/// Decode one track
fn parse_track(content: &str) -> Result<TrackPid> {
    let fields = content.split_whitespace().collect::<Vec<_>>();
    ensure!(
        fields.len() == NUM_TRACK_FIELDS || fields.len() == NUM_TIMED_TRACK_FIELDS,
        "Expected {} or {} values per track, found {}",
        NUM_TRACK_FIELDS,
        NUM_TIMED_TRACK_FIELDS,
        fields.len()
    );
    let float = |idx: usize, name: &'static str| ConfigItem::new(name, fields[idx]).parse::<Float>();
    let flag = |idx: usize, name: &'static str| ConfigItem::new(name, fields[idx]).parse_bool();
    let beta = if fields.len() == NUM_TIMED_TRACK_FIELDS {
        let length_cm = float(8, "length_cm")?;
        let tof_signal_ps = float(9, "tof_signal_ps")?;
        let start_time_ps = float(10, "start_time_ps")?;
        ensure!(
            tof_signal_ps > start_time_ps,
            "TOF signal {} ps does not follow the start time {} ps",
            tof_signal_ps,
            start_time_ps
        );
        velocity_fraction(length_cm, tof_signal_ps, start_time_ps)
    } else {
        float(8, "beta")?
    };
    Ok(TrackPid {
        p: float(0, "p")?,
        its: Reading::new(float(1, "its_signal")?, float(2, "its_nsigma")?),
        tpc: Reading::new(float(3, "tpc_signal")?, float(4, "tpc_nsigma")?),
        tof_status: TofStatus {
            tof_in: flag(5, "tof_in")?,
            mismatch: flag(6, "mismatch")?,
        },
        tof: Reading::new(beta, float(7, "tof_nsigma")?),
    })
}

/// PID response of a track sample, whose inputs were computed beforehand
/// for the target species
#[derive(Clone, Copy, Debug, Default)]
pub struct SampleResponse;

impl PidResponse for SampleResponse {
    type Track = TrackPid;

    fn track_pid(&self, track: &TrackPid, _species: Species) -> TrackPid {
        *track
    }
}
