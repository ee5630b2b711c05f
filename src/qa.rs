//! Quality assurance of the PID cuts: cut statistics, cut correlations, and
//! raw observations before and after the cuts
//!
//! Counters live here. Raw observations are forwarded to an external sink,
//! which decides how to store them (histograms, ntuples...).

use crate::{
    cutkind::{CutKind, CUT_NAMES, NUM_CUT_KINDS},
    decision::Decision,
    error::{PidCutsError, PidCutsResult},
    numeric::Float,
    track::TrackPid,
};

use nalgebra::{SMatrix, SVector};
use num_traits::Zero;

use std::{fmt, str::FromStr};

/// Amount of quality assurance output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum QaLevel {
    /// No QA at all
    None,
    /// Cut statistics, cut correlations, and observations after the cuts
    #[default]
    Light,
    /// Everything, including observations before the cuts
    Heavy,
}

impl FromStr for QaLevel {
    type Err = PidCutsError;

    fn from_str(s: &str) -> PidCutsResult<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(QaLevel::None),
            "light" => Ok(QaLevel::Light),
            "heavy" => Ok(QaLevel::Heavy),
            _ => Err(PidCutsError::UnknownQaLevel(s.to_owned())),
        }
    }
}

// ### RAW OBSERVATIONS ###

/// When an observation was made
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Before the cuts were applied
    Before,
    /// After the track passed the cuts
    After,
}

/// Pair of quantities which is observed for every track
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Observable {
    /// (p, ITS n-sigma)
    ItsSigmaVsP,
    /// (p, ITS dE/dx)
    ItsSignalVsP,
    /// (p, TPC n-sigma)
    TpcSigmaVsP,
    /// (p, TPC dE/dx)
    TpcSignalVsP,
    /// (p, TOF n-sigma)
    TofSigmaVsP,
    /// (p, β)
    TofBetaVsP,
    /// (TPC n-sigma, TOF n-sigma)
    TpcTofSigma,
}
//
impl Observable {
    /// Base name of the observable
    pub fn name(self) -> &'static str {
        match self {
            Observable::ItsSigmaVsP => "ITSdEdxSigma",
            Observable::ItsSignalVsP => "ITSdEdxSignal",
            Observable::TpcSigmaVsP => "TPCdEdxSigma",
            Observable::TpcSignalVsP => "TPCdEdxSignal",
            Observable::TofSigmaVsP => "TOFSigma",
            Observable::TofBetaVsP => "TOFSignal",
            Observable::TpcTofSigma => "TPCTOFSigma",
        }
    }
}

/// One observed pair of values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// When the observation was made
    pub stage: Stage,

    /// What was observed
    pub observable: Observable,

    /// First value (momentum for most observables)
    pub x: Float,

    /// Second value
    pub y: Float,
}
//
impl Sample {
    /// Name of the sample series, e.g. "TPCdEdxSigmaB"
    pub fn series(&self) -> String {
        let suffix = match self.stage {
            Stage::Before => "B",
            Stage::After => "A",
        };
        format!("{}{}", self.observable.name(), suffix)
    }
}

/// Destination of raw observations
pub trait ObservationSink {
    /// Start a new accounting bucket, dropping or archiving the previous one
    fn begin_period(&mut self, bucket: &str);

    /// Record one observation
    fn observe(&mut self, sample: Sample);

    /// Empty sink for the current bucket, to collect the observations of a
    /// batch of tracks which will be merged back later
    fn fresh(&self) -> Self
    where
        Self: Sized;

    /// Append the observations of another sink of the same bucket
    fn merge(&mut self, other: Self)
    where
        Self: Sized;
}

/// Sink which keeps every observation in memory
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    bucket: String,
    samples: Vec<Sample>,
}
//
impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the current bucket
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Observations of the current bucket
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Observations of one series of the current bucket
    pub fn series(&self, stage: Stage, observable: Observable) -> impl Iterator<Item = &Sample> {
        self.samples
            .iter()
            .filter(move |s| s.stage == stage && s.observable == observable)
    }
}

impl ObservationSink for MemorySink {
    fn begin_period(&mut self, bucket: &str) {
        self.bucket = bucket.to_owned();
        self.samples.clear();
    }

    fn observe(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    fn fresh(&self) -> Self {
        Self {
            bucket: self.bucket.clone(),
            samples: Vec::new(),
        }
    }

    fn merge(&mut self, other: Self) {
        self.samples.extend(other.samples);
    }
}

/// Sink which discards every observation
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ObservationSink for NullSink {
    fn begin_period(&mut self, _bucket: &str) {}
    fn observe(&mut self, _sample: Sample) {}
    fn fresh(&self) -> Self {
        NullSink
    }
    fn merge(&mut self, _other: Self) {}
}

// ### CUT STATISTICS ###

/// Number of labeled statistics bins: seen tracks, rejected tracks, and one
/// bin per cut kind
pub const NUM_STAT_BINS: usize = NUM_CUT_KINDS + 2;

/// Label of the seen tracks bin
const SEEN_LABEL: &str = "n tracks";

/// Label of the rejected tracks bin
const REJECTED_LABEL: &str = "n cut tracks";

/// Per-bin counters
type StatVector = SVector<u64, NUM_STAT_BINS>;

/// Symmetric cut kind co-firing counters
type CorrelationMatrix = SMatrix<u64, NUM_CUT_KINDS, NUM_CUT_KINDS>;

/// Track counters of one PID cut instance
#[derive(Clone, Debug, PartialEq)]
pub struct CutsStatistics {
    /// Bin labels
    labels: [&'static str; NUM_STAT_BINS],

    /// Bin contents
    counts: StatVector,

    /// How often two cut kinds fired on the same track, upper triangle
    /// (including the diagonal) filled
    correlations: CorrelationMatrix,
}
//
impl CutsStatistics {
    /// Zeroed statistics, labeled after the cut kinds
    pub fn new() -> Self {
        Self::with_kind_labels(CUT_NAMES)
    }

    /// Zeroed statistics with custom cut kind labels
    pub(crate) fn with_kind_labels(kind_labels: [&'static str; NUM_CUT_KINDS]) -> Self {
        let mut labels = [""; NUM_STAT_BINS];
        labels[0] = SEEN_LABEL;
        labels[1] = REJECTED_LABEL;
        labels[2..].copy_from_slice(&kind_labels);
        Self {
            labels,
            counts: StatVector::zero(),
            correlations: CorrelationMatrix::zero(),
        }
    }

    /// Bin of a label
    fn bin(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|&l| l == label)
    }

    /// Bin of a cut kind, which must exist
    fn kind_bin(&self, kind: CutKind) -> PidCutsResult<usize> {
        self.bin(kind.name())
            .ok_or(PidCutsError::InconsistentTable {
                index: kind.index(),
                name: kind.name(),
            })
    }

    /// Account for one evaluated track
    pub fn record(&mut self, decision: &Decision) -> PidCutsResult<()> {
        self.counts[0] += 1;
        if !decision.accepted {
            self.counts[1] += 1;
        }
        for kind in CutKind::ALL {
            let bin = self.kind_bin(kind)?;
            if decision.firing.contains(kind) {
                self.counts[bin] += 1;
            }
        }
        for first in decision.firing.iter() {
            for second in decision.firing.iter().filter(|k| k.index() >= first.index()) {
                self.correlations[(first.index(), second.index())] += 1;
            }
        }
        Ok(())
    }

    /// Number of tracks seen
    pub fn seen(&self) -> u64 {
        self.counts[0]
    }

    /// Number of tracks rejected
    pub fn rejected(&self) -> u64 {
        self.counts[1]
    }

    /// Number of tracks on which a cut kind fired
    pub fn fired(&self, kind: CutKind) -> u64 {
        self.bin(kind.name()).map_or(0, |bin| self.counts[bin])
    }

    /// Number of tracks on which two cut kinds both fired (symmetric)
    pub fn co_fired(&self, a: CutKind, b: CutKind) -> u64 {
        let (i, j) = if a.index() <= b.index() {
            (a.index(), b.index())
        } else {
            (b.index(), a.index())
        };
        self.correlations[(i, j)]
    }

    /// Integrate the statistics of another batch of tracks
    pub fn merge(&mut self, other: &Self) {
        self.counts += other.counts;
        self.correlations += other.correlations;
    }
}

impl Default for CutsStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CutsStatistics {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, count) in self.labels.iter().zip(self.counts.iter()) {
            writeln!(fmt, "  {:<20}: {}", label, count)?;
        }
        writeln!(fmt, "  Cuts correlation:")?;
        for first in CutKind::ALL {
            write!(fmt, "  {:<20}:", first.name())?;
            for second in CutKind::ALL {
                if second.index() < first.index() {
                    write!(fmt, " {:>8}", "")?;
                } else {
                    write!(fmt, " {:>8}", self.co_fired(first, second))?;
                }
            }
            writeln!(fmt)?;
        }
        Ok(())
    }
}

// ### RECORDER ###

/// Diagnostics of one PID cut instance over one data-taking period
#[derive(Clone, Debug)]
pub struct Recorder<S: ObservationSink> {
    /// Amount of QA output
    level: QaLevel,

    /// Name of the current accounting bucket
    bucket: String,

    /// Track counters
    statistics: CutsStatistics,

    /// Destination of raw observations
    sink: S,
}
//
impl<S: ObservationSink> Recorder<S> {
    /// Set up a recorder
    pub fn new(level: QaLevel, sink: S) -> Self {
        Self {
            level,
            bucket: String::new(),
            statistics: CutsStatistics::new(),
            sink,
        }
    }

    /// Amount of QA output
    pub fn level(&self) -> QaLevel {
        self.level
    }

    /// Name of the current accounting bucket
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Track counters of the current period
    pub fn statistics(&self) -> &CutsStatistics {
        &self.statistics
    }

    /// Destination of raw observations
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Start accounting from scratch in a new bucket
    pub fn begin_period(&mut self, bucket: &str) {
        self.bucket = bucket.to_owned();
        self.statistics = CutsStatistics::new();
        if self.level > QaLevel::None {
            self.sink.begin_period(bucket);
        }
    }

    /// Account for one evaluated track
    ///
    /// Observations before the cuts are only made at the heavy QA level.
    /// Observations after the cuts are only made for accepted tracks.
    ///
    pub fn record(&mut self, track: &TrackPid, decision: &Decision) -> PidCutsResult<()> {
        if self.level == QaLevel::None {
            return Ok(());
        }
        self.statistics.record(decision)?;
        if self.level > QaLevel::Light {
            self.observe(Stage::Before, track);
        }
        if decision.accepted {
            self.observe(Stage::After, track);
        }
        Ok(())
    }

    /// Forward the observations of one track to the sink
    fn observe(&mut self, stage: Stage, track: &TrackPid) {
        let p = track.p;
        let mut emit = |observable, x, y| {
            self.sink.observe(Sample {
                stage,
                observable,
                x,
                y,
            })
        };
        emit(Observable::ItsSigmaVsP, p, track.its.n_sigma);
        emit(Observable::ItsSignalVsP, p, track.its.signal);
        emit(Observable::TpcSigmaVsP, p, track.tpc.n_sigma);
        emit(Observable::TpcSignalVsP, p, track.tpc.signal.abs());
        if track.has_valid_tof() {
            emit(Observable::TofSigmaVsP, p, track.tof.n_sigma);
            emit(Observable::TofBetaVsP, p, track.tof.signal);
            emit(Observable::TpcTofSigma, track.tpc.n_sigma, track.tof.n_sigma);
        }
    }

    /// Empty recorder for the same bucket, to account for a batch of tracks
    pub fn fork(&self) -> Self {
        Self {
            level: self.level,
            bucket: self.bucket.clone(),
            statistics: CutsStatistics::new(),
            sink: self.sink.fresh(),
        }
    }

    /// Integrate the accounting of a forked recorder
    pub fn merge(&mut self, other: Self) {
        debug_assert_eq!(self.bucket, other.bucket);
        self.statistics.merge(&other.statistics);
        self.sink.merge(other.sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutkind::CutKindSet;

    fn decision(accepted: bool, firing: &[CutKind]) -> Decision {
        Decision {
            accepted,
            firing: firing.iter().copied().collect::<CutKindSet>(),
        }
    }

    #[test]
    fn statistics_count_tracks_and_firings() {
        let mut stats = CutsStatistics::new();
        stats
            .record(&decision(true, &[CutKind::ItsSigma, CutKind::TpcSigma]))
            .unwrap();
        stats.record(&decision(false, &[CutKind::TpcSigma])).unwrap();
        stats.record(&decision(false, &[])).unwrap();

        assert_eq!(stats.seen(), 3);
        assert_eq!(stats.rejected(), 2);
        assert_eq!(stats.fired(CutKind::TpcSigma), 2);
        assert_eq!(stats.fired(CutKind::ItsSigma), 1);
        assert_eq!(stats.fired(CutKind::TofSigma), 0);
    }

    #[test]
    fn correlations_are_symmetric_with_diagonal() {
        let mut stats = CutsStatistics::new();
        let firing = [CutKind::ItsSigma, CutKind::TpcSigma, CutKind::TofSigma];
        stats.record(&decision(true, &firing)).unwrap();
        stats
            .record(&decision(true, &[CutKind::TofSigma, CutKind::ItsSigma]))
            .unwrap();

        assert_eq!(stats.co_fired(CutKind::ItsSigma, CutKind::ItsSigma), 2);
        assert_eq!(stats.co_fired(CutKind::TofSigma, CutKind::ItsSigma), 2);
        assert_eq!(stats.co_fired(CutKind::ItsSigma, CutKind::TofSigma), 2);
        assert_eq!(stats.co_fired(CutKind::TpcSigma, CutKind::TofSigma), 1);
        assert_eq!(stats.co_fired(CutKind::TpcTof2D, CutKind::TpcTof2D), 0);
        // 3 kinds fired together: 3 diagonal + 3 off-diagonal pairs
        assert_eq!(stats.correlations.sum(), 6 + 3);
    }

    #[test]
    fn mismatched_naming_table_is_detected() {
        let mut stats = CutsStatistics::with_kind_labels([
            "ITS dE/dx n#sigma",
            "TPC dE/dx n#sigma",
            "TOF n#sigma",
            "TPC+TOF",
        ]);
        assert_eq!(
            stats.record(&decision(true, &[])),
            Err(PidCutsError::InconsistentTable {
                index: 3,
                name: "TPC+TOF 2D"
            })
        );
    }

    #[test]
    fn merged_statistics_add_up() {
        let mut a = CutsStatistics::new();
        let mut b = CutsStatistics::new();
        a.record(&decision(true, &[CutKind::TpcSigma])).unwrap();
        b.record(&decision(false, &[CutKind::TpcSigma])).unwrap();
        a.merge(&b);
        assert_eq!(a.seen(), 2);
        assert_eq!(a.rejected(), 1);
        assert_eq!(a.co_fired(CutKind::TpcSigma, CutKind::TpcSigma), 2);
    }

    #[test]
    fn observations_before_and_after() {
        let track = TrackPid::new(0.6).with_its(95., 0.5).with_tpc(-55., 1.);
        let mut recorder = Recorder::new(QaLevel::Heavy, MemorySink::new());
        recorder.begin_period("bucket");

        recorder.record(&track, &decision(true, &[])).unwrap();
        assert_eq!(recorder.sink().series(Stage::Before, Observable::TpcSignalVsP).count(), 1);
        assert_eq!(recorder.sink().series(Stage::After, Observable::TpcSignalVsP).count(), 1);
        // No TOF, no TOF observations
        assert_eq!(recorder.sink().samples().len(), 8);
        let signal = recorder
            .sink()
            .series(Stage::After, Observable::TpcSignalVsP)
            .next()
            .unwrap();
        assert_eq!((signal.x, signal.y), (0.6, 55.));
        assert_eq!(signal.series(), "TPCdEdxSignalA");

        // Rejected tracks are only observed before the cuts
        recorder.record(&track, &decision(false, &[])).unwrap();
        assert_eq!(recorder.sink().series(Stage::Before, Observable::ItsSigmaVsP).count(), 2);
        assert_eq!(recorder.sink().series(Stage::After, Observable::ItsSigmaVsP).count(), 1);
    }

    #[test]
    fn tof_observations_need_valid_tof() {
        let track = TrackPid::new(1.1).with_tpc(50., 0.5).with_tof(0.99, -1.);
        let mut recorder = Recorder::new(QaLevel::Light, MemorySink::new());
        recorder.record(&track, &decision(true, &[])).unwrap();
        let pair = recorder
            .sink()
            .series(Stage::After, Observable::TpcTofSigma)
            .next()
            .unwrap();
        assert_eq!((pair.x, pair.y), (0.5, -1.));
        // Light QA makes no observation before the cuts
        assert_eq!(recorder.sink().series(Stage::Before, Observable::TofSigmaVsP).count(), 0);
    }

    #[test]
    fn no_qa_records_nothing() {
        let mut recorder = Recorder::new(QaLevel::None, MemorySink::new());
        recorder
            .record(&TrackPid::new(1.), &decision(false, &[CutKind::ItsSigma]))
            .unwrap();
        assert_eq!(recorder.statistics().seen(), 0);
        assert!(recorder.sink().samples().is_empty());
    }

    #[test]
    fn new_period_resets_the_accounting() {
        let mut recorder = Recorder::new(QaLevel::Heavy, MemorySink::new());
        recorder.begin_period("first");
        recorder.record(&TrackPid::new(1.), &decision(true, &[])).unwrap();
        recorder.begin_period("second");
        assert_eq!(recorder.statistics().seen(), 0);
        assert!(recorder.sink().samples().is_empty());
        assert_eq!(recorder.sink().bucket(), "second");
    }

    #[test]
    fn qa_levels_parse() {
        assert_eq!("Heavy".parse::<QaLevel>(), Ok(QaLevel::Heavy));
        assert!("verbose".parse::<QaLevel>().is_err());
        assert!(QaLevel::None < QaLevel::Light);
        assert_eq!(QaLevel::default(), QaLevel::Light);
    }
}
