//! One PID cut instance, as seen by the analysis which uses it
//!
//! A selector bundles a cut configuration with the collaborators it needs at
//! run time: the detector PID response, the diagnostics recorder, and the
//! current data-taking period.

use crate::{
    cutconfig::PidCutsConfig,
    error::{PidCutsError, PidCutsResult},
    qa::{ObservationSink, QaLevel, Recorder},
    species::Species,
    track::PidResponse,
    truth::{truth_index, TruthSource},
};

/// PID cut instance selecting tracks of one species
#[derive(Clone, Debug)]
pub struct PidSelector<R: PidResponse, S: ObservationSink> {
    /// Instance name, prefix of the accounting buckets
    name: String,

    /// Instance number, distinguishes instances sharing a name
    cut_number: u32,

    /// Cut configuration
    config: PidCutsConfig,

    /// Detector PID response, injected by `init`
    response: Option<R>,

    /// Data-taking period currently being processed
    period: Option<String>,

    /// Diagnostics of the current period
    recorder: Recorder<S>,
}
//
impl<R: PidResponse, S: ObservationSink> PidSelector<R, S> {
    /// Set up a selector which accepts everything, with default diagnostics
    pub fn new(name: &str, target: Species, cut_number: u32) -> Self
    where
        S: Default,
    {
        Self::with_diagnostics(name, target, cut_number, QaLevel::default(), S::default())
    }

    /// Set up a selector with explicit diagnostics
    pub fn with_diagnostics(
        name: &str,
        target: Species,
        cut_number: u32,
        qa_level: QaLevel,
        sink: S,
    ) -> Self {
        Self {
            name: name.to_owned(),
            cut_number,
            config: PidCutsConfig::new(target),
            response: None,
            period: None,
            recorder: Recorder::new(qa_level, sink),
        }
    }

    // ### CONFIGURATION ###

    /// Instance name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cut configuration
    pub fn configuration(&self) -> &PidCutsConfig {
        &self.config
    }

    /// Cut configuration, for setting it up
    pub fn configuration_mut(&mut self) -> &mut PidCutsConfig {
        &mut self.config
    }

    /// Diagnostics of the current period
    pub fn recorder(&self) -> &Recorder<S> {
        &self.recorder
    }

    /// Data-taking period currently being processed
    pub fn period(&self) -> Option<&str> {
        self.period.as_deref()
    }

    /// Name of the accounting bucket of the current configuration
    pub fn bucket_name(&self) -> String {
        format!(
            "{}_{}{}_{}",
            self.name,
            self.config.target().short_name(),
            self.cut_number,
            self.config.cuts_string()
        )
    }

    // ### LIFECYCLE ###

    /// Provide the selector with its PID response
    ///
    /// A response is mandatory as soon as a cut is enabled, except for
    /// on-the-fly simulation where only truth-level acceptance is used.
    ///
    pub fn init(&mut self, response: Option<R>, on_the_fly_mc: bool) -> PidCutsResult<()> {
        if response.is_none() && self.config.any_cut_enabled() && !on_the_fly_mc {
            return Err(PidCutsError::MissingCollaborator("PID response"));
        }
        self.response = response;
        log::info!(
            "{}: selecting {} with cuts {}",
            self.name,
            self.config.target(),
            self.config.cuts_string()
        );
        self.recorder.begin_period(&self.bucket_name());
        Ok(())
    }

    /// Tell the selector about the period of the upcoming data
    ///
    /// On a period change, the diagnostics are started afresh under a new
    /// bucket. The cut configuration is not affected.
    ///
    pub fn notify_period(&mut self, period: &str) {
        if self.period.as_deref() != Some(period) {
            log::info!("{}: switching to period {}", self.name, period);
            self.period = Some(period.to_owned());
            self.recorder.begin_period(&self.bucket_name());
        }
    }

    /// Tell the selector about a new event
    pub fn notify_event(&mut self) {}

    // ### SELECTION ###

    /// Decide whether a track is of the target species
    ///
    /// Panics if the diagnostics naming table is inconsistent, or if no
    /// response was provided to `init`, as analysis results would be
    /// meaningless.
    ///
    pub fn is_track_accepted(&mut self, track: &R::Track) -> bool {
        let response = self
            .response
            .as_ref()
            .expect("PID cuts need a PID response to select tracks");
        let pid = response.track_pid(track, self.config.target());
        let decision = self.config.evaluate(&pid);
        if let Err(e) = self.recorder.record(&pid, &decision) {
            panic!("{}", e);
        }
        decision.accepted
    }

    /// Decide whether a simulated particle is of the target species and in
    /// the momentum window
    ///
    /// Negative labels flag fake tracks, which are always rejected.
    ///
    pub fn is_true_track_accepted<T: TruthSource + ?Sized>(&self, truth: &T, label: i64) -> bool {
        if label < 0 {
            return false;
        }
        let particle = match truth.particle(truth_index(label)) {
            Some(particle) => particle,
            None => return false,
        };
        if !self.config.momentum().keep(particle.p) {
            return false;
        }
        !self.config.any_cut_enabled() || particle.species() == self.config.target()
    }

    /// True species associated with a track label
    pub fn true_species<T: TruthSource + ?Sized>(&self, truth: &T, label: i64) -> Species {
        truth
            .particle(truth_index(label))
            .map_or(Species::Unknown, |particle| particle.species())
    }

    // ### BATCH PROCESSING ###

    /// Copy of this selector with empty diagnostics, for a batch of tracks
    pub fn fork(&self) -> Self
    where
        R: Clone,
    {
        Self {
            name: self.name.clone(),
            cut_number: self.cut_number,
            config: self.config.clone(),
            response: self.response.clone(),
            period: self.period.clone(),
            recorder: self.recorder.fork(),
        }
    }

    /// Integrate the diagnostics of a forked selector
    pub fn absorb(&mut self, other: Self) {
        debug_assert_eq!(self.config, other.config);
        self.recorder.merge(other.recorder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        band::Channel,
        qa::{MemorySink, Observable, Stage},
        track::TrackPid,
        truth::{McEvent, TruthParticle},
    };

    /// Response which hands out precomputed inputs
    #[derive(Clone)]
    struct Precomputed;

    impl PidResponse for Precomputed {
        type Track = TrackPid;

        fn track_pid(&self, track: &TrackPid, _species: Species) -> TrackPid {
            *track
        }
    }

    type Selector = PidSelector<Precomputed, MemorySink>;

    fn pion_selector() -> Selector {
        let mut selector = Selector::new("PIDCuts", Species::Pion, 2);
        selector
            .configuration_mut()
            .set_channel_band(Channel::Tpc, Species::Pion, 3)
            .unwrap();
        selector
    }

    #[test]
    fn init_needs_a_response_when_cuts_are_enabled() {
        let mut selector = pion_selector();
        assert_eq!(
            selector.init(None, false),
            Err(PidCutsError::MissingCollaborator("PID response"))
        );
        assert_eq!(selector.init(None, true), Ok(()));
        assert_eq!(selector.init(Some(Precomputed), false), Ok(()));

        let mut open = Selector::new("PIDCuts", Species::Pion, 0);
        assert_eq!(open.init(None, false), Ok(()));
    }

    #[test]
    fn bucket_names_identify_the_instance() {
        let mut selector = pion_selector();
        selector.init(Some(Precomputed), false).unwrap();
        assert_eq!(selector.bucket_name(), "PIDCuts_pi2_000000000300000000");
        assert_eq!(selector.recorder().bucket(), selector.bucket_name());
    }

    #[test]
    fn accepted_tracks_are_recorded() {
        let mut selector = pion_selector();
        selector.init(Some(Precomputed), false).unwrap();
        assert!(selector.is_track_accepted(&TrackPid::new(0.5).with_tpc(50., 2.)));
        assert!(!selector.is_track_accepted(&TrackPid::new(0.5).with_tpc(50., 6.)));

        let stats = selector.recorder().statistics();
        assert_eq!(stats.seen(), 2);
        assert_eq!(stats.rejected(), 1);
        let sink = selector.recorder().sink();
        assert_eq!(sink.series(Stage::After, Observable::TpcSigmaVsP).count(), 1);
        assert_eq!(sink.series(Stage::Before, Observable::TpcSigmaVsP).count(), 0);
    }

    #[test]
    fn period_change_restarts_diagnostics_only() {
        let mut selector = pion_selector();
        selector.init(Some(Precomputed), false).unwrap();
        selector.notify_period("LHC15o");
        selector.is_track_accepted(&TrackPid::new(0.5));
        selector.notify_period("LHC15o");
        assert_eq!(selector.recorder().statistics().seen(), 1);

        let config = selector.configuration().clone();
        selector.notify_period("LHC18q");
        assert_eq!(selector.period(), Some("LHC18q"));
        assert_eq!(selector.recorder().statistics().seen(), 0);
        assert_eq!(selector.configuration(), &config);
    }

    #[test]
    fn forks_merge_back() {
        let mut selector = pion_selector();
        selector.init(Some(Precomputed), false).unwrap();
        let mut fork = selector.fork();
        fork.is_track_accepted(&TrackPid::new(0.5).with_tpc(50., 2.));
        selector.is_track_accepted(&TrackPid::new(0.5).with_tpc(50., 9.));
        selector.absorb(fork);
        assert_eq!(selector.recorder().statistics().seen(), 2);
        assert_eq!(selector.recorder().sink().samples().len(), 4);
    }

    #[test]
    fn truth_level_acceptance() {
        let mut selector = pion_selector();
        selector.configuration_mut().set_p_min(2).unwrap();
        let stored = vec![
            TruthParticle { pdg_code: 211, p: 0.5 },
            TruthParticle { pdg_code: -211, p: 0.1 },
            TruthParticle { pdg_code: 2212, p: 0.5 },
        ];
        assert!(selector.is_true_track_accepted(stored.as_slice(), 0));
        assert!(!selector.is_true_track_accepted(stored.as_slice(), 1));
        assert!(!selector.is_true_track_accepted(stored.as_slice(), 2));
        assert!(!selector.is_true_track_accepted(stored.as_slice(), 7));

        // Fake tracks are rejected, but keep their true species
        let mut event = McEvent::new();
        event.insert(4, TruthParticle { pdg_code: 211, p: 0.9 });
        assert!(selector.is_true_track_accepted(&event, 4));
        assert!(!selector.is_true_track_accepted(&event, -4));
        assert_eq!(selector.true_species(&event, -4), Species::Pion);
        assert_eq!(selector.true_species(&event, 3), Species::Unknown);
    }

    #[test]
    fn truth_species_is_ignored_without_cuts() {
        let selector = Selector::new("PIDCuts", Species::Kaon, 0);
        let stored = [TruthParticle { pdg_code: 11, p: 3. }];
        assert!(selector.is_true_track_accepted(&stored[..], 0));
    }
}
