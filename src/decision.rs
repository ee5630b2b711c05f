//! Mechanism to apply a PID cut configuration to a track

use crate::{
    band::{Band, Channel},
    cutconfig::PidCutsConfig,
    cutkind::{CutKind, CutKindSet},
    numeric::{functions::norm2, Float},
    track::TrackPid,
};

/// Outcome of evaluating a track against a PID cut configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decision {
    /// The track is recognized as the target species
    pub accepted: bool,

    /// Cut kinds whose band the track satisfied for the target species
    pub firing: CutKindSet,
}
//
impl Decision {
    /// Rejection before any cut kind got a chance to fire
    fn rejected_early() -> Self {
        Self {
            accepted: false,
            firing: CutKindSet::empty(),
        }
    }
}

/// Scalar deviation used by the joint TPC+TOF cut
pub fn joint_n_sigma(tpc_n_sigma: Float, tof_n_sigma: Float) -> Float {
    norm2(tpc_n_sigma, tof_n_sigma)
}

impl PidCutsConfig {
    /// Decide whether a track passes the cuts, and which cut kinds fired
    ///
    /// Only the target species' own bands take part in the decision. Bands
    /// configured for other species are separation bands, which are only
    /// reported by the configuration printout.
    ///
    pub fn evaluate(&self, track: &TrackPid) -> Decision {
        // The momentum window is a pre-filter, no cut kind fires before it
        if !self.momentum().keep(track.p) {
            return Decision::rejected_early();
        }

        let target = self.target();
        let enabled = self.enabled_cuts();
        let tof_valid = track.has_valid_tof();
        let mut decision = Decision {
            accepted: true,
            firing: CutKindSet::empty(),
        };

        // Apply a band of the target species to one reading
        let mut check = |kind: CutKind, band: Band, n_sigma: Float| {
            if band.contains(n_sigma) {
                decision.firing.insert(kind);
            } else {
                decision.accepted = false;
            }
        };

        // Target band and deviation of one channel, if that channel is cut on
        let independent = |channel: Channel| {
            self.target_band(channel)
                .map(|band| (band, track.reading(channel).n_sigma))
        };

        // ITS band
        if enabled.contains(CutKind::ItsSigma) {
            if let Some((band, n_sigma)) = independent(Channel::Its) {
                check(CutKind::ItsSigma, band, n_sigma);
            }
        }

        // TPC and TOF, either jointly or as independent bands
        let joint = enabled.contains(CutKind::TpcTof2D) && self.joint_species().contains(target);
        if joint {
            let tpc_band = self.bands(Channel::Tpc).get_or_open(target);
            if tof_valid {
                let joint_band = Band::new(Float::NEG_INFINITY, tpc_band.upper);
                let n_sigma = joint_n_sigma(track.tpc.n_sigma, track.tof.n_sigma);
                check(CutKind::TpcTof2D, joint_band, n_sigma);
            } else {
                // Without TOF, only the TPC part of the joint cut is left
                check(CutKind::TpcSigma, tpc_band, track.tpc.n_sigma);
            }
        } else {
            if enabled.contains(CutKind::TpcSigma) {
                if let Some((band, n_sigma)) = independent(Channel::Tpc) {
                    check(CutKind::TpcSigma, band, n_sigma);
                }
            }
            if enabled.contains(CutKind::TofSigma) && tof_valid {
                if let Some((band, n_sigma)) = independent(Channel::Tof) {
                    check(CutKind::TofSigma, band, n_sigma);
                }
            }
        }

        // Tracks without TOF are out if TOF is both required and used
        let tof_used = joint
            || (enabled.contains(CutKind::TofSigma) && self.target_band(Channel::Tof).is_some());
        if self.tof_required() && tof_used && !tof_valid {
            decision.accepted = false;
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;

    fn pion_tpc(code: i32) -> PidCutsConfig {
        let mut config = PidCutsConfig::new(Species::Pion);
        config.set_channel_band(Channel::Tpc, Species::Pion, code).unwrap();
        config
    }

    #[test]
    fn empty_configuration_accepts_everything_in_range() {
        let config = PidCutsConfig::new(Species::Electron);
        let decision = config.evaluate(&TrackPid::new(1.).with_tpc(80., 42.));
        assert!(decision.accepted);
        assert!(decision.firing.is_empty());
    }

    #[test]
    fn track_inside_target_band_fires() {
        let decision = pion_tpc(3).evaluate(&TrackPid::new(0.5).with_tpc(50., 2.));
        assert!(decision.accepted);
        assert_eq!(decision.firing.iter().collect::<Vec<_>>(), vec![CutKind::TpcSigma]);
    }

    #[test]
    fn track_outside_target_band_is_rejected_without_firing() {
        let decision = pion_tpc(3).evaluate(&TrackPid::new(0.5).with_tpc(50., 6.));
        assert!(!decision.accepted);
        assert!(decision.firing.is_empty());
    }

    #[test]
    fn momentum_window_short_circuits() {
        let mut config = pion_tpc(3);
        config.set_p_min(2).unwrap();
        let decision = config.evaluate(&TrackPid::new(0.05).with_tpc(50., 0.));
        assert_eq!(decision, Decision::rejected_early());
    }

    #[test]
    fn disabled_channels_never_reject() {
        let config = pion_tpc(3);
        for n_sigma in [Float::NEG_INFINITY, -1e9, 1e9, Float::INFINITY] {
            let track = TrackPid::new(0.5)
                .with_its(100., n_sigma)
                .with_tpc(50., 0.)
                .with_tof(0.9, n_sigma);
            assert!(config.evaluate(&track).accepted);
        }
    }

    #[test]
    fn separation_bands_do_not_take_part() {
        let mut config = pion_tpc(3);
        config.set_channel_band(Channel::Tpc, Species::Kaon, 1).unwrap();
        config.set_channel_band(Channel::Its, Species::Kaon, 1).unwrap();
        // The ITS cut kind is enabled, but not for the target
        let decision = config.evaluate(&TrackPid::new(0.5).with_its(90., 50.).with_tpc(50., 1.));
        assert!(decision.accepted);
        assert!(!decision.firing.contains(CutKind::ItsSigma));
    }

    #[test]
    fn all_applicable_bands_must_pass() {
        let mut config = pion_tpc(3);
        config.set_channel_band(Channel::Its, Species::Pion, 3).unwrap();
        config.set_channel_band(Channel::Tof, Species::Pion, 4).unwrap();
        let good = TrackPid::new(0.8)
            .with_its(90., -1.)
            .with_tpc(50., 1.)
            .with_tof(0.98, 2.5);
        let decision = config.evaluate(&good);
        assert!(decision.accepted);
        assert_eq!(decision.firing.len(), 3);

        // Failing TOF still lets ITS and TPC fire
        let bad_tof = good.with_tof(0.98, 3.5);
        let decision = config.evaluate(&bad_tof);
        assert!(!decision.accepted);
        assert!(decision.firing.contains(CutKind::ItsSigma));
        assert!(decision.firing.contains(CutKind::TpcSigma));
        assert!(!decision.firing.contains(CutKind::TofSigma));
    }

    #[test]
    fn tof_band_skips_tracks_without_tof_unless_required() {
        let mut config = pion_tpc(3);
        config.set_channel_band(Channel::Tof, Species::Pion, 4).unwrap();
        let no_tof = TrackPid::new(0.8).with_tpc(50., 1.);
        assert!(config.evaluate(&no_tof).accepted);

        config.set_joint_mode(1).unwrap();
        let decision = config.evaluate(&no_tof);
        assert!(!decision.accepted);
        assert!(decision.firing.contains(CutKind::TpcSigma));
    }

    #[test]
    fn tof_requirement_is_moot_without_tof_cuts() {
        let mut config = pion_tpc(3);
        config.set_joint_mode(1).unwrap();
        assert!(config.evaluate(&TrackPid::new(0.8).with_tpc(50., 1.)).accepted);
    }

    #[test]
    fn joint_cut_replaces_independent_bands() {
        let mut config = pion_tpc(5); // [-4, 4]
        config.set_channel_band(Channel::Tof, Species::Pion, 4).unwrap(); // [-2, 3]
        config.set_joint_mode(2).unwrap();

        // TOF at -3.5 fails its own band, but the joint deviation is 3.81
        let track = TrackPid::new(1.).with_tpc(50., 1.5).with_tof(0.95, -3.5);
        let decision = config.evaluate(&track);
        assert!(decision.accepted);
        assert_eq!(decision.firing.iter().collect::<Vec<_>>(), vec![CutKind::TpcTof2D]);

        // Joint deviation 5 is beyond the TPC upper bound
        let track = TrackPid::new(1.).with_tpc(50., 3.).with_tof(0.95, 4.);
        let decision = config.evaluate(&track);
        assert!(!decision.accepted);
        assert!(decision.firing.is_empty());
    }

    #[test]
    fn joint_cut_without_tof_falls_back_to_tpc() {
        let mut config = pion_tpc(5);
        config.set_channel_band(Channel::Tof, Species::Pion, 4).unwrap();
        config.set_joint_mode(2).unwrap();
        let decision = config.evaluate(&TrackPid::new(1.).with_tpc(50., -3.9));
        assert!(decision.accepted);
        assert!(decision.firing.contains(CutKind::TpcSigma));

        config.set_joint_mode(3).unwrap();
        assert!(!config.evaluate(&TrackPid::new(1.).with_tpc(50., -3.9)).accepted);
    }

    #[test]
    fn joint_cut_survives_clearing_the_tpc_band() {
        let mut config = pion_tpc(5);
        config.set_channel_band(Channel::Tof, Species::Pion, 4).unwrap();
        config.set_joint_mode(2).unwrap();
        config.set_channel_band(Channel::Tpc, Species::Pion, 0).unwrap();
        assert!(config.enabled_cuts().contains(CutKind::TpcTof2D));
        assert_eq!(config.target_band(Channel::Tpc), None);

        // The joint deviation is now only bounded by the open band, up to 100
        let track = TrackPid::new(1.).with_tpc(50., 30.).with_tof(0.95, 40.);
        let decision = config.evaluate(&track);
        assert!(decision.accepted);
        assert_eq!(decision.firing.iter().collect::<Vec<_>>(), vec![CutKind::TpcTof2D]);

        let track = TrackPid::new(1.).with_tpc(50., 80.).with_tof(0.95, 70.);
        let decision = config.evaluate(&track);
        assert!(!decision.accepted);
        assert!(decision.firing.is_empty());

        // Tracks without TOF face the open TPC band alone
        assert!(config.evaluate(&TrackPid::new(1.).with_tpc(50., 99.)).accepted);
        assert!(!config.evaluate(&TrackPid::new(1.).with_tpc(50., 101.)).accepted);
    }

    #[test]
    fn joint_norm() {
        assert_eq!(joint_n_sigma(3., 4.), 5.);
        assert_eq!(joint_n_sigma(0., -2.), 2.);
    }
}
