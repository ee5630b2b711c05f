//! Per-track PID inputs, and the response which produces them

use crate::{
    band::Channel,
    numeric::Float,
    species::Species,
};

/// Speed of light in cm/ps
pub const C_CM_PER_PS: Float = 2.997_924_58e-2;

/// Signal measured by one detector channel, with its deviation from the
/// expectation for the hypothesized species
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reading {
    /// Raw signal (dE/dx for ITS and TPC, velocity fraction for TOF)
    pub signal: Float,

    /// Deviation from the expected signal, in standard deviations
    pub n_sigma: Float,
}
//
impl Reading {
    /// Build a reading
    pub fn new(signal: Float, n_sigma: Float) -> Self {
        Self { signal, n_sigma }
    }
}

/// Time-of-flight status bits of a track
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TofStatus {
    /// The track was matched to a TOF hit
    pub tof_in: bool,

    /// The TOF match was flagged as a mismatch
    pub mismatch: bool,
}
//
impl TofStatus {
    /// Status of a properly matched track
    pub fn matched() -> Self {
        Self {
            tof_in: true,
            mismatch: false,
        }
    }

    /// Truth that the track carries usable time-of-flight information
    pub fn is_valid(&self) -> bool {
        self.tof_in && !self.mismatch
    }
}

/// Everything the PID cuts need to know about a track, for one species
/// hypothesis
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackPid {
    /// Track momentum (GeV/c)
    pub p: Float,

    /// ITS dE/dx reading
    pub its: Reading,

    /// TPC dE/dx reading
    pub tpc: Reading,

    /// TOF reading, only meaningful if `tof_status` is valid
    pub tof: Reading,

    /// Time-of-flight status bits
    pub tof_status: TofStatus,
}
//
impl TrackPid {
    /// Track of a given momentum, with null readings and no TOF
    pub fn new(p: Float) -> Self {
        Self {
            p,
            ..Self::default()
        }
    }

    /// Set the ITS reading
    pub fn with_its(mut self, signal: Float, n_sigma: Float) -> Self {
        self.its = Reading::new(signal, n_sigma);
        self
    }

    /// Set the TPC reading
    pub fn with_tpc(mut self, signal: Float, n_sigma: Float) -> Self {
        self.tpc = Reading::new(signal, n_sigma);
        self
    }

    /// Set a properly matched TOF reading
    pub fn with_tof(mut self, beta: Float, n_sigma: Float) -> Self {
        self.tof = Reading::new(beta, n_sigma);
        self.tof_status = TofStatus::matched();
        self
    }

    /// Truth that the track carries usable time-of-flight information
    pub fn has_valid_tof(&self) -> bool {
        self.tof_status.is_valid()
    }

    /// Reading of one channel
    pub fn reading(&self, channel: Channel) -> &Reading {
        match channel {
            Channel::Its => &self.its,
            Channel::Tpc => &self.tpc,
            Channel::Tof => &self.tof,
        }
    }
}

/// Velocity fraction β of a track from its TOF measurement
///
/// Takes the integrated track length (cm), the raw TOF signal (ps) and the
/// event start time (ps).
///
pub fn velocity_fraction(length_cm: Float, tof_signal_ps: Float, start_time_ps: Float) -> Float {
    let flight_time_ps = tof_signal_ps - start_time_ps;
    length_cm / flight_time_ps / C_CM_PER_PS
}

/// Source of per-track PID information
///
/// This stands for the detector PID response of the surrounding analysis
/// framework: given whatever it calls a track, it provides the readings and
/// deviations for a species hypothesis.
///
pub trait PidResponse {
    /// Track type understood by this response
    type Track;

    /// Compute the PID inputs of a track for a species hypothesis
    fn track_pid(&self, track: &Self::Track, species: Species) -> TrackPid;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tof_validity_needs_a_clean_match() {
        assert!(!TofStatus::default().is_valid());
        assert!(TofStatus::matched().is_valid());
        let mismatched = TofStatus {
            tof_in: true,
            mismatch: true,
        };
        assert!(!mismatched.is_valid());
    }

    #[test]
    fn builder_sets_readings() {
        let track = TrackPid::new(0.7).with_tpc(52., 1.5).with_tof(0.98, -0.5);
        assert_eq!(track.reading(Channel::Tpc).n_sigma, 1.5);
        assert_eq!(track.reading(Channel::Tof).signal, 0.98);
        assert!(track.has_valid_tof());
        assert!(!TrackPid::new(0.7).has_valid_tof());
    }

    #[test]
    fn light_travels_at_beta_one() {
        // 3 m of flight in the time light takes for it
        let length_cm = 300.;
        let time_ps = length_cm / C_CM_PER_PS;
        let beta = velocity_fraction(length_cm, time_ps + 25., 25.);
        assert!((beta - 1.).abs() < 1e-6);
    }
}
