//! Code tables which map cut codes to n-sigma acceptance bands, and the
//! per-species band storage of one detector channel

use crate::{
    error::{PidCutsError, PidCutsResult},
    numeric::{CutCode, Float},
    species::{Species, SpeciesSet, NUM_PID_SPECIES},
};

use std::fmt;

/// Single-detector PID channels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Inner tracking system dE/dx
    Its,
    /// Time projection chamber dE/dx
    Tpc,
    /// Time of flight
    Tof,
}
//
impl Channel {
    /// All channels, in evaluation order
    pub const ALL: [Channel; 3] = [Channel::Its, Channel::Tpc, Channel::Tof];

    /// Detector name, as used in printouts
    pub fn name(self) -> &'static str {
        match self {
            Channel::Its => "ITS",
            Channel::Tpc => "TPC",
            Channel::Tof => "TOF",
        }
    }

    /// Bands selected by codes 1.. of this channel (code 0 is always the
    /// disabled sentinel)
    fn table(self) -> &'static [Band] {
        match self {
            Channel::Its => &ITS_BANDS,
            Channel::Tpc => &TPC_BANDS,
            Channel::Tof => &TOF_BANDS,
        }
    }

    /// Name of this channel's band parameter, for error reporting
    fn parameter_name(self) -> &'static str {
        match self {
            Channel::Its => "ITS dEdx n sigmas cut",
            Channel::Tpc => "TPC dEdx n sigmas cut",
            Channel::Tof => "TOF n sigmas cut",
        }
    }

    /// Highest code supported by this channel
    pub fn max_code(self) -> CutCode {
        self.table().len() as CutCode
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.name())
    }
}

/// Inclusive interval of n-sigma deviations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Lowest accepted deviation
    pub lower: Float,

    /// Highest accepted deviation
    pub upper: Float,
}
//
impl Band {
    /// Wide-open band standing for a disabled cut
    pub const OPEN: Band = Band::new(-100., 100.);

    /// Build a band from its bounds
    pub const fn new(lower: Float, upper: Float) -> Self {
        Self { lower, upper }
    }

    /// Truth that a deviation lies within the band, bounds included
    pub fn contains(&self, n_sigma: Float) -> bool {
        self.lower <= n_sigma && n_sigma <= self.upper
    }
}

/// ITS dE/dx bands for codes 1..=8
const ITS_BANDS: [Band; 8] = [
    Band::new(-10., 10.),
    Band::new(-6., 7.),
    Band::new(-5., 5.),
    Band::new(-4., 5.),
    Band::new(-3., 5.),
    Band::new(-4., 4.),
    Band::new(-2.5, 4.),
    Band::new(-2., 3.5),
];

/// TPC dE/dx bands for codes 1..=9
const TPC_BANDS: [Band; 9] = [
    Band::new(-10., 10.),
    Band::new(-6., 7.),
    Band::new(-5., 5.),
    Band::new(-4., 5.),
    Band::new(-4., 4.),
    Band::new(-3., 4.),
    Band::new(-3., 3.),
    Band::new(-3., 5.),
    Band::new(-2., 3.),
];

/// TOF bands for codes 1..=5
const TOF_BANDS: [Band; 5] = [
    Band::new(-7., 7.),
    Band::new(-5., 5.),
    Band::new(-3., 5.),
    Band::new(-2., 3.),
    Band::new(-3., 3.),
];

/// Look up the band selected by a code on a channel
///
/// Code 0 yields the disabled sentinel band.
///
pub fn band_for(channel: Channel, code: CutCode) -> PidCutsResult<Band> {
    let unsupported = || PidCutsError::UnsupportedCode {
        parameter: channel.parameter_name(),
        code,
    };
    match code {
        0 => Ok(Band::OPEN),
        _ if code < 0 => Err(unsupported()),
        _ => channel
            .table()
            .get(code as usize - 1)
            .copied()
            .ok_or_else(unsupported),
    }
}

/// Find back the code which selects a band on a channel, if any
pub fn code_for(channel: Channel, band: &Band) -> Option<CutCode> {
    if *band == Band::OPEN {
        return Some(0);
    }
    channel
        .table()
        .iter()
        .position(|candidate| candidate == band)
        .map(|pos| pos as CutCode + 1)
}

/// Per-species bands of one detector channel
///
/// A species is enabled on the channel if and only if it has a band.
///
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelBands([Option<Band>; NUM_PID_SPECIES]);
//
impl ChannelBands {
    /// Band configured for a species, if enabled
    pub fn get(&self, species: Species) -> Option<Band> {
        self.0[species.index()]
    }

    /// Band configured for a species, or the disabled sentinel
    pub fn get_or_open(&self, species: Species) -> Band {
        self.get(species).unwrap_or(Band::OPEN)
    }

    /// Enable a species with a band, or disable it with `None`
    pub fn set(&mut self, species: Species, band: Option<Band>) {
        self.0[species.index()] = band;
    }

    /// Species which have a band on this channel
    pub fn enabled(&self) -> SpeciesSet {
        Species::ALL
            .into_iter()
            .filter(|&species| self.get(species).is_some())
            .collect()
    }

    /// Truth that no species is enabled on this channel
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}
