//! PID cuts: selecting charged tracks of one particle species
//!
//!
//! # Introduction (for the physicist)
//!
//! Charged particles crossing the detector leave signals in three particle
//! identification (PID) subsystems: the specific energy loss (dE/dx) in the
//! inner tracking system (ITS) and in the time projection chamber (TPC), and
//! the flight time measured by the time-of-flight detector (TOF). For each
//! species hypothesis, the detector response expresses how far each signal
//! lies from its expectation, in standard deviations ("n-sigma").
//!
//! A PID cut keeps the tracks whose n-sigma values fall inside configured
//! bands for a target species, optionally in a momentum window, optionally
//! requiring TOF information, and optionally replacing the TPC and TOF bands
//! by a single cut on their combined deviation.
//!
//!
//! # Introduction (for the computer guy)
//!
//! * A configuration is built from a compact string of one-digit codes, each
//!   code selecting an entry of a fixed table (see `params`).
//! * Each track is evaluated against the configuration, yielding an accept
//!   or reject decision and the set of cut kinds which fired (see
//!   `decision`).
//! * Diagnostics count the decisions and forward raw observations to an
//!   external sink (see `qa`).
//! * A selector ties all of this to the detector response and to the
//!   data-taking period (see `selector`), and can be forked and merged back
//!   for batch processing (see `scheduling`).

#![warn(missing_docs)]

pub mod band;
pub mod cutconfig;
pub mod cutkind;
pub mod decision;
pub mod error;
pub mod momentum;
pub mod numeric;
pub mod params;
pub mod qa;
pub mod scheduling;
pub mod selector;
pub mod species;
pub mod track;
pub mod truth;

pub use crate::{
    band::{Band, Channel},
    cutconfig::PidCutsConfig,
    cutkind::{CutKind, CutKindSet},
    decision::Decision,
    error::{PidCutsError, PidCutsResult},
    numeric::{CutCode, Float},
    qa::{MemorySink, NullSink, ObservationSink, QaLevel},
    selector::PidSelector,
    species::{Species, SpeciesSet},
    track::{PidResponse, TrackPid},
    truth::{TruthParticle, TruthSource},
};
