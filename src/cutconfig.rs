//! Mutable configuration of one PID cut instance
//!
//! A configuration targets one particle species. It holds a momentum window,
//! per-species bands on the ITS, TPC and TOF deviations, and the TPC+TOF
//! joint mode. Every setter takes a code from a fixed table, and leaves the
//! configuration untouched if the code is not in the table.

use crate::{
    band::{band_for, Band, Channel, ChannelBands},
    cutkind::{CutKind, CutKindSet},
    error::{PidCutsError, PidCutsResult},
    momentum::MomentumGate,
    numeric::CutCode,
    species::{Species, SpeciesSet},
};

/// Configuration of one PID cut instance
#[derive(Clone, Debug, PartialEq)]
pub struct PidCutsConfig {
    /// Species which tracks are tested for
    target: Species,

    /// Momentum window in which tracks can be accepted
    momentum: MomentumGate,

    /// Per-species ITS dE/dx bands
    its: ChannelBands,

    /// Per-species TPC dE/dx bands
    tpc: ChannelBands,

    /// Per-species TOF bands
    tof: ChannelBands,

    /// Species for which the joint TPC+TOF cut applies
    ///
    /// This is a snapshot of the TPC ∩ TOF enabled species, taken when the
    /// joint mode was last set. It does not follow later band changes.
    ///
    joint_species: SpeciesSet,

    /// Tracks must carry valid TOF information
    tof_required: bool,

    /// The joint TPC+TOF cut replaces the independent TPC and TOF bands
    joint_2d: bool,

    /// Cut kinds which are currently enabled for at least one species
    enabled: CutKindSet,
}
//
impl PidCutsConfig {
    /// Set up a configuration which accepts everything
    pub fn new(target: Species) -> Self {
        Self {
            target,
            momentum: MomentumGate::new(),
            its: ChannelBands::default(),
            tpc: ChannelBands::default(),
            tof: ChannelBands::default(),
            joint_species: SpeciesSet::empty(),
            tof_required: false,
            joint_2d: false,
            enabled: CutKindSet::empty(),
        }
    }

    // ### QUERIES ###

    /// Species which tracks are tested for
    pub fn target(&self) -> Species {
        self.target
    }

    /// Momentum window
    pub fn momentum(&self) -> &MomentumGate {
        &self.momentum
    }

    /// Per-species bands of a channel
    pub fn bands(&self, channel: Channel) -> &ChannelBands {
        match channel {
            Channel::Its => &self.its,
            Channel::Tpc => &self.tpc,
            Channel::Tof => &self.tof,
        }
    }

    /// Band of the target species on a channel, if enabled
    pub fn target_band(&self, channel: Channel) -> Option<Band> {
        self.bands(channel).get(self.target)
    }

    /// Species for which the joint TPC+TOF cut applies
    pub fn joint_species(&self) -> SpeciesSet {
        self.joint_species
    }

    /// Truth that tracks must carry valid TOF information
    pub fn tof_required(&self) -> bool {
        self.tof_required
    }

    /// Truth that the joint TPC+TOF mode was requested
    pub fn joint_2d(&self) -> bool {
        self.joint_2d
    }

    /// Cut kinds which are enabled for at least one species
    pub fn enabled_cuts(&self) -> CutKindSet {
        self.enabled
    }

    /// Truth that any cut kind is enabled
    pub fn any_cut_enabled(&self) -> bool {
        !self.enabled.is_empty()
    }

    /// Code of the current joint mode (see `set_joint_mode`)
    pub fn joint_mode_code(&self) -> CutCode {
        CutCode::from(self.tof_required) + 2 * CutCode::from(self.joint_2d)
    }

    // ### SETTERS ###

    /// Configure the minimum momentum (see `MomentumGate::set_min`)
    pub fn set_p_min(&mut self, code: CutCode) -> PidCutsResult<()> {
        self.momentum.set_min(code)
    }

    /// Configure the maximum momentum (see `MomentumGate::set_max`)
    pub fn set_p_max(&mut self, code: CutCode) -> PidCutsResult<()> {
        self.momentum.set_max(code)
    }

    /// Configure the band of a species on a channel
    ///
    /// For the target species the band is an acceptance band. For other
    /// species it is meant as a separation band. Code 0 disables the
    /// species on the channel, other codes select a band from the channel's
    /// table (see `band::band_for`).
    ///
    pub fn set_channel_band(
        &mut self,
        channel: Channel,
        species: Species,
        code: CutCode,
    ) -> PidCutsResult<()> {
        if channel == Channel::Tpc {
            log::info!(
                "Configuring TPC dEdx cut for {}, with {} code",
                species,
                code
            );
        }
        let band = band_for(channel, code)?;
        let bands = match channel {
            Channel::Its => &mut self.its,
            Channel::Tpc => &mut self.tpc,
            Channel::Tof => &mut self.tof,
        };
        bands.set(species, (code != 0).then_some(band));
        self.refresh_enabled();
        Ok(())
    }

    /// Configure TOF presence and the joint TPC+TOF cut
    ///
    /// | code | track TOF presence | joint TPC+TOF cut |
    /// |:--:|:--:|:--:|
    /// | 0 | not required | off |
    /// | 1 | required | off |
    /// | 2 | not required | on |
    /// | 3 | required | on |
    ///
    /// When the joint cut is switched on, it applies to the species which
    /// have both a TPC and a TOF band *at the time of this call*. Configure
    /// the TPC and TOF bands first.
    ///
    pub fn set_joint_mode(&mut self, code: CutCode) -> PidCutsResult<()> {
        let (tof_required, joint_2d) = match code {
            0 => (false, false),
            1 => (true, false),
            2 => (false, true),
            3 => (true, true),
            _ => {
                return Err(PidCutsError::UnsupportedCode {
                    parameter: "TOF configuration cut",
                    code,
                })
            }
        };
        self.tof_required = tof_required;
        self.joint_2d = joint_2d;
        self.joint_species = if joint_2d {
            self.tpc.enabled().intersection(self.tof.enabled())
        } else {
            SpeciesSet::empty()
        };
        self.refresh_enabled();
        Ok(())
    }

    /// Re-derive the enabled cut kinds from the per-species state
    fn refresh_enabled(&mut self) {
        self.enabled.set(CutKind::ItsSigma, !self.its.is_empty());
        self.enabled.set(CutKind::TpcSigma, !self.tpc.is_empty());
        self.enabled.set(CutKind::TofSigma, !self.tof.is_empty());
        self.enabled
            .set(CutKind::TpcTof2D, !self.joint_species.is_empty());
    }
}
