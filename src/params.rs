//! Named cut parameters: the ordered list of code-driven knobs of a PID cut
//! configuration, each knowing how to set, read back and print itself

use crate::{
    band::{code_for, Channel},
    cutconfig::PidCutsConfig,
    cutkind::CutKind,
    error::{PidCutsError, PidCutsResult},
    numeric::CutCode,
    species::Species,
};

use std::fmt;

/// Number of cut parameters
pub const NUM_CUT_PARAMETERS: usize = 18;

/// What a cut parameter controls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterKind {
    /// Minimum momentum
    PMin,
    /// Maximum momentum
    PMax,
    /// Band of one species on one channel
    Band(Channel, Species),
    /// TOF presence and joint TPC+TOF cut
    JointMode,
}

/// Named, code-driven cut parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CutParameter {
    /// Parameter name, as used in configuration files
    pub name: &'static str,

    /// What the parameter controls
    pub kind: ParameterKind,
}

/// Shorthand for declaring the parameter list
const fn param(name: &'static str, kind: ParameterKind) -> CutParameter {
    CutParameter { name, kind }
}

/// All cut parameters, in cuts string order
///
/// The joint mode comes last since it snapshots the TPC and TOF bands.
///
pub const CUT_PARAMETERS: [CutParameter; NUM_CUT_PARAMETERS] = {
    use self::ParameterKind::*;
    use crate::band::Channel::*;
    use crate::species::Species::*;
    [
        param("p_min", PMin),
        param("p_max", PMax),
        param("its_e", Band(Its, Electron)),
        param("its_mu", Band(Its, Muon)),
        param("its_pi", Band(Its, Pion)),
        param("its_k", Band(Its, Kaon)),
        param("its_p", Band(Its, Proton)),
        param("tpc_e", Band(Tpc, Electron)),
        param("tpc_mu", Band(Tpc, Muon)),
        param("tpc_pi", Band(Tpc, Pion)),
        param("tpc_k", Band(Tpc, Kaon)),
        param("tpc_p", Band(Tpc, Proton)),
        param("tof_e", Band(Tof, Electron)),
        param("tof_mu", Band(Tof, Muon)),
        param("tof_pi", Band(Tof, Pion)),
        param("tof_k", Band(Tof, Kaon)),
        param("tof_p", Band(Tof, Proton)),
        param("tpc_tof", JointMode),
    ]
};

impl CutParameter {
    /// Set this parameter from a code
    pub fn apply(&self, config: &mut PidCutsConfig, code: CutCode) -> PidCutsResult<()> {
        let result = match self.kind {
            ParameterKind::PMin => config.set_p_min(code),
            ParameterKind::PMax => config.set_p_max(code),
            ParameterKind::Band(channel, species) => {
                config.set_channel_band(channel, species, code)
            }
            ParameterKind::JointMode => config.set_joint_mode(code),
        };
        match &result {
            Ok(()) => log::debug!("Cut parameter {} set to code {}", self.name, code),
            Err(e) => log::error!("Cut parameter {}: {}", self.name, e),
        }
        result
    }

    /// Code which reproduces the current state of this parameter
    ///
    /// Always known for configurations built through the setters.
    ///
    pub fn current_code(&self, config: &PidCutsConfig) -> Option<CutCode> {
        match self.kind {
            ParameterKind::PMin => config.momentum().min_code(),
            ParameterKind::PMax => config.momentum().max_code(),
            ParameterKind::Band(channel, species) => match config.bands(channel).get(species) {
                None => Some(0),
                Some(band) => code_for(channel, &band),
            },
            ParameterKind::JointMode => Some(config.joint_mode_code()),
        }
    }

    /// Print the state of this parameter in human-readable form
    pub fn describe(&self, config: &PidCutsConfig, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParameterKind::PMin => writeln!(
                fmt,
                "  Cut applicable from P min: {:3.1} GeV/c",
                config.momentum().min_p()
            ),
            ParameterKind::PMax => {
                if config.momentum().has_max() {
                    writeln!(
                        fmt,
                        "  Cut applicable up to P max: {:3.1} GeV/c",
                        config.momentum().max_p()
                    )
                } else {
                    writeln!(fmt, "  Cut applicable up to P max: none")
                }
            }
            ParameterKind::Band(channel, species) => describe_band(config, channel, species, fmt),
            ParameterKind::JointMode => writeln!(
                fmt,
                "  TOF presence {}, TPC+TOF 2D cut {}",
                if config.tof_required() {
                    "REQUIRED"
                } else {
                    "NOT required"
                },
                if config.joint_2d() { "ON" } else { "OFF" }
            ),
        }
    }
}

/// Print one species' band on one channel
fn describe_band(
    config: &PidCutsConfig,
    channel: Channel,
    species: Species,
    fmt: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let target = config.target();
    let enabled = config.enabled_cuts();
    let joint = config.joint_2d() && channel != Channel::Its;
    let kind = match channel {
        Channel::Its => CutKind::ItsSigma,
        Channel::Tpc => CutKind::TpcSigma,
        Channel::Tof => CutKind::TofSigma,
    };
    let active = enabled.contains(kind) || (joint && enabled.contains(CutKind::TpcTof2D));
    if !active {
        return writeln!(fmt, "  {} PID CUT {}: none", channel, target);
    }

    // Line header
    write!(fmt, "  {}", channel)?;
    if channel == Channel::Tof {
        let required = if config.tof_required() {
            "REQUIRED"
        } else {
            "NOT required"
        };
        write!(fmt, " ({})", required)?;
    }
    let mode = if joint { " [2D] " } else { " " };
    write!(fmt, "{}PID CUT {}: ", mode, target)?;

    // Acceptance band for the target, separation band for the others
    let band = match config.bands(channel).get(species) {
        Some(band) => band,
        None => return writeln!(fmt, "none to {} line", species),
    };
    match (species == target, joint) {
        (true, false) => writeln!(fmt, "{:3.1} < nsigma < {:3.1}", band.lower, band.upper),
        (true, true) => writeln!(fmt, "2D nsigma < {:3.1}", band.upper),
        (false, false) => writeln!(
            fmt,
            "nsigma {} < {:3.1} OR {:3.1} < nsigma {}",
            species, band.lower, band.upper, species
        ),
        (false, true) => writeln!(fmt, "{:3.1} < 2D nsigma {}", band.upper, species),
    }
}

impl PidCutsConfig {
    /// Current code of every cut parameter, in cuts string order
    pub fn codes(&self) -> [CutCode; NUM_CUT_PARAMETERS] {
        let mut codes = [0; NUM_CUT_PARAMETERS];
        for (code, param) in codes.iter_mut().zip(CUT_PARAMETERS.iter()) {
            *code = param
                .current_code(self)
                .unwrap_or_else(|| panic!("Cut parameter {} has no code", param.name));
        }
        codes
    }

    /// Apply a set of codes, in cuts string order
    ///
    /// Either all codes are applied, or the configuration is left untouched.
    ///
    pub fn apply_codes(&mut self, codes: &[CutCode]) -> PidCutsResult<()> {
        assert_eq!(codes.len(), NUM_CUT_PARAMETERS, "One code per parameter");
        let mut candidate = self.clone();
        for (param, &code) in CUT_PARAMETERS.iter().zip(codes) {
            param.apply(&mut candidate, code)?;
        }
        *self = candidate;
        Ok(())
    }

    /// Compact representation of the configuration, one digit per parameter
    pub fn cuts_string(&self) -> String {
        self.codes().iter().map(|code| code.to_string()).collect()
    }

    /// Configure from a cuts string (see `cuts_string`)
    pub fn set_cuts_from_string(&mut self, cuts: &str) -> PidCutsResult<()> {
        let malformed = |reason: String| PidCutsError::MalformedCutsString {
            cuts: cuts.to_owned(),
            reason,
        };
        let codes = cuts
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|digit| digit as CutCode)
                    .ok_or_else(|| malformed(format!("{:?} is not a digit", c)))
            })
            .collect::<PidCutsResult<Vec<_>>>()?;
        if codes.len() != NUM_CUT_PARAMETERS {
            return Err(malformed(format!(
                "expected {} digits, got {}",
                NUM_CUT_PARAMETERS,
                codes.len()
            )));
        }
        self.apply_codes(&codes)
    }
}

impl fmt::Display for PidCutsConfig {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(fmt, "PID cuts for {} ({})", self.target(), self.cuts_string())?;
        for param in CUT_PARAMETERS.iter() {
            param.describe(self, fmt)?;
        }
        Ok(())
    }
}
