//! Momentum window in which a PID cut applies

use crate::{
    error::{PidCutsError, PidCutsResult},
    numeric::{reals, CutCode, Float},
};

/// Highest minimum momentum code
pub const MAX_P_MIN_CODE: CutCode = 9;

/// Maximum momenta (GeV/c) selected by codes 1..=8
const P_MAX_TABLE: [Float; 8] = [0.3, 0.4, 0.5, 0.6, 0.7, 2.0, 3.0, 4.0];

/// Momentum used when no maximum is configured
pub const NO_P_MAX: Float = reals::INFINITY;

/// Inclusive [min, max] momentum acceptance window
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentumGate {
    /// Minimum momentum (GeV/c)
    min_p: Float,

    /// Maximum momentum (GeV/c)
    max_p: Float,
}
//
impl MomentumGate {
    /// Window accepting any momentum
    pub fn new() -> Self {
        Self {
            min_p: 0.,
            max_p: NO_P_MAX,
        }
    }

    /// Minimum momentum (GeV/c)
    pub fn min_p(&self) -> Float {
        self.min_p
    }

    /// Maximum momentum (GeV/c), infinite if unbounded
    pub fn max_p(&self) -> Float {
        self.max_p
    }

    /// Truth that the window has an upper bound
    pub fn has_max(&self) -> bool {
        self.max_p.is_finite()
    }

    /// Configure the minimum momentum
    ///
    /// | code | minimum p (GeV/c) |
    /// |:--:|:--:|
    /// | 0 | 0.0 |
    /// | n = 1..=9 | (n+1)/10 |
    ///
    pub fn set_min(&mut self, code: CutCode) -> PidCutsResult<()> {
        self.min_p = min_p_for(code)?;
        Ok(())
    }

    /// Configure the maximum momentum
    ///
    /// | code | maximum p (GeV/c) |
    /// |:--:|:--:|
    /// | 0 | no maximum |
    /// | 1..=5 | 0.3, 0.4, 0.5, 0.6, 0.7 |
    /// | 6..=8 | 2.0, 3.0, 4.0 |
    ///
    pub fn set_max(&mut self, code: CutCode) -> PidCutsResult<()> {
        self.max_p = max_p_for(code)?;
        Ok(())
    }

    /// Code which selects the current minimum, if any
    pub fn min_code(&self) -> Option<CutCode> {
        (0..=MAX_P_MIN_CODE).find(|&code| min_p_for(code) == Ok(self.min_p))
    }

    /// Code which selects the current maximum, if any
    pub fn max_code(&self) -> Option<CutCode> {
        (0..=P_MAX_TABLE.len() as CutCode).find(|&code| max_p_for(code) == Ok(self.max_p))
    }

    /// Decide whether a momentum falls within the window, bounds included
    pub fn keep(&self, p: Float) -> bool {
        self.min_p <= p && p <= self.max_p
    }
}

impl Default for MomentumGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum momentum selected by a code
fn min_p_for(code: CutCode) -> PidCutsResult<Float> {
    match code {
        0 => Ok(0.),
        1..=MAX_P_MIN_CODE => Ok((code + 1) as Float / 10.),
        _ => Err(PidCutsError::UnsupportedCode {
            parameter: "P minimum",
            code,
        }),
    }
}

/// Maximum momentum selected by a code
fn max_p_for(code: CutCode) -> PidCutsResult<Float> {
    match code {
        0 => Ok(NO_P_MAX),
        _ if code > 0 && code as usize <= P_MAX_TABLE.len() => Ok(P_MAX_TABLE[code as usize - 1]),
        _ => Err(PidCutsError::UnsupportedCode {
            parameter: "P maximum",
            code,
        }),
    }
}
