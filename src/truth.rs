//! Access to simulation truth, for validating PID cuts against it

use crate::{numeric::Float, species::Species};

/// A simulated particle, as far as PID validation is concerned
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TruthParticle {
    /// PDG particle code
    pub pdg_code: i32,

    /// True momentum (GeV/c)
    pub p: Float,
}
//
impl TruthParticle {
    /// Species of this particle
    pub fn species(&self) -> Species {
        Species::from_pdg(self.pdg_code)
    }
}

/// Source of simulated particles, indexed by track label
///
/// Either the live event of a running simulation or an array of particles
/// stored alongside reconstructed data.
///
pub trait TruthSource {
    /// Particle associated with a (non-negative) label, if any
    fn particle(&self, label: usize) -> Option<TruthParticle>;
}

/// Stored truth array
impl TruthSource for [TruthParticle] {
    fn particle(&self, label: usize) -> Option<TruthParticle> {
        self.get(label).copied()
    }
}

impl TruthSource for Vec<TruthParticle> {
    fn particle(&self, label: usize) -> Option<TruthParticle> {
        self.as_slice().particle(label)
    }
}

/// Live simulation event
///
/// Only the particles which were kept by the transport code are present, so
/// labels may have holes.
///
#[derive(Clone, Debug, Default)]
pub struct McEvent {
    particles: Vec<Option<TruthParticle>>,
}
//
impl McEvent {
    /// Empty event
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a particle under a label
    pub fn insert(&mut self, label: usize, particle: TruthParticle) {
        if label >= self.particles.len() {
            self.particles.resize(label + 1, None);
        }
        self.particles[label] = Some(particle);
    }
}

impl TruthSource for McEvent {
    fn particle(&self, label: usize) -> Option<TruthParticle> {
        self.particles.get(label).copied().flatten()
    }
}

/// Convert a signed track label into a truth index
///
/// Negative labels flag fake tracks, whose truth association is the
/// absolute value of the label.
///
pub fn truth_index(label: i64) -> usize {
    label.unsigned_abs() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_array_lookup() {
        let stored = vec![
            TruthParticle { pdg_code: -211, p: 0.4 },
            TruthParticle { pdg_code: 2212, p: 1.2 },
        ];
        assert_eq!(stored.particle(1).map(|p| p.species()), Some(Species::Proton));
        assert_eq!(stored.particle(2), None);
    }

    #[test]
    fn live_event_lookup_with_holes() {
        let mut event = McEvent::new();
        event.insert(3, TruthParticle { pdg_code: 321, p: 0.8 });
        assert_eq!(event.particle(0), None);
        assert_eq!(event.particle(3).map(|p| p.species()), Some(Species::Kaon));
        assert_eq!(event.particle(7), None);
    }

    #[test]
    fn labels_fold_to_their_absolute_value() {
        assert_eq!(truth_index(-12), 12);
        assert_eq!(truth_index(5), 5);
    }
}
