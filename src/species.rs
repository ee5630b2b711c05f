//! Particle species which PID cuts can target or separate from

use crate::error::{PidCutsError, PidCutsResult};

use std::{fmt, str::FromStr};

/// Number of species which can carry a PID band
pub const NUM_PID_SPECIES: usize = 5;

/// Particle species hypothesis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Species {
    /// e±
    Electron,
    /// μ±
    Muon,
    /// π±
    Pion,
    /// K±
    Kaon,
    /// p and p̄
    Proton,
    /// Anything else
    Unknown,
}
//
impl Species {
    /// All the species which can carry a PID band, in table order
    pub const ALL: [Species; NUM_PID_SPECIES] = [
        Species::Electron,
        Species::Muon,
        Species::Pion,
        Species::Kaon,
        Species::Proton,
    ];

    /// Index of this species in per-species tables
    ///
    /// Asking for the index of `Unknown` means that a per-species table is
    /// being accessed with a species it was never meant to hold, which is a
    /// configuration table mismatch.
    ///
    pub fn index(self) -> usize {
        match self {
            Species::Electron => 0,
            Species::Muon => 1,
            Species::Pion => 2,
            Species::Kaon => 3,
            Species::Proton => 4,
            Species::Unknown => panic!("Species {} has no PID table entry", self),
        }
    }

    /// Long name, as used in printouts
    pub fn name(self) -> &'static str {
        match self {
            Species::Electron => "electron",
            Species::Muon => "muon",
            Species::Pion => "pion",
            Species::Kaon => "kaon",
            Species::Proton => "proton",
            Species::Unknown => "unknown",
        }
    }

    /// Short name, as used in diagnostics bucket names
    pub fn short_name(self) -> &'static str {
        match self {
            Species::Electron => "e",
            Species::Muon => "mu",
            Species::Pion => "pi",
            Species::Kaon => "K",
            Species::Proton => "p",
            Species::Unknown => "unknown",
        }
    }

    /// Map a simulation (PDG) particle code to a species, ignoring charge
    pub fn from_pdg(pdg_code: i32) -> Self {
        match pdg_code.abs() {
            11 => Species::Electron,
            13 => Species::Muon,
            211 => Species::Pion,
            321 => Species::Kaon,
            2212 => Species::Proton,
            _ => Species::Unknown,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.name())
    }
}

impl FromStr for Species {
    type Err = PidCutsError;

    fn from_str(s: &str) -> PidCutsResult<Self> {
        let lowercase = s.to_lowercase();
        Species::ALL
            .iter()
            .copied()
            .find(|species| {
                lowercase == species.name() || lowercase == species.short_name().to_lowercase()
            })
            .ok_or_else(|| PidCutsError::UnknownSpecies(s.to_owned()))
    }
}

/// Set of PID species, stored as a bit mask
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SpeciesSet(u8);
//
impl SpeciesSet {
    /// Set with no species in it
    pub fn empty() -> Self {
        Self(0)
    }

    /// Add a species to the set
    pub fn insert(&mut self, species: Species) {
        self.0 |= 1 << species.index();
    }

    /// Truth that a species belongs to the set
    ///
    /// `Unknown` never belongs to a species set.
    ///
    pub fn contains(self, species: Species) -> bool {
        species != Species::Unknown && (self.0 & (1 << species.index())) != 0
    }

    /// Truth that the set holds no species
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Species which belong to both sets
    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Iterate over the species of the set, in table order
    pub fn iter(self) -> impl Iterator<Item = Species> {
        Species::ALL
            .into_iter()
            .filter(move |&species| self.contains(species))
    }
}

impl FromIterator<Species> for SpeciesSet {
    fn from_iter<I: IntoIterator<Item = Species>>(iter: I) -> Self {
        let mut set = SpeciesSet::empty();
        for species in iter {
            set.insert(species);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdg_codes_map_regardless_of_charge() {
        assert_eq!(Species::from_pdg(11), Species::Electron);
        assert_eq!(Species::from_pdg(-11), Species::Electron);
        assert_eq!(Species::from_pdg(-13), Species::Muon);
        assert_eq!(Species::from_pdg(211), Species::Pion);
        assert_eq!(Species::from_pdg(-321), Species::Kaon);
        assert_eq!(Species::from_pdg(-2212), Species::Proton);
        assert_eq!(Species::from_pdg(22), Species::Unknown);
        assert_eq!(Species::from_pdg(2112), Species::Unknown);
    }

    #[test]
    fn species_parse_from_long_and_short_names() {
        assert_eq!("pion".parse::<Species>(), Ok(Species::Pion));
        assert_eq!("Kaon".parse::<Species>(), Ok(Species::Kaon));
        assert_eq!("K".parse::<Species>(), Ok(Species::Kaon));
        assert_eq!("mu".parse::<Species>(), Ok(Species::Muon));
        assert_eq!(
            "photon".parse::<Species>(),
            Err(PidCutsError::UnknownSpecies("photon".to_owned()))
        );
    }

    #[test]
    fn species_set_intersection() {
        let tpc: SpeciesSet = [Species::Pion, Species::Kaon, Species::Proton]
            .into_iter()
            .collect();
        let tof: SpeciesSet = [Species::Electron, Species::Kaon].into_iter().collect();
        let both = tpc.intersection(tof);
        assert_eq!(both.iter().collect::<Vec<_>>(), vec![Species::Kaon]);
        assert!(!both.contains(Species::Unknown));
        assert!(SpeciesSet::empty().is_empty());
    }

    #[test]
    #[should_panic]
    fn unknown_species_has_no_table_index() {
        Species::Unknown.index();
    }
}
