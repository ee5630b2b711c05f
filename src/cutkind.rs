//! The named families of PID cuts, and sets thereof

use std::fmt;

/// Number of cut kinds
pub const NUM_CUT_KINDS: usize = 4;

/// Names of the cut kinds, indexed by `CutKind as usize`
pub const CUT_NAMES: [&str; NUM_CUT_KINDS] = [
    "ITS dE/dx n#sigma",
    "TPC dE/dx n#sigma",
    "TOF n#sigma",
    "TPC+TOF 2D",
];

/// Family of PID cuts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CutKind {
    /// Band on the ITS dE/dx deviation
    ItsSigma = 0,
    /// Band on the TPC dE/dx deviation
    TpcSigma = 1,
    /// Band on the TOF deviation
    TofSigma = 2,
    /// Joint cut on the TPC and TOF deviations
    TpcTof2D = 3,
}
//
impl CutKind {
    /// All cut kinds, in table order
    pub const ALL: [CutKind; NUM_CUT_KINDS] = [
        CutKind::ItsSigma,
        CutKind::TpcSigma,
        CutKind::TofSigma,
        CutKind::TpcTof2D,
    ];

    /// Position of this kind in per-kind tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name of this kind, as used in diagnostics
    pub fn name(self) -> &'static str {
        CUT_NAMES[self.index()]
    }
}

impl fmt::Display for CutKind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.name())
    }
}

/// Set of cut kinds, stored as a bit mask
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CutKindSet(u8);
//
impl CutKindSet {
    /// Set with no cut kind in it
    pub fn empty() -> Self {
        Self(0)
    }

    /// Add or remove a cut kind depending on a condition
    pub fn set(&mut self, kind: CutKind, present: bool) {
        if present {
            self.insert(kind);
        } else {
            self.remove(kind);
        }
    }

    /// Add a cut kind
    pub fn insert(&mut self, kind: CutKind) {
        self.0 |= 1 << kind.index();
    }

    /// Remove a cut kind
    pub fn remove(&mut self, kind: CutKind) {
        self.0 &= !(1 << kind.index());
    }

    /// Truth that a cut kind belongs to the set
    pub fn contains(self, kind: CutKind) -> bool {
        (self.0 & (1 << kind.index())) != 0
    }

    /// Truth that the set holds no cut kind
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of cut kinds in the set
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the cut kinds of the set, in table order
    pub fn iter(self) -> impl Iterator<Item = CutKind> {
        CutKind::ALL
            .into_iter()
            .filter(move |&kind| self.contains(kind))
    }
}

impl FromIterator<CutKind> for CutKindSet {
    fn from_iter<I: IntoIterator<Item = CutKind>>(iter: I) -> Self {
        let mut set = CutKindSet::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl fmt::Display for CutKindSet {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{{")?;
        for (pos, kind) in self.iter().enumerate() {
            if pos > 0 {
                write!(fmt, ", ")?;
            }
            write!(fmt, "{}", kind)?;
        }
        write!(fmt, "}}")
    }
}
