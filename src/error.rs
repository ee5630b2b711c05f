//! Error hierarchy of the PID cuts engine

use crate::numeric::CutCode;

use thiserror::Error;

/// Root error type for every PID cuts failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PidCutsError {
    /// A setter was given a code outside of its table. The configuration
    /// is left untouched.
    #[error("{parameter} code {code} not supported")]
    UnsupportedCode {
        /// Name of the rejecting parameter
        parameter: &'static str,
        /// Offending code
        code: CutCode,
    },

    /// A cuts string could not be decoded
    #[error("malformed cuts string {cuts:?}: {reason}")]
    MalformedCutsString {
        /// The cuts string as received
        cuts: String,
        /// What is wrong with it
        reason: String,
    },

    /// A collaborator needed to evaluate the configured cuts is absent
    #[error("no {0} instance while PID cuts are enabled. ABORTING!!!")]
    MissingCollaborator(&'static str),

    /// The cut kinds and the diagnostics naming table disagree
    #[error("inconsistency! cut {index} with name {name} not found")]
    InconsistentTable {
        /// Index of the cut kind
        index: usize,
        /// Name which was looked up
        name: &'static str,
    },

    /// A textual species name that we do not know about
    #[error("unknown particle species {0:?}")]
    UnknownSpecies(String),

    /// A textual QA level that we do not know about
    #[error("unknown QA level {0:?}")]
    UnknownQaLevel(String),
}

/// Result type of the PID cuts engine
pub type PidCutsResult<T> = Result<T, PidCutsError>;
