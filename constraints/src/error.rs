use std::fmt;

/// Errors produced while constructing or witnessing a Poseidon gadget.
///
/// Every variant is a construction-time, fatal programmer error: there are
/// no recoverable runtime errors in this crate (constraint-satisfaction
/// failures are a property the surrounding proving system checks, not
/// something this crate detects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoseidonError {
    /// A parameter tuple violated a precondition (`nInputs > t`,
    /// `nOutputs > t`, `F` odd, or `c > t`).
    ParameterInvalid(String),
    /// `generate_witness` was invoked before the caller supplied inputs.
    WitnessUnassigned(String),
}

impl fmt::Display for PoseidonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseidonError::ParameterInvalid(msg) => {
                write!(f, "invalid Poseidon parameters: {msg}")
            }
            PoseidonError::WitnessUnassigned(msg) => {
                write!(f, "witness not assigned: {msg}")
            }
        }
    }
}

impl std::error::Error for PoseidonError {}
