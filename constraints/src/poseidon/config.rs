/// Runtime parameter tuple for a Poseidon permutation/hash instance.
///
/// Parameters are carried as ordinary struct fields rather than const
/// generics: `static` items declared inside a const-generic function are
/// *not* monomorphized per instantiation, which would silently share one
/// cache across every `(t, c, F, P, ...)` combination. A hashable runtime
/// key sidesteps that footgun and still gives the memoization the gadget
/// needs.
use crate::error::PoseidonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoseidonConfig {
    t: usize,
    c: usize,
    full_rounds: usize,
    partial_rounds: usize,
    n_inputs: usize,
    n_outputs: usize,
    constrain_outputs: bool,
}

impl PoseidonConfig {
    /// Validate and build a parameter tuple.
    ///
    /// Rejects: `nInputs > t`, `nOutputs > t`, `F` odd, `c` outside `1..=t`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        t: usize,
        c: usize,
        full_rounds: usize,
        partial_rounds: usize,
        n_inputs: usize,
        n_outputs: usize,
        constrain_outputs: bool,
    ) -> Result<Self, PoseidonError> {
        if n_inputs > t {
            return Err(PoseidonError::ParameterInvalid(format!(
                "nInputs ({n_inputs}) exceeds t ({t})"
            )));
        }
        if n_outputs > t {
            return Err(PoseidonError::ParameterInvalid(format!(
                "nOutputs ({n_outputs}) exceeds t ({t})"
            )));
        }
        if full_rounds % 2 != 0 {
            return Err(PoseidonError::ParameterInvalid(format!(
                "F ({full_rounds}) must be even"
            )));
        }
        if c < 1 || c > t {
            return Err(PoseidonError::ParameterInvalid(format!(
                "c ({c}) must be in 1..=t ({t})"
            )));
        }
        Ok(Self {
            t,
            c,
            full_rounds,
            partial_rounds,
            n_inputs,
            n_outputs,
            constrain_outputs,
        })
    }

    /// The `Poseidon128` default parameter set: `t=6, c=1, F=8, P=57`, pinned
    /// for 128-bit security at this arity, with output pinning enabled.
    pub fn poseidon128(n_inputs: usize, n_outputs: usize) -> Result<Self, PoseidonError> {
        Self::new(6, 1, 8, 57, n_inputs, n_outputs, true)
    }

    pub fn total_rounds(&self) -> usize {
        self.full_rounds + self.partial_rounds
    }

    pub fn t(&self) -> usize {
        self.t
    }

    pub fn c(&self) -> usize {
        self.c
    }

    pub fn full_rounds(&self) -> usize {
        self.full_rounds
    }

    pub fn partial_rounds(&self) -> usize {
        self.partial_rounds
    }

    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    pub fn constrain_outputs(&self) -> bool {
        self.constrain_outputs
    }
}
