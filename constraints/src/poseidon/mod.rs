/// A parameterized Poseidon permutation/hash R1CS gadget.
///
/// `Poseidon` is the public surface over the instance stamper (§7): it owns
/// nothing beyond a stamped [`instance::Instance`] and the caller's input
/// variables, and exists so call sites read `Poseidon::generate_constraints`
/// / `generate_witness` rather than reaching into the stamper directly.
pub mod config;
pub mod constants;
pub mod instance;
pub mod master;
pub mod round;
pub mod sbox;

pub use config::PoseidonConfig;

use crate::error::PoseidonError;
use crate::r1cs::{ConstraintSystem, Variable};
use crate::witness::WitnessBuilder;
use instance::Instance;
use memory::FieldElement as Fe;

pub struct Poseidon {
    instance: Instance,
}

impl Poseidon {
    /// Stamp a Poseidon permutation instance, bound to `inputs`, into `cs`.
    pub fn generate_constraints(
        cs: &mut ConstraintSystem,
        cfg: PoseidonConfig,
        inputs: &[Variable],
    ) -> Result<Self, PoseidonError> {
        let instance = Instance::stamp(cs, cfg, inputs)?;
        Ok(Self { instance })
    }

    /// Convenience constructor for the `Poseidon128` default parameter set
    /// (`t=6, c=1, F=8, P=57`).
    pub fn generate_constraints_128(
        cs: &mut ConstraintSystem,
        inputs: &[Variable],
        n_outputs: usize,
    ) -> Result<Self, PoseidonError> {
        let cfg = PoseidonConfig::poseidon128(inputs.len(), n_outputs)?;
        Self::generate_constraints(cs, cfg, inputs)
    }

    /// Run the permutation on this instance's input variables (read from
    /// `wb`, which the caller must have already assigned) and write the
    /// resulting auxiliary and output values back into `wb`.
    pub fn generate_witness(&self, wb: &mut WitnessBuilder) -> Result<Vec<Fe>, PoseidonError> {
        self.instance.generate_witness(wb)
    }

    /// The single output variable, when this instance has exactly one
    /// pinned output.
    pub fn result(&self) -> Option<Variable> {
        self.instance.result()
    }

    pub fn outputs(&self) -> &[Variable] {
        self.instance.outputs()
    }

    /// Swap the `A`/`B` linear combinations of this instance's master —
    /// see [`instance::Master::swap_ab`].
    pub fn swap_ab(&self) {
        self.instance.swap_ab();
    }
}
