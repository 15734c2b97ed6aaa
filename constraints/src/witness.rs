/// Witness builder for R1CS constraint systems.
///
/// Manages the assignment of values to circuit variables during
/// witness generation (the "prover" side of computation).

use memory::FieldElement;
use crate::r1cs::{ConstraintSystem, Variable};

/// Mutable witness vector builder.
pub struct WitnessBuilder {
    /// Values assigned to each variable. Index 0 = ONE.
    values: Vec<FieldElement>,
    /// Whether each variable has been explicitly assigned. Index 0 is
    /// always set (it's the constant wire). Lets callers distinguish
    /// "legitimately zero" from "never written" — see `is_set`.
    assigned: Vec<bool>,
}

impl WitnessBuilder {
    /// Create a new witness builder sized for the given constraint system.
    pub fn new(cs: &ConstraintSystem) -> Self {
        let mut values = vec![FieldElement::ZERO; cs.num_variables()];
        values[0] = FieldElement::ONE; // Wire 0 = constant 1
        let mut assigned = vec![false; cs.num_variables()];
        assigned[0] = true;
        Self { values, assigned }
    }

    /// Wrap an already-built values vector (index 0 must already be `ONE`).
    ///
    /// Used by the instance stamper to drive a scratch witness over a
    /// master's variable space, which has no `ConstraintSystem` of its own
    /// by the time witnesses are generated. Every index is considered
    /// already assigned, since the caller hands over a fully-built vector.
    pub fn with_values(values: Vec<FieldElement>) -> Self {
        debug_assert_eq!(values[0], FieldElement::ONE);
        let assigned = vec![true; values.len()];
        Self { values, assigned }
    }

    /// Set the value of a variable.
    pub fn set(&mut self, var: Variable, val: FieldElement) {
        self.values[var.index()] = val;
        self.assigned[var.index()] = true;
    }

    /// Get the value of a variable.
    pub fn get(&self, var: Variable) -> FieldElement {
        self.values[var.index()]
    }

    /// Whether `var` has been explicitly assigned a value.
    pub fn is_set(&self, var: Variable) -> bool {
        self.assigned[var.index()]
    }

    /// Consume and return the witness vector for verification.
    pub fn build(self) -> Vec<FieldElement> {
        self.values
    }
}
