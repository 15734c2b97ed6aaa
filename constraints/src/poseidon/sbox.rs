/// The `x -> x^5` S-box gadget.
///
/// Emits exactly three constraints and three fresh variables, regardless of
/// how many terms the input linear combination carries — this is the only
/// place in the permutation that actually costs R1CS constraints; round
/// constant addition and MDS mixing are both linear and fold into the
/// surrounding linear combinations for free.

use crate::r1cs::{ConstraintSystem, LinearCombination, Variable};
use memory::FieldElement as Fe;

/// A single `x^5` sub-gadget: owns the three variables it allocated and
/// exposes the final one as its result.
pub struct SBox {
    pub x2: Variable,
    pub x4: Variable,
    pub x5: Variable,
}

impl SBox {
    /// Emit the three constraints for `y = x^5` where `x` is an arbitrary
    /// linear combination.
    pub fn synthesize(cs: &mut ConstraintSystem, x: &LinearCombination) -> Self {
        let x2 = cs.mul_lc(x, x);
        let x2_lc = LinearCombination::from_variable(x2);
        let x4 = cs.mul_lc(&x2_lc, &x2_lc);
        let x4_lc = LinearCombination::from_variable(x4);
        let x5 = cs.mul_lc(&x4_lc, x);
        Self { x2, x4, x5 }
    }

    /// Result linear combination: a single variable, `x^5`.
    pub fn result(&self) -> LinearCombination {
        LinearCombination::from_variable(self.x5)
    }

    /// Witness assignment: given the concrete value of `x`, compute and
    /// return `(x^2, x^4, x^5)` so the caller can write them into the
    /// three variables this gadget owns.
    pub fn witness(val_x: Fe) -> (Fe, Fe, Fe) {
        let x2 = val_x.mul(&val_x);
        let x4 = x2.mul(&x2);
        let x5 = x4.mul(&val_x);
        (x2, x4, x5)
    }
}
