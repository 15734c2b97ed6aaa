/// One Poseidon round: add round constants, apply the S-box to some
/// positions, mix with the MDS matrix.
///
/// The round constant addition and the MDS mix are both linear, so they are
/// folded directly into the output linear combinations — only the S-box
/// step allocates variables or adds constraints. This is the constraint
/// minimization the whole gadget exists for.

use crate::poseidon::sbox::SBox;
use crate::r1cs::{ConstraintSystem, LinearCombination};
use crate::witness::WitnessBuilder;
use memory::FieldElement as Fe;

pub struct Round {
    pub sboxes: Vec<SBox>,
    pub outputs: Vec<LinearCombination>,
}

impl Round {
    /// Build one round's constraints.
    ///
    /// `state` has `n_inputs` entries (`state.len()`); `n_sbox` S-boxes are
    /// applied; `n_outputs` output linear combinations are produced from
    /// row `i` of the `t x t` row-major MDS matrix `m`.
    pub fn synthesize(
        cs: &mut ConstraintSystem,
        c_i: Fe,
        m: &[Fe],
        t: usize,
        n_sbox: usize,
        n_outputs: usize,
        state: &[LinearCombination],
    ) -> Self {
        let n_inputs = state.len();
        debug_assert!(n_inputs <= t);
        debug_assert!(n_sbox <= t);
        debug_assert!(n_outputs <= t);
        debug_assert_eq!(m.len(), t * t);

        let mut sboxes = Vec::with_capacity(n_sbox);
        for h in 0..n_sbox {
            let l_h = if h < n_inputs {
                state[h].clone() + LinearCombination::from_constant(c_i)
            } else {
                LinearCombination::from_constant(c_i)
            };
            sboxes.push(SBox::synthesize(cs, &l_h));
        }

        let mut outputs = Vec::with_capacity(n_outputs);
        for i in 0..n_outputs {
            let row = &m[i * t..i * t + t];
            let mut out = LinearCombination::zero();
            for s in 0..n_sbox {
                out = out + (sboxes[s].result() * row[s]);
            }
            for k in n_sbox..n_inputs {
                out = out + (state[k].clone() * row[k]);
            }
            if n_sbox < t {
                let mut const_term = Fe::ZERO;
                for row_coeff in row.iter().take(t).skip(n_sbox) {
                    const_term = const_term.add(&c_i.mul(row_coeff));
                }
                out = out + LinearCombination::from_constant(const_term);
            }
            outputs.push(out);
        }

        Self { sboxes, outputs }
    }

    /// Assign this round's S-box witness values and return the concrete
    /// output state (mirrors `synthesize`'s linear algebra in the field).
    pub fn assign_witness(
        &self,
        wb: &mut WitnessBuilder,
        c_i: Fe,
        m: &[Fe],
        t: usize,
        n_outputs: usize,
        state_vals: &[Fe],
    ) -> Vec<Fe> {
        let n_inputs = state_vals.len();
        let n_sbox = self.sboxes.len();

        let mut sbox_results = Vec::with_capacity(n_sbox);
        for (h, sbox) in self.sboxes.iter().enumerate() {
            let l_h = if h < n_inputs {
                state_vals[h].add(&c_i)
            } else {
                c_i
            };
            let (x2, x4, x5) = SBox::witness(l_h);
            wb.set(sbox.x2, x2);
            wb.set(sbox.x4, x4);
            wb.set(sbox.x5, x5);
            sbox_results.push(x5);
        }

        let mut out_vals = Vec::with_capacity(n_outputs);
        for i in 0..n_outputs {
            let row = &m[i * t..i * t + t];
            let mut sum = Fe::ZERO;
            for s in 0..n_sbox {
                sum = sum.add(&row[s].mul(&sbox_results[s]));
            }
            for k in n_sbox..n_inputs {
                sum = sum.add(&row[k].mul(&state_vals[k]));
            }
            if n_sbox < t {
                let mut const_term = Fe::ZERO;
                for row_coeff in row.iter().take(t).skip(n_sbox) {
                    const_term = const_term.add(&c_i.mul(row_coeff));
                }
                sum = sum.add(&const_term);
            }
            out_vals.push(sum);
        }
        out_vals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poseidon::constants::poseidon_constants;
    use crate::r1cs::Variable;

    #[test]
    fn full_round_costs_3t_constraints() {
        let constants = poseidon_constants(3, 8, 57);
        let mut cs = ConstraintSystem::new();
        let vars: Vec<Variable> = (0..3).map(|_| cs.alloc_witness()).collect();
        let state: Vec<LinearCombination> =
            vars.iter().map(|v| LinearCombination::from_variable(*v)).collect();
        let round = Round::synthesize(&mut cs, constants.c[0], &constants.m, 3, 3, 3, &state);
        assert_eq!(cs.num_constraints(), 9);
        assert_eq!(round.outputs.len(), 3);
    }

    #[test]
    fn partial_round_costs_3c_constraints() {
        let constants = poseidon_constants(3, 8, 57);
        let mut cs = ConstraintSystem::new();
        let vars: Vec<Variable> = (0..3).map(|_| cs.alloc_witness()).collect();
        let state: Vec<LinearCombination> =
            vars.iter().map(|v| LinearCombination::from_variable(*v)).collect();
        // partial round: only the first position gets an S-box.
        let round = Round::synthesize(&mut cs, constants.c[0], &constants.m, 3, 1, 3, &state);
        assert_eq!(cs.num_constraints(), 3);
        assert_eq!(round.outputs.len(), 3);
    }

    #[test]
    fn round_witness_satisfies_its_constraints() {
        let constants = poseidon_constants(3, 8, 57);
        let mut cs = ConstraintSystem::new();
        let vars: Vec<Variable> = (0..3).map(|_| cs.alloc_witness()).collect();
        let state: Vec<LinearCombination> =
            vars.iter().map(|v| LinearCombination::from_variable(*v)).collect();
        let round = Round::synthesize(&mut cs, constants.c[0], &constants.m, 3, 3, 3, &state);

        // Materialize outputs so verify() has concrete variables to check.
        let out_vars: Vec<Variable> = round
            .outputs
            .iter()
            .map(|lc| {
                let v = cs.alloc_witness();
                cs.enforce_equal(lc.clone(), LinearCombination::from_variable(v));
                v
            })
            .collect();

        let state_vals = vec![Fe::from_u64(1), Fe::from_u64(2), Fe::from_u64(3)];
        let mut wb = WitnessBuilder::new(&cs);
        for (v, val) in vars.iter().zip(&state_vals) {
            wb.set(*v, *val);
        }
        let out_vals = round.assign_witness(&mut wb, constants.c[0], &constants.m, 3, 3, &state_vals);
        for (v, val) in out_vars.iter().zip(&out_vals) {
            wb.set(*v, *val);
        }

        assert!(cs.verify(&wb.build()).is_ok());
    }
}
