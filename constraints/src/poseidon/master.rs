/// The full Poseidon permutation: a fixed sequence of rounds chained
/// end-to-end.
///
/// Round `i`'s raw output linear combinations are fed directly into round
/// `i + 1` as its input state — no variable is allocated between rounds.
/// Only the S-box allocates anything, so the whole permutation costs exactly
/// `3 * (t * F + c * P)` constraints, plus `nOutputs` more if the final state
/// is pinned into named output variables.
use crate::poseidon::config::PoseidonConfig;
use crate::poseidon::constants::PoseidonConstants;
use crate::poseidon::round::Round;
use crate::r1cs::{ConstraintSystem, LinearCombination, Variable};
use crate::witness::WitnessBuilder;
use memory::FieldElement as Fe;

/// `(n_sbox, n_inputs, n_outputs)` for round `i` of `total_rounds`, per the
/// first/prefix-full/partial/suffix-full/last layout.
fn round_shape(i: usize, cfg: &PoseidonConfig, total_rounds: usize) -> (usize, usize, usize) {
    let half_f = cfg.full_rounds() / 2;
    if i == 0 {
        (cfg.t(), cfg.n_inputs(), cfg.t())
    } else if i < half_f {
        (cfg.t(), cfg.t(), cfg.t())
    } else if i < half_f + cfg.partial_rounds() {
        (cfg.c(), cfg.t(), cfg.t())
    } else if i < total_rounds - 1 {
        (cfg.t(), cfg.t(), cfg.t())
    } else {
        (cfg.t(), cfg.t(), cfg.n_outputs())
    }
}

pub struct MasterPermutation {
    pub rounds: Vec<Round>,
    /// Present only when `constrain_outputs` is set: fresh variables pinned
    /// to the permutation's final state.
    pub output_vars: Option<Vec<Variable>>,
    /// The permutation's final state: either the pinned variables above, or
    /// (if not pinned) the raw linear combinations of the last round.
    pub outputs: Vec<LinearCombination>,
}

impl MasterPermutation {
    pub fn synthesize(
        cs: &mut ConstraintSystem,
        cfg: &PoseidonConfig,
        constants: &PoseidonConstants,
        inputs: &[LinearCombination],
    ) -> Self {
        debug_assert_eq!(inputs.len(), cfg.n_inputs());
        let total_rounds = cfg.total_rounds();
        let mut rounds = Vec::with_capacity(total_rounds);
        let mut state: Vec<LinearCombination> = inputs.to_vec();

        for i in 0..total_rounds {
            let (n_sbox, n_inputs, n_outputs) = round_shape(i, cfg, total_rounds);
            debug_assert_eq!(state.len(), n_inputs);
            let round = Round::synthesize(
                cs,
                constants.c[i],
                &constants.m,
                cfg.t(),
                n_sbox,
                n_outputs,
                &state,
            );
            state = round.outputs.clone();
            rounds.push(round);
        }

        let (output_vars, outputs) = if cfg.constrain_outputs() {
            let mut vars = Vec::with_capacity(cfg.n_outputs());
            let mut lcs = Vec::with_capacity(cfg.n_outputs());
            for raw in state.iter().take(cfg.n_outputs()) {
                let v = cs.alloc_witness();
                cs.enforce_equal(raw.clone(), LinearCombination::from_variable(v));
                vars.push(v);
                lcs.push(LinearCombination::from_variable(v));
            }
            (Some(vars), lcs)
        } else {
            (None, state)
        };

        Self {
            rounds,
            output_vars,
            outputs,
        }
    }

    /// Mirror `synthesize`'s round chaining in concrete field arithmetic.
    pub fn assign_witness(
        &self,
        wb: &mut WitnessBuilder,
        cfg: &PoseidonConfig,
        constants: &PoseidonConstants,
        input_vals: &[Fe],
    ) -> Vec<Fe> {
        debug_assert_eq!(input_vals.len(), cfg.n_inputs());
        let total_rounds = cfg.total_rounds();
        let mut state: Vec<Fe> = input_vals.to_vec();

        for (i, round) in self.rounds.iter().enumerate() {
            let (_, _, n_outputs) = round_shape(i, cfg, total_rounds);
            state = round.assign_witness(wb, constants.c[i], &constants.m, cfg.t(), n_outputs, &state);
        }

        if let Some(vars) = &self.output_vars {
            for (var, val) in vars.iter().zip(&state) {
                wb.set(*var, *val);
            }
        }
        state
    }
}
