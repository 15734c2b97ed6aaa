/// The instance stamper: builds one master permutation per parameter tuple
/// on a scratch constraint system, then stamps copies of its constraints
/// into a caller's constraint system by translating variable indices —
/// rather than re-synthesizing the round/S-box gadgets on every call.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, RwLock};

use crate::error::PoseidonError;
use crate::poseidon::config::PoseidonConfig;
use crate::poseidon::constants::{poseidon_constants, PoseidonConstants};
use crate::poseidon::master::MasterPermutation;
use crate::r1cs::{Constraint, ConstraintSystem, LinearCombination, Variable};
use crate::witness::WitnessBuilder;
use memory::FieldElement as Fe;

/// The once-built canonical circuit for a `(t, c, F, P, nInputs, nOutputs,
/// constrain_outputs)` tuple, shared by every stamped instance.
pub struct Master {
    cfg: PoseidonConfig,
    constants: Arc<PoseidonConstants>,
    num_variables: usize,
    input_vars: Vec<Variable>,
    output_vars: Vec<Variable>,
    permutation: MasterPermutation,
    constraints: RwLock<Vec<Constraint>>,
    swapped: AtomicBool,
}

impl Master {
    fn build(cfg: PoseidonConfig) -> Self {
        let constants = poseidon_constants(cfg.t(), cfg.full_rounds(), cfg.partial_rounds());
        let mut cs = ConstraintSystem::new();
        let input_vars: Vec<Variable> = (0..cfg.n_inputs()).map(|_| cs.alloc_witness()).collect();
        let input_lcs: Vec<LinearCombination> =
            input_vars.iter().map(|v| LinearCombination::from_variable(*v)).collect();
        let permutation = MasterPermutation::synthesize(&mut cs, &cfg, &constants, &input_lcs);
        let output_vars = permutation.output_vars.clone().unwrap_or_default();
        let num_variables = cs.num_variables();
        let constraints = RwLock::new(cs.constraints().to_vec());

        Self {
            cfg,
            constants,
            num_variables,
            input_vars,
            output_vars,
            permutation,
            constraints,
            swapped: AtomicBool::new(false),
        }
    }

    /// Swap the `A` and `B` linear combinations of every master constraint.
    ///
    /// Idempotent: the guard ensures the mutation runs at most once across
    /// the process's lifetime for this parameter tuple, regardless of how
    /// many times or from how many threads this is called.
    pub fn swap_ab(&self) {
        if self
            .swapped
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        let mut guard = self.constraints.write().unwrap();
        for constraint in guard.iter_mut() {
            std::mem::swap(&mut constraint.a, &mut constraint.b);
        }
    }
}

type MasterKey = PoseidonConfig;

static MASTER_CACHE: LazyLock<RwLock<HashMap<MasterKey, Arc<Master>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn master_for(cfg: PoseidonConfig) -> Arc<Master> {
    if let Some(existing) = MASTER_CACHE.read().unwrap().get(&cfg) {
        return existing.clone();
    }
    let mut cache = MASTER_CACHE.write().unwrap();
    if let Some(existing) = cache.get(&cfg) {
        return existing.clone();
    }
    let master = Arc::new(Master::build(cfg));
    cache.insert(cfg, master.clone());
    master
}

/// Translate a master-space variable index into the caller's variable
/// space: `0` stays universal, `[1, nInputs]` binds to the caller's input
/// variables, everything past that lands in the caller's fresh auxiliary
/// block starting at `aux_offset`.
fn translate(var: Variable, n_inputs: usize, inputs: &[Variable], aux_offset: usize) -> Variable {
    let idx = var.index();
    if idx == 0 {
        Variable::ONE
    } else if idx <= n_inputs {
        inputs[idx - 1]
    } else {
        Variable(aux_offset + (idx - 1 - n_inputs))
    }
}

fn translate_lc(lc: &LinearCombination, n_inputs: usize, inputs: &[Variable], aux_offset: usize) -> LinearCombination {
    LinearCombination {
        terms: lc
            .terms
            .iter()
            .map(|(v, c)| (translate(*v, n_inputs, inputs, aux_offset), *c))
            .collect(),
    }
}

/// A per-call stamp of a master permutation into a caller's constraint
/// system: owns nothing but the translation offset and the translated
/// output variables, and is dropped along with the caller's gadget tree.
pub struct Instance {
    cfg: PoseidonConfig,
    master: Arc<Master>,
    aux_offset: usize,
    input_vars: Vec<Variable>,
    output_vars: Vec<Variable>,
}

impl Instance {
    /// Stamp one instance of `cfg`'s permutation into `cs`, binding
    /// `inputs` as the instance's input variables.
    pub fn stamp(
        cs: &mut ConstraintSystem,
        cfg: PoseidonConfig,
        inputs: &[Variable],
    ) -> Result<Self, PoseidonError> {
        if inputs.len() != cfg.n_inputs() {
            return Err(PoseidonError::ParameterInvalid(format!(
                "expected {} input variable(s), got {}",
                cfg.n_inputs(),
                inputs.len()
            )));
        }

        let master = master_for(cfg);
        let aux_len = master.num_variables - 1 - cfg.n_inputs();
        let aux_offset = cs.num_variables();
        for _ in 0..aux_len {
            cs.alloc_witness();
        }

        let snapshot = master.constraints.read().unwrap().clone();
        for constraint in &snapshot {
            let a = translate_lc(&constraint.a, cfg.n_inputs(), inputs, aux_offset);
            let b = translate_lc(&constraint.b, cfg.n_inputs(), inputs, aux_offset);
            let c = translate_lc(&constraint.c, cfg.n_inputs(), inputs, aux_offset);
            cs.enforce(a, b, c);
        }

        let output_vars = master
            .output_vars
            .iter()
            .map(|v| translate(*v, cfg.n_inputs(), inputs, aux_offset))
            .collect();

        Ok(Self {
            cfg,
            master,
            aux_offset,
            input_vars: inputs.to_vec(),
            output_vars,
        })
    }

    /// Run the master's witness generation on this instance's input
    /// variables (read from `wb`, where the caller must have already
    /// assigned them) and copy the resulting auxiliary values (including the
    /// pinned outputs) into the caller's witness.
    ///
    /// Returns `WitnessUnassigned` if any input variable has not yet been
    /// assigned a value in `wb` — `generate_witness` invoked before inputs
    /// are set is a caller contract violation, not silently treated as zero.
    pub fn generate_witness(&self, wb: &mut WitnessBuilder) -> Result<Vec<Fe>, PoseidonError> {
        for var in &self.input_vars {
            if !wb.is_set(*var) {
                return Err(PoseidonError::WitnessUnassigned(format!(
                    "input variable {} was not assigned before generate_witness",
                    var.index()
                )));
            }
        }
        let input_vals: Vec<Fe> = self.input_vars.iter().map(|v| wb.get(*v)).collect();

        let mut scratch = vec![Fe::ZERO; self.master.num_variables];
        scratch[0] = Fe::ONE;
        for (var, val) in self.master.input_vars.iter().zip(&input_vals) {
            scratch[var.index()] = *val;
        }
        let mut scratch_wb = WitnessBuilder::with_values(scratch);
        let outputs = self.master.permutation.assign_witness(
            &mut scratch_wb,
            &self.master.cfg,
            &self.master.constants,
            &input_vals,
        );
        let scratch_values = scratch_wb.build();

        for idx in (1 + self.cfg.n_inputs())..self.master.num_variables {
            let user_var = translate(Variable(idx), self.cfg.n_inputs(), &self.input_vars, self.aux_offset);
            wb.set(user_var, scratch_values[idx]);
        }

        Ok(outputs)
    }

    /// The single output variable, when `nOutputs = 1` and outputs are
    /// pinned. `None` otherwise (multiple outputs, or outputs left as raw
    /// linear combinations).
    pub fn result(&self) -> Option<Variable> {
        match self.output_vars.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn outputs(&self) -> &[Variable] {
        &self.output_vars
    }

    /// Swap the `A`/`B` linear combinations of every constraint in this
    /// instance's master — affects every instance stamped from it, past and
    /// future, exactly once.
    pub fn swap_ab(&self) {
        self.master.swap_ab();
    }
}
