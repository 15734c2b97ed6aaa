/// R1CS Constraint System for ZK Proofs
///
/// An R1CS (Rank-1 Constraint System) represents computation as a set of
/// constraints of the form: A · B = C, where A, B, C are linear combinations
/// of variables (wires).
///
/// Wire layout (snarkjs-compatible):
///   Index 0     = ONE (constant wire, always 1)
///   1..=n_pub   = public inputs (instance)
///   n_pub+1..   = private inputs + intermediate (witness)

use memory::FieldElement;

// ============================================================================
// Variable (Wire reference)
// ============================================================================

/// A reference to a wire in the constraint system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) usize);

impl Variable {
    /// The constant-one wire (index 0 by R1CS convention).
    pub const ONE: Variable = Variable(0);

    /// Raw index for serialization.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

// ============================================================================
// LinearCombination
// ============================================================================

/// A linear combination: Σ(coefficient_i * variable_i)
///
/// Stored as sparse (variable, coefficient) pairs.
#[derive(Debug, Clone, Default)]
pub struct LinearCombination {
    pub terms: Vec<(Variable, FieldElement)>,
}

impl LinearCombination {
    pub fn zero() -> Self {
        Self { terms: vec![] }
    }

    /// Create LC from a single variable with coefficient 1.
    pub fn from_variable(var: Variable) -> Self {
        Self {
            terms: vec![(var, FieldElement::ONE)],
        }
    }

    /// Create LC from a constant field element: coeff * ONE.
    pub fn from_constant(coeff: FieldElement) -> Self {
        if coeff.is_zero() {
            return Self::zero();
        }
        Self {
            terms: vec![(Variable::ONE, coeff)],
        }
    }

    /// Add a (coefficient * variable) term.
    pub fn add_term(&mut self, var: Variable, coeff: FieldElement) {
        self.terms.push((var, coeff));
    }

    /// Returns true if this LC only references `Variable::ONE` (i.e., it's a pure constant).
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(|(var, _)| *var == Variable::ONE)
    }

    /// If this LC is a pure constant (only `Variable::ONE` terms), return the scalar value.
    /// Returns `None` if any non-ONE variable is present.
    pub fn constant_value(&self) -> Option<FieldElement> {
        if !self.is_constant() {
            return None;
        }
        let mut sum = FieldElement::ZERO;
        for (_, coeff) in &self.terms {
            sum = sum.add(coeff);
        }
        Some(sum)
    }

    /// If this LC is exactly `1 * var` where `var` is not the constant-one wire,
    /// return that variable. Otherwise return `None`.
    ///
    /// This enables zero-cost materialization when an LC already represents
    /// a single circuit variable.
    pub fn as_single_variable(&self) -> Option<Variable> {
        if self.terms.len() == 1 {
            let (var, coeff) = &self.terms[0];
            if *var != Variable::ONE && *coeff == FieldElement::ONE {
                return Some(*var);
            }
        }
        None
    }

    /// Evaluate the LC given a full witness assignment.
    /// witness[i] = value of variable i.
    pub fn evaluate(&self, witness: &[FieldElement]) -> FieldElement {
        let mut sum = FieldElement::ZERO;
        for (var, coeff) in &self.terms {
            let val = witness[var.0];
            sum = sum.add(&coeff.mul(&val));
        }
        sum
    }
}

// ============================================================================
// Arithmetic on LinearCombinations
// ============================================================================

impl LinearCombination {
    /// Fold `terms` into this LC, summing coefficients for variables already
    /// present instead of appending a duplicate entry.
    ///
    /// Gadgets that chain many rounds without materializing intermediate
    /// state (e.g. Poseidon's partial rounds) pass the same variable through
    /// many linear combinations; without merging, term counts would grow
    /// combinatorially instead of linearly in the round count.
    fn merge_in(&mut self, terms: Vec<(Variable, FieldElement)>) {
        for (var, coeff) in terms {
            match self.terms.iter_mut().find(|(v, _)| *v == var) {
                Some((_, existing)) => *existing = existing.add(&coeff),
                None => self.terms.push((var, coeff)),
            }
        }
    }
}

impl std::ops::Add for LinearCombination {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self {
        self.merge_in(rhs.terms);
        self
    }
}

impl std::ops::Sub for LinearCombination {
    type Output = Self;
    fn sub(mut self, rhs: Self) -> Self {
        let negated = rhs.terms.into_iter().map(|(v, c)| (v, c.neg())).collect();
        self.merge_in(negated);
        self
    }
}

/// Scalar multiplication: coeff * LC
impl std::ops::Mul<FieldElement> for LinearCombination {
    type Output = Self;
    fn mul(mut self, scalar: FieldElement) -> Self {
        for (_, coeff) in &mut self.terms {
            *coeff = coeff.mul(&scalar);
        }
        self
    }
}

// ============================================================================
// R1CS Constraint
// ============================================================================

/// A single R1CS constraint: A · B = C
///
/// Where A, B, C are linear combinations of variables, and ·
/// means "the dot product of the LC's evaluation with the witness
/// vector, then multiplied together".
#[derive(Debug, Clone)]
pub struct Constraint {
    pub a: LinearCombination,
    pub b: LinearCombination,
    pub c: LinearCombination,
}

// ============================================================================
// ConstraintSystem
// ============================================================================

/// The main R1CS constraint system.
///
/// Manages variable allocation, constraint collection, and
/// witness verification.
pub struct ConstraintSystem {
    /// Total number of variables (including ONE at index 0).
    num_variables: usize,
    /// Number of public input variables (indices 1..=num_pub_inputs).
    num_pub_inputs: usize,
    /// All constraints: each is (A, B, C) with A * B = C.
    constraints: Vec<Constraint>,
}

impl ConstraintSystem {
    pub fn new() -> Self {
        Self {
            // Variable 0 = ONE (constant wire)
            num_variables: 1,
            num_pub_inputs: 0,
            constraints: Vec::new(),
        }
    }

    // --- Variable allocation ---

    /// Allocate a public input variable.
    /// Public inputs must be allocated before any private/auxiliary variables.
    pub fn alloc_input(&mut self) -> Variable {
        let idx = self.num_variables;
        self.num_variables += 1;
        self.num_pub_inputs += 1;
        Variable(idx)
    }

    /// Allocate a private (witness) or intermediate variable.
    pub fn alloc_witness(&mut self) -> Variable {
        let idx = self.num_variables;
        self.num_variables += 1;
        Variable(idx)
    }

    // --- Constraint enforcement ---

    /// Add a constraint: A * B = C
    pub fn enforce(
        &mut self,
        a: LinearCombination,
        b: LinearCombination,
        c: LinearCombination,
    ) {
        self.constraints.push(Constraint { a, b, c });
    }

    /// Convenience: enforce that lc = 0 (i.e., 0 * 0 = lc is wrong,
    /// so we do lc * ONE = 0 → enforce(lc, ONE, zero)).
    /// Actually: enforce(lc, 1, 0) doesn't work.
    /// Correct encoding: enforce(lc, ONE, zero_lc) means lc * 1 = 0.
    /// Wait — that constrains lc to be zero. Let me think.
    /// enforce(A, B, C) means A*B = C.
    /// To constrain x = y: enforce(x, 1, y) → x*1 = y.
    pub fn enforce_equal(&mut self, x: LinearCombination, y: LinearCombination) {
        // x * 1 = y  →  x = y
        self.enforce(x, LinearCombination::from_variable(Variable::ONE), y);
    }

    // --- Queries ---

    /// Total number of variables (including ONE).
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Number of public inputs.
    pub fn num_pub_inputs(&self) -> usize {
        self.num_pub_inputs
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Access constraints for serialization or verification.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    // --- Verification ---

    /// Verify that a witness satisfies all constraints.
    ///
    /// witness[0] must be ONE (FieldElement::ONE).
    /// witness[1..=num_pub_inputs] = public inputs.
    /// witness[num_pub_inputs+1..] = private/intermediate values.
    ///
    /// Returns Ok(()) if all constraints satisfied, or the index
    /// of the first failing constraint.
    pub fn verify(&self, witness: &[FieldElement]) -> Result<(), usize> {
        if witness.len() != self.num_variables {
            return Err(usize::MAX);
        }
        // witness[0] must be 1
        if witness[0] != FieldElement::ONE {
            return Err(usize::MAX);
        }

        for (i, constraint) in self.constraints.iter().enumerate() {
            let a_val = constraint.a.evaluate(witness);
            let b_val = constraint.b.evaluate(witness);
            let c_val = constraint.c.evaluate(witness);

            // Check: A * B == C
            let ab = a_val.mul(&b_val);
            if ab != c_val {
                return Err(i);
            }
        }

        Ok(())
    }
}

// ============================================================================
// Builder helpers (syntactic sugar for circuit construction)
// ============================================================================

impl ConstraintSystem {
    /// Allocate a witness variable and constrain it to be the product of two LCs.
    /// Returns the new variable (= a * b in the field).
    pub fn mul_lc(
        &mut self,
        a: &LinearCombination,
        b: &LinearCombination,
    ) -> Variable {
        let out = self.alloc_witness();
        self.enforce(
            a.clone(),
            b.clone(),
            LinearCombination::from_variable(out),
        );
        out
    }

    /// Constrain: out = a + b (linear, no new constraint needed if we track LCs).
    /// This just returns the sum LC. Only use enforce if a multiplication is involved.
    pub fn add_lc(
        &self,
        a: &LinearCombination,
        b: &LinearCombination,
    ) -> LinearCombination {
        a.clone() + b.clone()
    }

    /// Allocate a witness variable constrained to be the inverse of x.
    /// Enforces: x * x_inv = 1
    /// Returns x_inv variable. Caller must assign the correct witness value.
    pub fn inv_lc(&mut self, x: &LinearCombination) -> Variable {
        let x_inv = self.alloc_witness();
        self.enforce(
            x.clone(),
            LinearCombination::from_variable(x_inv),
            LinearCombination::from_constant(FieldElement::ONE),
        );
        x_inv
    }
}

// ============================================================================
// Tests
// ============================================================================
