pub mod error;
pub mod field;
pub mod poseidon;
pub mod r1cs;
pub mod witness;

pub use error::PoseidonError;
pub use poseidon::{Poseidon, PoseidonConfig};
pub use r1cs::{ConstraintSystem, LinearCombination, Variable};
