/// Deterministic derivation of Poseidon round constants and the MDS matrix.
///
/// Both are derived from fixed ASCII seed strings via BLAKE2b, so that the
/// resulting bytes — which become part of a circuit's public identity —
/// are bit-exact across runs, platforms, and endianness.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use blake2::digest::{Update, VariableOutput};
use blake2::Blake2bVar;
use memory::FieldElement as Fe;

use crate::field;

const ROUND_CONSTANTS_SEED: &str = "poseidon_constants";
const MATRIX_SEED: &str = "poseidon_matrix_0000";

/// Round constants `C` (length `F + P`) and MDS matrix `M` (length `t * t`,
/// row-major) for one `(t, F, P)` parameter tuple.
#[derive(Debug)]
pub struct PoseidonConstants {
    pub c: Vec<Fe>,
    pub m: Vec<Fe>,
}

impl PoseidonConstants {
    fn generate(t: usize, full_rounds: usize, partial_rounds: usize) -> Self {
        let total_rounds = full_rounds + partial_rounds;
        let c = derive_sequence(ROUND_CONSTANTS_SEED, total_rounds);
        let m = derive_mds(t);
        Self { c, m }
    }
}

/// Number of bytes BLAKE2b must emit per field element, per §4.1/§9's
/// rounding rule: ceil the modulus bit length up to the *next* multiple of
/// 8, always adding a full extra byte when the bit length is already a
/// multiple of 8. This is unconventional but must be preserved exactly to
/// stay compatible with circuits built against these constants.
fn round_constant_byte_len() -> usize {
    let bitlen = field::bit_size();
    let rem = bitlen % 8;
    let ceil_bits = bitlen + (8 - rem);
    ceil_bits / 8
}

fn blake2b(out_len: usize, data: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2bVar::new(out_len).expect("blake2b supports this output length");
    hasher.update(data);
    let mut out = vec![0u8; out_len];
    hasher
        .finalize_variable(&mut out)
        .expect("output buffer matches declared length");
    out
}

/// Derive `n` field elements from `seed`: the first `L` BLAKE2b output bytes
/// of `seed` become element 0 (little-endian, reduced mod `|F|`); each
/// subsequent element re-hashes the previous element's raw output bytes.
fn derive_sequence(seed: &str, n: usize) -> Vec<Fe> {
    let l = round_constant_byte_len();
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }
    let mut bytes = blake2b(l, seed.as_bytes());
    out.push(field::from_bytes_le_reduce(&bytes));
    for _ in 1..n {
        bytes = blake2b(l, &bytes);
        out.push(field::from_bytes_le_reduce(&bytes));
    }
    out
}

/// Cauchy-matrix MDS derivation: generate `2t` field elements, then set
/// `M[i*t + j] = (c[i] - c[t+j])^-1`.
fn derive_mds(t: usize) -> Vec<Fe> {
    let c = derive_sequence(MATRIX_SEED, 2 * t);
    let mut m = Vec::with_capacity(t * t);
    for i in 0..t {
        for j in 0..t {
            let denom = field::sub(&c[i], &c[t + j]);
            let inv = field::inv(&denom)
                .expect("Cauchy construction: x_i and y_j ranges never collide");
            m.push(inv);
        }
    }
    m
}

type ConstantsKey = (usize, usize, usize);

static CONSTANTS_CACHE: LazyLock<RwLock<HashMap<ConstantsKey, Arc<PoseidonConstants>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Fetch (generating and memoizing on first use) the constants for
/// `(t, full_rounds, partial_rounds)`. Safe to call concurrently: the first
/// caller for a given tuple generates the value under a write lock; all
/// other callers — before or after — only ever take a read lock once the
/// value exists.
pub fn poseidon_constants(t: usize, full_rounds: usize, partial_rounds: usize) -> Arc<PoseidonConstants> {
    let key = (t, full_rounds, partial_rounds);
    if let Some(existing) = CONSTANTS_CACHE.read().unwrap().get(&key) {
        return existing.clone();
    }
    let mut cache = CONSTANTS_CACHE.write().unwrap();
    if let Some(existing) = cache.get(&key) {
        return existing.clone();
    }
    let constants = Arc::new(PoseidonConstants::generate(t, full_rounds, partial_rounds));
    cache.insert(key, constants.clone());
    constants
}
