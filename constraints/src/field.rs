/// Field adapter.
///
/// The prime field itself (BN254 Fr, Montgomery arithmetic) lives in
/// `memory::FieldElement` and is treated as an external collaborator: this
/// module only narrows that type down to the operations the Poseidon gadget
/// actually needs, named the way the gadget talks about them (`Fe`, not
/// `FieldElement`), so gadget code doesn't reach into `memory` ad hoc.

use memory::FieldElement as Fe;
use memory::field::MODULUS;

/// Bit length of the field modulus `|F|`.
///
/// Computed once from the limbs rather than hardcoded, so a future field
/// swap can't silently desync this from the modulus it's derived from.
pub fn bit_size() -> usize {
    for (i, limb) in MODULUS.iter().enumerate().rev() {
        if *limb != 0 {
            return i * 64 + (64 - limb.leading_zeros() as usize);
        }
    }
    0
}

pub fn zero() -> Fe {
    Fe::ZERO
}

pub fn one() -> Fe {
    Fe::ONE
}

pub fn add(a: &Fe, b: &Fe) -> Fe {
    a.add(b)
}

pub fn sub(a: &Fe, b: &Fe) -> Fe {
    a.sub(b)
}

pub fn mul(a: &Fe, b: &Fe) -> Fe {
    a.mul(b)
}

pub fn inv(a: &Fe) -> Option<Fe> {
    a.inv()
}

/// Decode a field element from little-endian bytes, reducing modulo `|F|`
/// if the raw value is out of range (used by the constant generator, which
/// must accept BLAKE2b output wider than a single canonical encoding).
pub fn from_bytes_le_reduce(bytes: &[u8]) -> Fe {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.chunks(8).take(4).enumerate() {
        let mut buf = [0u8; 8];
        buf[..chunk.len()].copy_from_slice(chunk);
        limbs[i] = u64::from_le_bytes(buf);
    }
    // `from_canonical` reduces mod p internally (montgomery_mul by R^2),
    // so out-of-range low-order bits are fine; any bytes beyond the first
    // 4 limbs (32 bytes) are simply not representable and are dropped,
    // which is only ever exercised with <= 32-byte chunks by the caller.
    Fe::from_canonical(limbs)
}

/// Strict little-endian decode with rejection of out-of-range values,
/// matching §6's `from_bytes_le`.
pub fn from_bytes_le(bytes: &[u8; 32]) -> Option<Fe> {
    Fe::from_le_bytes(bytes)
}
