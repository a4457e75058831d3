// RSA Big Integer Operations
// Fixed-length big-endian codec (OS2IP / I2OSP) and modular arithmetic helpers

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{Result, RsaError};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// OS2IP: interpret bytes as a big-endian unsigned integer
pub fn bytes_to_int(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// I2OSP: encode `n` big-endian into exactly `length` bytes.
///
/// Leading zero bytes are added as needed. Fails with
/// [`RsaError::EncodingError`] when `n` needs more than `length` bytes.
pub fn int_to_bytes(n: &RsaBigInt, length: usize) -> Result<Vec<u8>> {
    if n.is_zero() {
        return Ok(vec![0u8; length]);
    }

    let raw = n.to_bytes_be();
    if raw.len() > length {
        return Err(RsaError::EncodingError {
            length,
            required: raw.len(),
        });
    }

    let mut out = vec![0u8; length];
    out[length - raw.len()..].copy_from_slice(&raw);
    Ok(out)
}

/// Number of bytes needed to hold any integer below `n`
pub fn byte_len(n: &RsaBigInt) -> usize {
    ((n.bits() + 7) / 8) as usize
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Compute modular inverse: a^(-1) mod m
///
/// Iterative extended Euclidean algorithm over signed integers. Returns the
/// unique `x` in `[0, m)` with `a * x ≡ 1 (mod m)`, or `None` when
/// `gcd(a, m) != 1`.
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let modulus = BigInt::from_biguint(Sign::Plus, m.clone());
    // Invariant: old_s * a ≡ old_r (mod m), s * a ≡ r (mod m)
    let (mut old_r, mut r) = (BigInt::from_biguint(Sign::Plus, a % m), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        // Inverse doesn't exist
        return None;
    }

    // mod_floor keeps the result in [0, m) even when old_s is negative
    old_s.mod_floor(&modulus).to_biguint()
}
