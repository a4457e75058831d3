// Key Generation Configuration
// Prime size, Miller-Rabin rounds and public exponent strategy

use serde::{Deserialize, Serialize};

use super::mgf::HASH_LEN;
use super::prime::MIN_ROUNDS;
use super::signature::DIGEST_LEN;
use crate::error::{Result, RsaError};

/// Smallest prime size (bits) whose modulus fits the OAEP framing of
/// `2 * HASH_LEN + 2` bytes
const OAEP_MIN_KEY_SIZE: u32 = ((2 * HASH_LEN as u32 + 2) * 8) / 2;

/// Smallest byte-aligned prime size whose modulus always exceeds the signing digest.
/// `n >= 2^(2 * keySize - 2)`, so `2 * keySize - 2 >= DIGEST_LEN * 8` is enough.
const SIGNATURE_MIN_KEY_SIZE: u32 = align_to_byte((DIGEST_LEN as u32 * 8 + 2) / 2);

/// Smallest accepted prime size in bits
pub const MIN_KEY_SIZE: u32 = if OAEP_MIN_KEY_SIZE > SIGNATURE_MIN_KEY_SIZE {
    OAEP_MIN_KEY_SIZE
} else {
    SIGNATURE_MIN_KEY_SIZE
};

const fn align_to_byte(bits: u32) -> u32 {
    (bits + 7) / 8 * 8
}

/// Default prime size in bits
pub const DEFAULT_KEY_SIZE: u32 = 1024;

/// How the public exponent is chosen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicExponent {
    /// Uniform draw from `[2^(keySize-1), 2^keySize)` until coprime with φ(n)
    #[default]
    Random,
    /// Fixed value such as 65537; primes are redrawn while it is not coprime with φ(n)
    Fixed(u64),
}

/// Configuration for key generation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyGenConfig {
    /// Bit length of each prime factor (the modulus has twice as many)
    pub key_size: u32,
    /// Miller-Rabin rounds with random witnesses
    pub rounds: u32,
    pub exponent: PublicExponent,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            key_size: DEFAULT_KEY_SIZE,
            rounds: MIN_ROUNDS,
            exponent: PublicExponent::Random,
        }
    }
}

impl KeyGenConfig {
    pub fn new(key_size: u32) -> Self {
        Self {
            key_size,
            ..Self::default()
        }
    }

    pub fn with_key_size(mut self, key_size: u32) -> Self {
        self.key_size = key_size;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_exponent(mut self, exponent: PublicExponent) -> Self {
        self.exponent = exponent;
        self
    }

    /// Check the key size against the minimum and byte alignment
    pub fn validate(&self) -> Result<()> {
        if self.key_size < MIN_KEY_SIZE || self.key_size % 8 != 0 {
            return Err(RsaError::InvalidKeySize {
                bits: self.key_size,
                min: MIN_KEY_SIZE,
            });
        }
        if let PublicExponent::Fixed(e) = self.exponent {
            if e < 3 || e % 2 == 0 {
                return Err(RsaError::KeyGenError(format!(
                    "public exponent {} must be odd and at least 3",
                    e
                )));
            }
        }
        Ok(())
    }

    /// Modulus length `k` in bytes
    pub fn modulus_len(&self) -> usize {
        (2 * self.key_size as usize) / 8
    }
}
