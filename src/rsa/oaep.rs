// OAEP Padding
// EME-OAEP encoding and decoding with MGF1/SHA-1
//
// EM = 0x00 || maskedSeed || maskedDB
// DB = lHash || PS || 0x01 || M

use log::debug;
use rand::{CryptoRng, RngCore};

use super::config::MIN_KEY_SIZE;
use super::mgf::{hash, mgf1, xor_in_place, HASH_LEN};
use crate::error::{Result, RsaError};

/// OAEP encoder/decoder bound to one label
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OaepCodec {
    label_hash: Vec<u8>,
}

impl Default for OaepCodec {
    fn default() -> Self {
        Self::with_label(b"")
    }
}

impl OaepCodec {
    /// Codec with the empty label
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(label: &[u8]) -> Self {
        Self {
            label_hash: hash(label),
        }
    }

    /// Largest message that fits a `k`-byte block: `k - 2*hLen - 2`
    pub fn max_message_len(k: usize) -> Result<usize> {
        k.checked_sub(2 * HASH_LEN + 2)
            .ok_or(RsaError::InvalidKeySize {
                bits: (k * 4) as u32,
                min: MIN_KEY_SIZE,
            })
    }

    /// Encode `message` into a `k`-byte block with a fresh random seed
    pub fn encode<R>(&self, message: &[u8], k: usize, rng: &mut R) -> Result<Vec<u8>>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let max = Self::max_message_len(k)?;
        if message.len() > max {
            return Err(RsaError::MessageTooLong {
                length: message.len(),
                max,
            });
        }

        let mut seed = [0u8; HASH_LEN];
        rng.fill_bytes(&mut seed);

        Ok(self.encode_with_seed(message, k, &seed))
    }

    /// Deterministic half of [`encode`](Self::encode); lengths are already checked
    fn encode_with_seed(&self, message: &[u8], k: usize, seed: &[u8; HASH_LEN]) -> Vec<u8> {
        let db_len = k - HASH_LEN - 1;

        // DB = lHash || PS || 0x01 || M, PS is already zero
        let mut db = vec![0u8; db_len];
        db[..HASH_LEN].copy_from_slice(&self.label_hash);
        db[db_len - message.len() - 1] = 0x01;
        db[db_len - message.len()..].copy_from_slice(message);

        let db_mask = mgf1(seed, db_len);
        xor_in_place(&mut db, &db_mask);

        let mut masked_seed = *seed;
        let seed_mask = mgf1(&db, HASH_LEN);
        xor_in_place(&mut masked_seed, &seed_mask);

        let mut block = Vec::with_capacity(k);
        block.push(0x00);
        block.extend_from_slice(&masked_seed);
        block.extend_from_slice(&db);

        debug!("OAEP encoded {} bytes into a {}-byte block", message.len(), k);
        block
    }

    /// Recover the message from a `k`-byte block.
    ///
    /// Fails with [`RsaError::IntegrityError`] when the leading byte or the
    /// label hash is wrong, and with [`RsaError::PaddingError`] when no 0x01
    /// separator follows the zero padding.
    pub fn decode(&self, block: &[u8], k: usize) -> Result<Vec<u8>> {
        Self::max_message_len(k)?;
        if block.len() != k {
            return Err(RsaError::CiphertextLength {
                expected: k,
                actual: block.len(),
            });
        }

        let leading = block[0];
        let mut seed = block[1..=HASH_LEN].to_vec();
        let mut db = block[HASH_LEN + 1..].to_vec();

        let seed_mask = mgf1(&db, HASH_LEN);
        xor_in_place(&mut seed, &seed_mask);
        let db_mask = mgf1(&seed, db.len());
        xor_in_place(&mut db, &db_mask);

        // Both checks are folded so neither is evaluated on its own
        let label_diff = db[..HASH_LEN]
            .iter()
            .zip(&self.label_hash)
            .fold(leading, |acc, (a, b)| acc | (a ^ b));
        if label_diff != 0 {
            debug!("OAEP decode rejected: {}", crate::error::DECRYPTION_FAILED);
            return Err(RsaError::IntegrityError);
        }

        let rest = &db[HASH_LEN..];
        let separator = match rest.iter().position(|&b| b != 0x00) {
            Some(pos) if rest[pos] == 0x01 => pos,
            _ => {
                debug!("OAEP decode rejected: {}", crate::error::DECRYPTION_FAILED);
                return Err(RsaError::PaddingError);
            }
        };

        Ok(rest[separator + 1..].to_vec())
    }
}
