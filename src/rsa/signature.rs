// RSA Signatures
// Textbook RSA over a SHA3-512 digest: s = H(m)^d mod n

use log::debug;
use sha3::{Digest, Sha3_512};

use super::bigint::{bytes_to_int, RsaBigInt};
use super::decrypt::decrypt_block;
use super::encrypt::encrypt_block;
use super::keygen::{PrivateKey, PublicKey};
use crate::error::Result;

/// Digest length of the signing hash in bytes
pub const DIGEST_LEN: usize = 64;

/// SHA3-512 digest of `message` read as a big-endian integer
pub fn digest(message: &[u8]) -> RsaBigInt {
    bytes_to_int(&Sha3_512::digest(message))
}

/// Sign `message` with the private exponent.
///
/// Fails with [`RsaError::BlockTooLarge`](crate::RsaError::BlockTooLarge)
/// when the digest is not smaller than the modulus.
pub fn sign(message: &[u8], private_key: &PrivateKey) -> Result<RsaBigInt> {
    decrypt_block(&digest(message), private_key)
}

/// Check `signature` against `message` with the public exponent
pub fn verify(signature: &RsaBigInt, message: &[u8], public_key: &PublicKey) -> bool {
    let recovered = match encrypt_block(signature, public_key) {
        Ok(recovered) => recovered,
        Err(_) => {
            debug!("signature is not smaller than the modulus");
            return false;
        }
    };

    let valid = recovered == digest(message);
    if !valid {
        debug!("signature does not match message digest");
    }
    valid
}
