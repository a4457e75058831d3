// RSA Encryption Implementation
// Raw public-key permutation and its OAEP composition

use rand::{CryptoRng, RngCore};

use super::bigint::{bytes_to_int, int_to_bytes, RsaBigInt};
use super::keygen::PublicKey;
use super::oaep::OaepCodec;
use crate::error::{Result, RsaError};

/// RSAEP: m^e mod n, for m < n
pub fn encrypt_block(m: &RsaBigInt, public_key: &PublicKey) -> Result<RsaBigInt> {
    if m >= public_key.modulus() {
        return Err(RsaError::BlockTooLarge);
    }
    Ok(m.modpow(public_key.exponent(), public_key.modulus()))
}

/// Encrypt a byte block without padding.
///
/// The block is read as a big-endian integer; the ciphertext is always
/// exactly `k` bytes.
pub fn encrypt_raw(block: &[u8], public_key: &PublicKey) -> Result<Vec<u8>> {
    let c = encrypt_block(&bytes_to_int(block), public_key)?;
    int_to_bytes(&c, public_key.modulus_len())
}

/// Encrypt bytes with OAEP padding (empty label)
pub fn encrypt_oaep<R>(plaintext: &[u8], public_key: &PublicKey, rng: &mut R) -> Result<Vec<u8>>
where
    R: CryptoRng + RngCore + ?Sized,
{
    encrypt_oaep_with(&OaepCodec::new(), plaintext, public_key, rng)
}

/// Encrypt bytes with OAEP padding using a specific codec (label)
pub fn encrypt_oaep_with<R>(
    codec: &OaepCodec,
    plaintext: &[u8],
    public_key: &PublicKey,
    rng: &mut R,
) -> Result<Vec<u8>>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let block = codec.encode(plaintext, public_key.modulus_len(), rng)?;
    encrypt_raw(&block, public_key)
}
