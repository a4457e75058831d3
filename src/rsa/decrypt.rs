// RSA Decryption Implementation
// Raw private-key permutation and OAEP decoding

use super::bigint::{bytes_to_int, int_to_bytes, RsaBigInt};
use super::keygen::PrivateKey;
use super::oaep::OaepCodec;
use crate::error::{Result, RsaError};

/// RSADP: c^d mod n, for c < n
pub fn decrypt_block(c: &RsaBigInt, private_key: &PrivateKey) -> Result<RsaBigInt> {
    if c >= private_key.modulus() {
        return Err(RsaError::BlockTooLarge);
    }
    Ok(c.modpow(private_key.exponent(), private_key.modulus()))
}

/// Decrypt a `k`-byte ciphertext without removing any padding
pub fn decrypt_raw(ciphertext: &[u8], private_key: &PrivateKey) -> Result<Vec<u8>> {
    // Validate ciphertext size
    let key_bytes = private_key.modulus_len();
    if ciphertext.len() != key_bytes {
        return Err(RsaError::CiphertextLength {
            expected: key_bytes,
            actual: ciphertext.len(),
        });
    }

    let m = decrypt_block(&bytes_to_int(ciphertext), private_key)?;
    int_to_bytes(&m, key_bytes)
}

/// Decrypt an OAEP ciphertext (empty label)
pub fn decrypt_oaep(ciphertext: &[u8], private_key: &PrivateKey) -> Result<Vec<u8>> {
    decrypt_oaep_with(&OaepCodec::new(), ciphertext, private_key)
}

/// Decrypt an OAEP ciphertext using a specific codec (label)
pub fn decrypt_oaep_with(
    codec: &OaepCodec,
    ciphertext: &[u8],
    private_key: &PrivateKey,
) -> Result<Vec<u8>> {
    let block = decrypt_raw(ciphertext, private_key)?;
    codec.decode(&block, private_key.modulus_len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::config::KeyGenConfig;
    use crate::rsa::encrypt::{encrypt_oaep, encrypt_oaep_with, encrypt_raw};
    use crate::rsa::keygen::{KeyGenerator, KeyPair, PublicKey};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn keypair(seed: u64) -> KeyPair {
        KeyGenerator::new(KeyGenConfig::new(264))
            .unwrap()
            .generate(&mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    #[test]
    fn test_decrypt_block_textbook() {
        // n = 61 * 53, d = 2753
        let key = PrivateKey::new(from_u64(3233), from_u64(2753));
        assert_eq!(decrypt_block(&from_u64(2790), &key).unwrap(), from_u64(65));
        assert!(matches!(
            decrypt_block(&from_u64(4000), &key),
            Err(RsaError::BlockTooLarge)
        ));
    }

    #[test]
    fn test_raw_roundtrip() {
        let pair = keypair(21);
        let block = [0x00, 0x00, 0x12, 0x34, 0x56];
        let ciphertext = encrypt_raw(&block, pair.public_key()).unwrap();
        let plain = decrypt_raw(&ciphertext, pair.private_key()).unwrap();

        assert_eq!(plain.len(), 66);
        assert_eq!(bytes_to_int(&plain), bytes_to_int(&block));
    }

    #[test]
    fn test_decrypt_oaep() {
        let pair = keypair(22);
        let mut rng = StdRng::seed_from_u64(23);
        let message = b"Hello, RSA!";

        let ciphertext = encrypt_oaep(message, pair.public_key(), &mut rng).unwrap();
        let decrypted = decrypt_oaep(&ciphertext, pair.private_key()).unwrap();
        assert_eq!(message.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_decrypt_with_label() {
        let pair = keypair(24);
        let mut rng = StdRng::seed_from_u64(25);
        let codec = OaepCodec::with_label(b"session");

        let ciphertext = encrypt_oaep_with(&codec, b"key", pair.public_key(), &mut rng).unwrap();
        assert_eq!(decrypt_oaep_with(&codec, &ciphertext, pair.private_key()).unwrap(), b"key");
        assert!(matches!(
            decrypt_oaep(&ciphertext, pair.private_key()),
            Err(RsaError::IntegrityError)
        ));
    }

    #[test]
    fn test_decrypt_invalid_size() {
        let pair = keypair(26);
        let result = decrypt_oaep(&[0u8; 10], pair.private_key());
        assert!(matches!(
            result,
            Err(RsaError::CiphertextLength { expected: 66, actual: 10 })
        ));
    }

    #[test]
    fn test_decrypt_ciphertext_above_modulus() {
        let pair = keypair(27);
        let result = decrypt_raw(&[0xff; 66], pair.private_key());
        assert!(matches!(result, Err(RsaError::BlockTooLarge)));
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let first = keypair(28);
        let second = keypair(29);
        let mut rng = StdRng::seed_from_u64(30);

        let ciphertext = encrypt_oaep(b"Test", first.public_key(), &mut rng).unwrap();
        let err = match decrypt_oaep(&ciphertext, second.private_key()) {
            Err(err) => err,
            Ok(_) => panic!("decrypted with the wrong key"),
        };
        // A ciphertext above the other modulus is a usage error, anything else must be opaque
        if !matches!(err, RsaError::BlockTooLarge) {
            assert_eq!(err.kind(), ErrorKind::Cryptographic);
        }
    }

    #[test]
    fn test_decrypt_rejects_forged_block() {
        let pair = keypair(31);
        let forged = encrypt_raw(&[0x00, 0x01, 0x02], pair.public_key()).unwrap();
        let err = decrypt_oaep(&forged, pair.private_key()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cryptographic);
    }

    #[test]
    fn test_decrypt_raw_matches_public_operation() {
        let pair = keypair(32);
        let public = PublicKey::new(
            pair.public_key().modulus().clone(),
            pair.public_key().exponent().clone(),
        );
        let ciphertext = encrypt_raw(&[0x2a; 40], &public).unwrap();
        let plain = decrypt_raw(&ciphertext, pair.private_key()).unwrap();
        assert_eq!(&plain[26..], &[0x2a; 40][..]);
        assert!(plain[..26].iter().all(|&b| b == 0));
    }
}
