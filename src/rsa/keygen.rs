// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;

use log::debug;
use num_bigint::RandBigInt;
use num_traits::One;
use rand::{CryptoRng, RngCore};

use super::bigint::{byte_len, from_u64, gcd, mod_inverse, RsaBigInt};
use super::config::{KeyGenConfig, PublicExponent};
use super::oaep::OaepCodec;
use super::prime::PrimalityTester;
use crate::error::{Result, RsaError};

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    n: RsaBigInt, // Modulus
    e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    n: RsaBigInt, // Modulus (same as public)
    d: RsaBigInt, // Private exponent
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone)]
pub struct KeyPair {
    public_key: PublicKey,
    private_key: PrivateKey,
    key_size: u32,
}

impl PublicKey {
    /// Build a key from raw parts without checking they form a valid RSA key
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> Self {
        Self { n, e }
    }

    pub fn modulus(&self) -> &RsaBigInt {
        &self.n
    }

    pub fn exponent(&self) -> &RsaBigInt {
        &self.e
    }

    /// Modulus length `k` in bytes
    pub fn modulus_len(&self) -> usize {
        byte_len(&self.n)
    }

    /// Prime size in bits this modulus was generated from
    pub fn key_size(&self) -> u32 {
        (self.modulus_len() * 4) as u32
    }

    /// Largest plaintext accepted by OAEP encryption under this key
    pub fn max_message_len(&self) -> Result<usize> {
        OaepCodec::max_message_len(self.modulus_len())
    }

    /// Encrypt a message with OAEP padding under this key
    pub fn encrypt<R>(&self, plaintext: &[u8], rng: &mut R) -> Result<Vec<u8>>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        super::encrypt::encrypt_oaep(plaintext, self, rng)
    }

    /// Check a signature produced by the matching private key
    pub fn verify(&self, signature: &RsaBigInt, message: &[u8]) -> bool {
        super::signature::verify(signature, message, self)
    }
}

impl PrivateKey {
    /// Build a key from raw parts without checking they form a valid RSA key
    pub fn new(n: RsaBigInt, d: RsaBigInt) -> Self {
        Self { n, d }
    }

    pub fn modulus(&self) -> &RsaBigInt {
        &self.n
    }

    pub fn exponent(&self) -> &RsaBigInt {
        &self.d
    }

    /// Modulus length `k` in bytes
    pub fn modulus_len(&self) -> usize {
        byte_len(&self.n)
    }

    pub fn key_size(&self) -> u32 {
        (self.modulus_len() * 4) as u32
    }

    /// Decrypt an OAEP ciphertext produced under the matching public key
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        super::decrypt::decrypt_oaep(ciphertext, self)
    }

    /// Sign the SHA3-512 digest of `message`
    pub fn sign(&self, message: &[u8]) -> Result<RsaBigInt> {
        super::signature::sign(message, self)
    }
}

// d stays out of logs and panic messages
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("n", &self.n)
            .field("d", &"<redacted>")
            .finish()
    }
}

impl KeyPair {
    /// Pair two keys sharing the same modulus
    pub fn new(public_key: PublicKey, private_key: PrivateKey) -> Result<Self> {
        if public_key.n != private_key.n {
            return Err(RsaError::KeyGenError(
                "public and private key moduli differ".to_string(),
            ));
        }
        let key_size = public_key.key_size();
        Ok(Self {
            public_key,
            private_key,
            key_size,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Bit length of each prime factor
    pub fn key_size(&self) -> u32 {
        self.key_size
    }

    pub fn into_keys(self) -> (PublicKey, PrivateKey) {
        (self.public_key, self.private_key)
    }
}

/// Raw key material, including the factors
struct KeyMaterial {
    p: RsaBigInt,
    q: RsaBigInt,
    n: RsaBigInt,
    e: RsaBigInt,
    d: RsaBigInt,
}

impl KeyMaterial {
    /// n = p * q and e * d ≡ 1 (mod φ(n))
    fn is_consistent(&self) -> bool {
        let phi = (&self.p - 1u8) * (&self.q - 1u8);
        self.n == &self.p * &self.q && ((&self.e * &self.d) % &phi).is_one()
    }
}

/// Generates RSA key pairs from two random primes of `key_size` bits
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    config: KeyGenConfig,
    tester: PrimalityTester,
}

impl KeyGenerator {
    pub fn new(config: KeyGenConfig) -> Result<Self> {
        config.validate()?;
        let tester = PrimalityTester::new(config.rounds);
        Ok(Self { config, tester })
    }

    pub fn config(&self) -> &KeyGenConfig {
        &self.config
    }

    /// Generate a key pair drawing all randomness from `rng`
    pub fn generate<R>(&self, rng: &mut R) -> Result<KeyPair>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let material = self.generate_material(rng)?;
        if !material.is_consistent() {
            return Err(RsaError::KeyGenError(
                "generated exponents do not invert modulo φ(n)".to_string(),
            ));
        }
        Ok(KeyPair {
            public_key: PublicKey::new(material.n.clone(), material.e),
            private_key: PrivateKey::new(material.n, material.d),
            key_size: self.config.key_size,
        })
    }

    fn generate_material<R>(&self, rng: &mut R) -> Result<KeyMaterial>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let bits = self.config.key_size;

        let (p, q, phi, e) = loop {
            // Step 1: Generate two distinct random primes p and q
            let p = self.tester.random_prime(bits, rng);
            let q = self.tester.random_prime(bits, rng);
            if p == q {
                debug!("drew p == q, retrying");
                continue;
            }

            // Step 2: Compute φ(n) = (p-1)(q-1)
            let phi = (&p - 1u8) * (&q - 1u8);

            // Step 3: Pick e coprime with φ(n)
            match self.config.exponent {
                PublicExponent::Random => {
                    let e = draw_exponent(bits, &phi, rng);
                    break (p, q, phi, e);
                }
                PublicExponent::Fixed(value) => {
                    let e = from_u64(value);
                    if gcd(&e, &phi).is_one() {
                        break (p, q, phi, e);
                    }
                    debug!("e={} shares a factor with φ(n), redrawing primes", value);
                }
            }
        };

        // Step 4: Compute n = p * q
        let n = &p * &q;

        // Step 5: Compute d = e^(-1) mod φ(n)
        let d = mod_inverse(&e, &phi).ok_or_else(|| {
            RsaError::KeyGenError("public exponent has no inverse modulo φ(n)".to_string())
        })?;

        debug!("generated {}-bit modulus from {}-bit primes", n.bits(), bits);
        Ok(KeyMaterial { p, q, n, e, d })
    }
}

/// Draw e uniformly from [2^(bits-1), 2^bits) until gcd(e, φ) = 1
fn draw_exponent<R>(bits: u32, phi: &RsaBigInt, rng: &mut R) -> RsaBigInt
where
    R: CryptoRng + RngCore + ?Sized,
{
    let lower = RsaBigInt::one() << (bits - 1);
    let upper = RsaBigInt::one() << bits;
    let mut draws = 0u32;

    loop {
        draws += 1;
        let e = rng.gen_biguint_range(&lower, &upper);
        if gcd(&e, phi).is_one() {
            debug!("public exponent accepted after {} draws", draws);
            return e;
        }
    }
}

/// Generate an RSA key pair with `key_size`-bit primes using the thread-local CSPRNG
pub fn generate_key_pair(key_size: u32) -> Result<KeyPair> {
    KeyGenerator::new(KeyGenConfig::new(key_size))?.generate(&mut rand::thread_rng())
}
