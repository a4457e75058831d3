//! RSA key generation, OAEP encryption and textbook RSA signatures.
//!
//! Keys come from [`KeyGenerator`] (or [`generate_key_pair`]), messages are
//! encrypted with [`encrypt_oaep`] / [`decrypt_oaep`], and SHA3-512 digests
//! are signed with [`sign`] / [`verify`]. Every operation that needs
//! randomness takes the generator as an argument.

pub mod error;
pub mod rsa;
pub mod util;

pub use error::{ErrorKind, Result, RsaError};
pub use rsa::{
    decrypt_oaep, encrypt_oaep, generate_key_pair, sign, verify, KeyGenConfig, KeyGenerator,
    KeyPair, KeyRecord, OaepCodec, PrivateKey, PublicExponent, PublicKey, RsaBigInt,
};
pub use util::{FileKeyStore, KeyStore, MemoryKeyStore};
