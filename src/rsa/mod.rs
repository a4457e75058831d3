// RSA Module - Main module file
// Exports key generation, OAEP encryption and signatures

pub mod bigint;
pub mod config;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod mgf;
pub mod oaep;
pub mod prime;
pub mod record;
pub mod signature;

pub use bigint::{bytes_to_int, int_to_bytes, mod_inverse, RsaBigInt};
pub use config::{KeyGenConfig, PublicExponent, DEFAULT_KEY_SIZE, MIN_KEY_SIZE};
pub use decrypt::{decrypt_block, decrypt_oaep, decrypt_oaep_with, decrypt_raw};
pub use encrypt::{encrypt_block, encrypt_oaep, encrypt_oaep_with, encrypt_raw};
pub use keygen::{generate_key_pair, KeyGenerator, KeyPair, PrivateKey, PublicKey};
pub use mgf::{mgf1, HASH_LEN};
pub use oaep::OaepCodec;
pub use prime::PrimalityTester;
pub use record::KeyRecord;
pub use signature::{sign, verify};
