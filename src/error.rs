// RSA Error Types
// One error enum shared by the codec, key generation, OAEP and the key store

use std::io;
use thiserror::Error;

/// Generic text reported for every cryptographic failure
pub const DECRYPTION_FAILED: &str = "decryption failed";

/// Errors produced by the RSA core and its key store boundary
#[derive(Debug, Error)]
pub enum RsaError {
    /// Integer does not fit into the requested number of bytes
    #[error("integer needs {required} bytes but only {length} are available")]
    EncodingError { length: usize, required: usize },

    #[error("key generation failed: {0}")]
    KeyGenError(String),

    #[error("message too long: max {max} bytes, got {length}")]
    MessageTooLong { length: usize, max: usize },

    /// Raw block integer is not smaller than the modulus
    #[error("block is not smaller than the modulus")]
    BlockTooLarge,

    /// OAEP label hash mismatch (tampering or wrong key)
    #[error("OAEP integrity check failed")]
    IntegrityError,

    #[error("malformed OAEP padding")]
    PaddingError,

    #[error("malformed key record: {0}")]
    KeyRecordParseError(String),

    #[error("invalid key size {bits}: must be a multiple of 8 and at least {min} bits")]
    InvalidKeySize { bits: u32, min: u32 },

    #[error("invalid ciphertext length: expected {expected} bytes, got {actual}")]
    CiphertextLength { expected: usize, actual: usize },

    #[error("key store: {0}")]
    KeyStore(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Coarse classification of an [`RsaError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Integrity or padding failure while decoding; must not be reported precisely
    Cryptographic,
    /// Size, encoding, configuration or storage mistakes made by the caller
    Usage,
}

impl RsaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RsaError::IntegrityError | RsaError::PaddingError => ErrorKind::Cryptographic,
            _ => ErrorKind::Usage,
        }
    }

    /// Message safe to show to a peer.
    ///
    /// Cryptographic failures collapse into [`DECRYPTION_FAILED`] so that a
    /// remote party cannot tell which OAEP check rejected the block.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Cryptographic => DECRYPTION_FAILED.to_string(),
            ErrorKind::Usage => self.to_string(),
        }
    }
}

/// Result type for RSA operations
pub type Result<T> = std::result::Result<T, RsaError>;
