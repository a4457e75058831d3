// Utilities
// Key persistence behind the KeyStore capability

pub mod key_store;

pub use key_store::{load_key_pair, store_key_pair, FileKeyStore, KeyStore, MemoryKeyStore};
