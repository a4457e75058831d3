// Key Storage
// Named key records kept in memory or as base64 files in a directory

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Result, RsaError};
use crate::rsa::{KeyPair, KeyRecord};

/// Storage for key records addressed by name
pub trait KeyStore {
    fn put(&mut self, name: &str, record: &KeyRecord) -> Result<()>;

    fn get(&self, name: &str) -> Result<KeyRecord>;
}

/// Store both halves of `pair` as `<name>_public` and `<name>_private`
pub fn store_key_pair<S: KeyStore + ?Sized>(store: &mut S, name: &str, pair: &KeyPair) -> Result<()> {
    let (public, private) = pair.to_records();
    store.put(&format!("{}_public", name), &public)?;
    store.put(&format!("{}_private", name), &private)
}

/// Load a pair previously written by [`store_key_pair`]
pub fn load_key_pair<S: KeyStore + ?Sized>(store: &S, name: &str) -> Result<KeyPair> {
    let public = store.get(&format!("{}_public", name))?;
    let private = store.get(&format!("{}_private", name))?;
    KeyPair::from_records(&public, &private)
}

/// In-memory key store
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyStore {
    records: HashMap<String, KeyRecord>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KeyStore for MemoryKeyStore {
    fn put(&mut self, name: &str, record: &KeyRecord) -> Result<()> {
        self.records.insert(name.to_string(), record.clone());
        Ok(())
    }

    fn get(&self, name: &str) -> Result<KeyRecord> {
        self.records
            .get(name)
            .cloned()
            .ok_or_else(|| RsaError::KeyStore(format!("no key named `{}`", name)))
    }
}

/// Directory-backed key store: one base64 record per `<dir>/<name>.txt`
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RsaError::KeyStore(format!("invalid key name `{}`", name)));
        }
        Ok(self.dir.join(format!("{}.txt", name)))
    }
}

impl KeyStore for FileKeyStore {
    fn put(&mut self, name: &str, record: &KeyRecord) -> Result<()> {
        let path = self.path_for(name)?;
        write_file(&path, record.to_base64().as_bytes())?;
        debug!("stored key `{}` at {}", name, path.display());
        Ok(())
    }

    fn get(&self, name: &str) -> Result<KeyRecord> {
        let path = self.path_for(name)?;
        let data = match read_file(&path) {
            Ok(data) => data,
            Err(RsaError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(RsaError::KeyStore(format!("no key named `{}`", name)));
            }
            Err(e) => return Err(e),
        };

        let text = String::from_utf8(data)
            .map_err(|_| RsaError::KeyRecordParseError("record is not UTF-8".to_string()))?;
        KeyRecord::parse(&text)
    }
}

/// Read entire file into memory
fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}

/// Write data to file, replacing any previous content
fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    Ok(())
}
