//! Persistent storage for keys and IVs
//!
//! Entries are addressed by a [`KeyId`] (mode, key size, key or IV) rather
//! than by file name. [`FsKeyStore`] maps ids onto the `{mode}_{kind}_{bits}.bin`
//! naming convention, e.g. `ecb_key_128.bin`, `cbc_key_256.bin` and its
//! matching `cbc_iv_256.bin`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::key::{KeyMaterial, KeySize};
use crate::modes::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyKind {
    Key,
    Iv,
}

impl KeyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyKind::Key => "key",
            KeyKind::Iv => "iv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId {
    pub mode: Mode,
    pub size: KeySize,
    pub kind: KeyKind,
}

impl KeyId {
    pub fn key(mode: Mode, size: KeySize) -> Self {
        Self {
            mode,
            size,
            kind: KeyKind::Key,
        }
    }

    pub fn iv(mode: Mode, size: KeySize) -> Self {
        Self {
            mode,
            size,
            kind: KeyKind::Iv,
        }
    }

    /// The IV entry paired with this key.
    pub fn iv_for(&self) -> Self {
        Self::iv(self.mode, self.size)
    }

    pub fn file_name(&self) -> String {
        format!("{}_{}_{}.bin", self.mode, self.kind.as_str(), self.size.bits())
    }

    /// Inverse of [`KeyId::file_name`]. Returns `None` for unrelated files.
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".bin")?;
        let mut parts = stem.splitn(3, '_');

        let mode = parts.next()?.parse().ok()?;
        let kind = match parts.next()? {
            "key" => KeyKind::Key,
            "iv" => KeyKind::Iv,
            _ => return None,
        };
        let size = KeySize::from_bits(parts.next()?.parse().ok()?).ok()?;

        // "CBC_key_128.bin" or "ecb_key_0128.bin" would parse to an id whose
        // file does not exist under that name.
        let id = Self { mode, size, kind };
        (id.file_name() == file_name).then_some(id)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Byte-blob store for key material.
pub trait KeyStore {
    fn put(&mut self, id: &KeyId, bytes: &[u8]) -> Result<(), StoreError>;

    fn get(&self, id: &KeyId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Key entries (never IVs) stored for `mode`, sorted by key size.
    fn list(&self, mode: Mode) -> Result<Vec<KeyId>, StoreError>;
}

/// Persist a key and, for CBC, its IV. Returns the ids written.
pub fn save_material<S: KeyStore + ?Sized>(
    store: &mut S,
    material: &KeyMaterial,
) -> Result<Vec<KeyId>, StoreError> {
    let key_id = KeyId::key(material.mode, material.size);
    store.put(&key_id, material.key())?;
    let mut written = vec![key_id];

    if let Some(iv) = material.iv() {
        let iv_id = key_id.iv_for();
        store.put(&iv_id, iv)?;
        written.push(iv_id);
    }

    info!(mode = %material.mode, bits = material.size.bits(), "saved key material");
    Ok(written)
}

/// Load the key for `mode`/`size`, plus its paired IV for CBC.
pub fn load_material<S: KeyStore + ?Sized>(
    store: &S,
    mode: Mode,
    size: KeySize,
) -> Result<KeyMaterial, StoreError> {
    let key_id = KeyId::key(mode, size);
    let key = store
        .get(&key_id)?
        .ok_or_else(|| StoreError::MissingKey(key_id.file_name()))?;

    let iv = if mode.requires_iv() {
        let iv_id = key_id.iv_for();
        let iv = store
            .get(&iv_id)?
            .ok_or_else(|| StoreError::MissingIv(iv_id.file_name()))?;
        Some(iv)
    } else {
        None
    };

    Ok(KeyMaterial::from_stored(mode, size, key, iv))
}

/// Stores each entry as a raw binary file in one directory.
#[derive(Debug, Clone)]
pub struct FsKeyStore {
    dir: PathBuf,
}

impl FsKeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, id: &KeyId) -> PathBuf {
        self.dir.join(id.file_name())
    }
}

impl KeyStore for FsKeyStore {
    fn put(&mut self, id: &KeyId, bytes: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(id);
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), "wrote key file");
        Ok(())
    }

    fn get(&self, id: &KeyId) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, mode: Mode) -> Result<Vec<KeyId>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(id) = name.to_str().and_then(KeyId::parse) {
                if id.mode == mode && id.kind == KeyKind::Key {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// In-memory store, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyStore {
    entries: BTreeMap<KeyId, Vec<u8>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn put(&mut self, id: &KeyId, bytes: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(*id, bytes.to_vec());
        Ok(())
    }

    fn get(&self, id: &KeyId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(id).cloned())
    }

    fn list(&self, mode: Mode) -> Result<Vec<KeyId>, StoreError> {
        Ok(self
            .entries
            .keys()
            .filter(|id| id.mode == mode && id.kind == KeyKind::Key)
            .copied()
            .collect())
    }
}
