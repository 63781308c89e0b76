// filepath: src/registry.rs
//! Single-shot registry
//!
//! Remembers which showcase identifiers were already presented so a
//! showcase configured with one is shown at most once. `show()` reads the
//! registry before presenting and writes it afterwards.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to access registry file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed registry file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub trait SingleShotRegistry {
    fn is_recorded(&self, id: i64) -> bool;
    fn record(&mut self, id: i64) -> Result<(), RegistryError>;
}

/// Registry that lives as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemoryRegistry {
    shown: HashSet<i64>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SingleShotRegistry for MemoryRegistry {
    fn is_recorded(&self, id: i64) -> bool {
        self.shown.contains(&id)
    }

    fn record(&mut self, id: i64) -> Result<(), RegistryError> {
        self.shown.insert(id);
        Ok(())
    }
}

/// Registry persisted as a TOML table of `showcase-<id> = true` flags
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    flags: BTreeMap<String, bool>,
}

fn key(id: i64) -> String {
    format!("showcase-{id}")
}

impl FileRegistry {
    /// Default location under the user's data directory
    pub fn default_path() -> PathBuf {
        let data_dir = if let Some(data_dir) = dirs::data_dir() {
            data_dir.join("hypr-showcase")
        } else {
            PathBuf::from(".local/share/hypr-showcase")
        };
        data_dir.join("shown.toml")
    }

    /// Open the registry at `path`; a missing file is an empty registry.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();
        let flags = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|source| RegistryError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(RegistryError::Io { path, source }),
        };
        Ok(Self { path, flags })
    }

    /// Like [`FileRegistry::open`], but an unreadable or malformed file
    /// yields an empty registry. The next record rewrites the file.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::open(path.clone()).unwrap_or_else(|e| {
            log::warn!("{e}; starting with an empty registry");
            Self {
                path,
                flags: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), RegistryError> {
        let io_err = |source: std::io::Error| RegistryError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let content = toml::to_string_pretty(&self.flags)?;
        fs::write(&self.path, content).map_err(io_err)
    }
}

impl SingleShotRegistry for FileRegistry {
    fn is_recorded(&self, id: i64) -> bool {
        self.flags.get(&key(id)).copied().unwrap_or(false)
    }

    fn record(&mut self, id: i64) -> Result<(), RegistryError> {
        if self.is_recorded(id) {
            return Ok(());
        }
        self.flags.insert(key(id), true);
        self.save()
    }
}
