//! Zip container access
//!
//! The whole archive is decompressed into memory once and indexed by entry
//! path, so later lookups are plain map reads.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use zip::ZipArchive;

use super::error::{EpubError, EpubResult};

/// An opened EPUB archive
#[derive(Debug, Default)]
pub struct EpubArchive {
    entries: HashMap<String, Vec<u8>>,
}

impl EpubArchive {
    /// Open an archive from raw bytes
    pub fn from_bytes(data: &[u8]) -> EpubResult<Self> {
        Self::from_reader(Cursor::new(data))
    }

    /// Open an archive from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> EpubResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().to_string();
            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content).map_err(|e| {
                EpubError::FileFormat(format!("Failed to decompress '{}': {}", name, e))
            })?;
            entries.insert(name, content);
        }

        tracing::debug!("Indexed {} archive entries", entries.len());
        Ok(Self { entries })
    }

    /// Raw bytes of an entry
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Entry decoded as UTF-8 (invalid sequences replaced)
    pub fn read_string(&self, path: &str) -> Option<String> {
        self.get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
