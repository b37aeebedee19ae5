//! Validated, fully buffered zip archive

use std::io::{Cursor, Read};

use zip::result::ZipError;
use zip::ZipArchive;

/// A zip archive held in memory
///
/// Construction parses the central directory, so a `TemplateArchive` is
/// always well-formed at the container level.
#[derive(Debug, Clone)]
pub struct TemplateArchive {
    inner: ZipArchive<Cursor<Vec<u8>>>,
}

/// A single file entry read from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full entry name inside the archive, `/`-separated
    pub name: String,
    /// Entry bytes
    pub data: Vec<u8>,
}

impl TemplateArchive {
    /// Parse zip bytes
    ///
    /// # Errors
    ///
    /// Returns a [`ZipError`] if the bytes are not a valid zip archive.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ZipError> {
        let inner = ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self { inner })
    }

    /// Number of entries, directories included
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the archive has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Read every non-directory entry, in archive order
    ///
    /// # Errors
    ///
    /// Returns an I/O error if an entry cannot be decompressed.
    pub fn file_entries(&mut self) -> std::io::Result<Vec<ArchiveEntry>> {
        self.file_entries_with_prefix(None)
    }

    /// Read the non-directory entries whose name starts with `prefix`
    ///
    /// Entries outside the prefix are never decompressed, so a damaged
    /// entry elsewhere in the archive does not affect the result.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a matching entry cannot be decompressed.
    pub fn file_entries_with_prefix(
        &mut self,
        prefix: Option<&str>,
    ) -> std::io::Result<Vec<ArchiveEntry>> {
        let mut entries = Vec::new();
        for index in 0..self.inner.len() {
            let mut file = self.inner.by_index(index)?;
            if file.is_dir() || prefix.is_some_and(|p| !file.name().starts_with(p)) {
                continue;
            }
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(ArchiveEntry {
                name: file.name().to_string(),
                data,
            });
        }
        Ok(entries)
    }
}
