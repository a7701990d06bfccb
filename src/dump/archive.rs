//! In-memory zip archive builder
//!
//! Each dump invocation exclusively owns one builder; the archive bytes
//! materialize only when [`ArchiveBuilder::finish`] consumes it, so a
//! failed workflow never exposes a partial file.

use crate::core::types::ClientResult;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Builds a zip archive in memory, one entry at a time
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entry_count: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        ArchiveBuilder {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entry_count: 0,
        }
    }

    /// Adds one file entry under the given archive path
    pub fn add_entry(&mut self, path: &str, bytes: &[u8]) -> ClientResult<()> {
        self.writer.start_file(path, FileOptions::default())?;
        self.writer.write_all(bytes)?;
        self.entry_count += 1;
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Finalizes the archive and returns its bytes
    pub fn finish(mut self) -> ClientResult<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        ArchiveBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_build_and_read_back() {
        let mut builder = ArchiveBuilder::new();
        builder.add_entry("dir/a.bin", b"hello").unwrap();
        builder.add_entry("dir/b.bin", &[0u8; 64]).unwrap();
        assert_eq!(builder.entry_count(), 2);

        let bytes = builder.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = String::new();
        archive
            .by_name("dir/a.bin")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "hello");
    }

    #[test]
    fn test_empty_archive() {
        let builder = ArchiveBuilder::new();
        assert_eq!(builder.entry_count(), 0);
        let bytes = builder.finish().unwrap();

        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
