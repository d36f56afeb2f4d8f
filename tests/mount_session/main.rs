//! Mount Session Test Suite
//!
//! End-to-end coverage through the public `bakmount` facade: a container is
//! opened, its data files are mounted as a volume and driven the way a
//! database host would drive them.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test mount_session
//!
//! # Page-level properties only
//! cargo test --test mount_session pages::
//! ```

use std::path::Path;

use bakmount::{TarArchive, Volume, VolumeConfig};
use tempfile::TempDir;

mod archive;
mod pages;

/// Chunk size used by the suite (`StorageConfig::for_testing`)
pub const CHUNK: usize = 16;

/// Write a tar archive holding `files` to `path`
pub fn build_archive(path: &Path, files: &[(&str, Vec<u8>)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut builder = tar::Builder::new(file);
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, data.as_slice()).unwrap();
    }
    builder.into_inner().unwrap();
}

/// Backing bytes whose byte at offset `i` is `i as u8`
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

/// Mount `files` from a fresh tar archive with the testing chunk size
pub fn mount(files: &[(&str, Vec<u8>)]) -> (TempDir, Volume) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("backup.tar");
    build_archive(&path, files);
    let archive = TarArchive::open(&path).unwrap();
    let volume = Volume::from_source(&archive, VolumeConfig::for_testing()).unwrap();
    (dir, volume)
}
