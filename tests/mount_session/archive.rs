//! Container handling through the facade

use super::*;
use bakmount::{FileOrigin, InMemorySource, StreamSource, VolumeError};
use std::io::Read;

#[test]
fn test_nested_entries_keep_their_path() {
    let (_dir, volume) = mount(&[
        ("data/sales.mdf", patterned(CHUNK * 4)),
        ("data/sales_2.ndf", patterned(CHUNK * 2)),
    ]);

    let files = volume.files();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.origin == FileOrigin::Archived));
    assert_eq!(volume.file_info("DATA/SALES.MDF").unwrap().length, 64);
}

#[test]
fn test_archive_unchanged_after_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("backup.tar");
    let original = patterned(CHUNK * 8);
    build_archive(&path, &[("a.mdf", original.clone())]);
    let before = std::fs::read(&path).unwrap();

    {
        let archive = TarArchive::open(&path).unwrap();
        let volume = Volume::from_source(&archive, VolumeConfig::for_testing()).unwrap();
        for page in 0..8u64 {
            volume.write_file("a.mdf", &[0xEE; CHUNK], page * CHUNK as u64).unwrap();
        }
        volume.create_file("a_log.ldf").unwrap();
        volume.write_file("a_log.ldf", &[1; 100], 0).unwrap();
    }

    assert_eq!(std::fs::read(&path).unwrap(), before);

    let mut streams = TarArchive::open(&path).unwrap().streams().unwrap();
    let mut content = Vec::new();
    streams[0].stream.read_to_end(&mut content).unwrap();
    assert_eq!(content, original);
}

#[test]
fn test_two_volumes_over_one_source_are_independent() {
    let source = InMemorySource::new().with_file("a.mdf", vec![0; CHUNK * 2]);
    let first = Volume::from_source(&source, VolumeConfig::for_testing()).unwrap();
    let second = Volume::from_source(&source, VolumeConfig::for_testing()).unwrap();

    first.write_file("a.mdf", &[7; CHUNK], 0).unwrap();

    let mut buf = [0xFFu8; CHUNK];
    second.read_file("a.mdf", &mut buf, 0).unwrap();
    assert_eq!(buf, [0; CHUNK]);
}

#[test]
fn test_missing_container() {
    let dir = TempDir::new().unwrap();
    let err = TarArchive::open(dir.path().join("missing.tar")).unwrap_err();
    let err: VolumeError = err.into();
    assert!(matches!(err, VolumeError::Archive(_)));
}
