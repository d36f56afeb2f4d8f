//! Page-level behaviour of archived files against a `Vec<u8>` model

use super::*;
use proptest::prelude::*;

const PAGES: usize = 8;

#[test]
fn test_last_write_wins() {
    let (_dir, volume) = mount(&[("a.mdf", patterned(CHUNK * PAGES))]);
    for round in 1..=3u8 {
        volume.write_file("a.mdf", &[round; CHUNK], CHUNK as u64).unwrap();
    }
    let mut buf = [0u8; CHUNK];
    volume.read_file("a.mdf", &mut buf, CHUNK as u64).unwrap();
    assert_eq!(buf, [3; CHUNK]);
}

#[test]
fn test_straddling_read_after_write_rejected() {
    let (_dir, volume) = mount(&[("a.mdf", patterned(CHUNK * PAGES))]);
    volume.write_file("a.mdf", &[1; CHUNK], CHUNK as u64).unwrap();

    let mut buf = [0u8; CHUNK];
    let err = volume.read_file("a.mdf", &mut buf, 8).unwrap_err();
    assert!(err.is_unsupported());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_volume_matches_model(
        writes in prop::collection::vec((0..PAGES, 1..=3usize, any::<u8>()), 0..12)
    ) {
        let base = patterned(CHUNK * PAGES);
        let (_dir, volume) = mount(&[("a.mdf", base.clone())]);
        let mut model = base;

        for (page, pages, fill) in writes {
            let pages = pages.min(PAGES - page);
            let data = vec![fill; pages * CHUNK];
            volume.write_file("a.mdf", &data, (page * CHUNK) as u64).unwrap();
            model[page * CHUNK..(page + pages) * CHUNK].copy_from_slice(&data);
        }

        let mut all = vec![0u8; CHUNK * PAGES];
        prop_assert_eq!(volume.read_file("a.mdf", &mut all, 0).unwrap(), CHUNK * PAGES);
        prop_assert_eq!(all, model);
    }
}
