use super::*;
use tempfile::tempdir;

#[test]
fn in_memory_image_starts_erased() {
    let img = Image::in_memory(16);
    assert!(img.fresh);
    assert!(img.path().is_none());
    assert!(img.memory().iter().all(|&b| b == ERASED));
}

#[test]
fn read_and_write_clamp_to_image_length() {
    let mut img = Image::in_memory(8);
    assert_eq!(img.write_at(6, &[1, 2, 3, 4]), 2);
    let mut buf = [0u8; 4];
    assert_eq!(img.read_at(6, &mut buf), 2);
    assert_eq!(&buf[..2], &[1, 2]);
    assert_eq!(img.write_at(8, &[9]), 0);
    assert_eq!(img.read_at(100, &mut buf), 0);
}

#[test]
fn new_mapped_image_is_erased_and_sized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("channel-0.img");
    let img = Image::open_prealloc(&path, 2048).unwrap();

    assert!(img.fresh);
    assert_eq!(img.len(), 2048);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 2048);
    assert!(img.memory().iter().all(|&b| b == ERASED));
}

#[test]
fn mapped_image_persists_across_opens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("channel-1.img");
    {
        let mut img = Image::open_prealloc(&path, 64).unwrap();
        img.write_at(10, &[0xCD, 0xAB]);
        img.flush().unwrap();
    }

    let img = Image::open_prealloc(&path, 64).unwrap();
    assert!(!img.fresh);
    let mut buf = [0u8; 3];
    img.read_at(10, &mut buf);
    assert_eq!(buf, [0xCD, 0xAB, ERASED]);
}

#[test]
fn grown_image_erases_new_tail() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("channel-2.img");
    std::fs::write(&path, [0u8; 4]).unwrap();

    let img = Image::open_prealloc(&path, 8).unwrap();
    assert!(!img.fresh);
    assert_eq!(img.memory(), &[0, 0, 0, 0, ERASED, ERASED, ERASED, ERASED]);
}
