use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};

use zsr::{ZsrError, ZsrReader};

fn deterministic_bytes(len: usize) -> Vec<u8> {
    // A small LCG, not `rand` — good enough to make a "large" file that
    // isn't trivially compressible, without adding a dependency the
    // rest of the crate doesn't otherwise need.
    let mut state: u64 = 0x2545F4914F6CDD1D;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((state >> 33) as u8);
    }
    out
}

#[test]
fn s1_round_trip_and_subtree_extract() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"hello").unwrap();
    fs::create_dir(src.path().join("b")).unwrap();
    fs::write(src.path().join("b/c.txt"), b"world").unwrap();
    fs::create_dir(src.path().join("b/empty")).unwrap();

    let archive_path = src.path().join("archive.zsr");
    zsr::create(src.path(), &archive_path).unwrap();

    let mut reader = ZsrReader::open(&archive_path).unwrap();
    assert!(reader.exists("a.txt"));
    assert!(!reader.exists("b"));
    assert!(!reader.exists("b/empty"));
    assert_eq!(reader.get_file("a.txt").unwrap(), b"hello");

    let out = src.path().join("out");
    reader.extract_subtree("b", &out).unwrap();
    assert_eq!(fs::read(out.join("c.txt")).unwrap(), b"world");
    assert!(out.join("empty").is_dir());
    assert_eq!(fs::read_dir(out.join("empty")).unwrap().count(), 0);
}

#[test]
fn s2_large_file_round_trips() {
    let src = tempfile::tempdir().unwrap();
    let data = deterministic_bytes(512 * 1024);
    fs::write(src.path().join("blob.bin"), &data).unwrap();

    let archive_path = src.path().join("archive.zsr");
    zsr::create(src.path(), &archive_path).unwrap();

    let mut reader = ZsrReader::open(&archive_path).unwrap();
    assert_eq!(reader.get_file("blob.bin").unwrap(), data);

    let archive_size = fs::metadata(&archive_path).unwrap().len();
    assert!(archive_size > 12);
}

#[test]
fn s3_empty_directory_has_minimal_index() {
    let src = tempfile::tempdir().unwrap();
    let archive_path = src.path().join("archive.zsr");
    zsr::create(src.path(), &archive_path).unwrap();

    let mut file = fs::File::open(&archive_path).unwrap();
    let mut header = [0u8; 12];
    file.read_exact(&mut header).unwrap();
    let idx_start = u64::from_le_bytes(header[4..12].try_into().unwrap());
    assert_eq!(idx_start, 12);

    file.seek(SeekFrom::Start(idx_start)).unwrap();
    let mut compressed = Vec::new();
    file.read_to_end(&mut compressed).unwrap();
    let plaintext = {
        let mut out = Vec::new();
        lzma_rs::lzma_decompress(&mut std::io::Cursor::new(&compressed), &mut out).unwrap();
        out
    };
    assert!(plaintext.is_empty());
}

#[test]
fn s4_flipped_magic_is_rejected() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"hello").unwrap();
    let archive_path = src.path().join("archive.zsr");
    zsr::create(src.path(), &archive_path).unwrap();

    let mut bytes = fs::read(&archive_path).unwrap();
    bytes[0] = b'?';
    fs::write(&archive_path, &bytes).unwrap();

    let err = ZsrReader::open(&archive_path).unwrap_err();
    assert_eq!(err.to_string(), "Bad magic number");
}

#[test]
fn s5_truncated_header_is_rejected() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"hello").unwrap();
    let archive_path = src.path().join("archive.zsr");
    zsr::create(src.path(), &archive_path).unwrap();

    let bytes = fs::read(&archive_path).unwrap();
    fs::write(&archive_path, &bytes[..8]).unwrap();

    let err = ZsrReader::open(&archive_path).unwrap_err();
    assert_eq!(err.to_string(), "File too small");
}

#[test]
fn s6_corrupt_blob_is_isolated() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"hello").unwrap();
    fs::write(src.path().join("b.txt"), b"world").unwrap();
    let archive_path = src.path().join("archive.zsr");
    zsr::create(src.path(), &archive_path).unwrap();

    // Find a.txt's exact blob offset via the index, then smash its LZMA
    // properties byte — an invalid lc/lp/pb combination that no conforming
    // decoder will accept — without touching b.txt's blob or shifting
    // anything else in the file.
    let mut file = fs::File::open(&archive_path).unwrap();
    let mut header = [0u8; 12];
    file.read_exact(&mut header).unwrap();
    let idx_start = u64::from_le_bytes(header[4..12].try_into().unwrap());
    file.seek(SeekFrom::Start(idx_start)).unwrap();
    let mut compressed_index = Vec::new();
    file.read_to_end(&mut compressed_index).unwrap();
    let mut plaintext = Vec::new();
    lzma_rs::lzma_decompress(&mut std::io::Cursor::new(&compressed_index), &mut plaintext).unwrap();

    let mut offset = 0;
    let mut a_start = None;
    while offset < plaintext.len() {
        let (entry, consumed) = zsr::Entry::parse(&plaintext[offset..]).unwrap();
        if entry.name == "a.txt" {
            a_start = Some(entry.start);
        }
        offset += consumed;
    }
    let a_start = a_start.expect("a.txt entry present") as usize;

    let mut bytes = fs::read(&archive_path).unwrap();
    bytes[a_start] = 0xFF; // out-of-range LZMA properties byte
    fs::write(&archive_path, &bytes).unwrap();

    let mut reader = ZsrReader::open(&archive_path).unwrap();
    assert!(matches!(
        reader.get_file("a.txt").unwrap_err(),
        ZsrError::CorruptBlob
    ));
    assert_eq!(reader.get_file("b.txt").unwrap(), b"world");
}

#[test]
fn negative_paths() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"hello").unwrap();
    fs::create_dir(src.path().join("b")).unwrap();
    let archive_path = src.path().join("archive.zsr");
    zsr::create(src.path(), &archive_path).unwrap();

    let mut reader = ZsrReader::open(&archive_path).unwrap();
    assert!(!reader.exists("nonexistent/path"));
    assert!(matches!(reader.get_file("b").unwrap_err(), ZsrError::NotAFile));
    assert!(matches!(
        reader.get_file("nonexistent").unwrap_err(),
        ZsrError::NotFound
    ));
}

#[test]
fn idempotent_directory_extract() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"hello").unwrap();
    let archive_path = src.path().join("archive.zsr");
    zsr::create(src.path(), &archive_path).unwrap();

    let mut reader = ZsrReader::open(&archive_path).unwrap();
    let out = src.path().join("out");
    reader.extract_all(&out).unwrap();
    reader.extract_all(&out).unwrap();
    assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"hello");
}

#[test]
fn writer_sorts_directory_entries() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("z.txt"), b"z").unwrap();
    fs::write(src.path().join("a.txt"), b"a").unwrap();
    fs::write(src.path().join("m.txt"), b"m").unwrap();
    let archive_path = src.path().join("archive.zsr");
    zsr::create(src.path(), &archive_path).unwrap();

    // Re-derive traversal order via extract_subtree's recorded write order:
    // a regular file's fid ordering should follow lexicographic sort.
    let mut file = fs::File::open(&archive_path).unwrap();
    let mut header = [0u8; 12];
    file.read_exact(&mut header).unwrap();
    let idx_start = u64::from_le_bytes(header[4..12].try_into().unwrap());
    file.seek(SeekFrom::Start(idx_start)).unwrap();
    let mut compressed = Vec::new();
    file.read_to_end(&mut compressed).unwrap();
    let mut plaintext = Vec::new();
    lzma_rs::lzma_decompress(&mut std::io::Cursor::new(&compressed), &mut plaintext).unwrap();

    let mut names = Vec::new();
    let mut offset = 0;
    while offset < plaintext.len() {
        let (entry, consumed) = zsr::Entry::parse(&plaintext[offset..]).unwrap();
        names.push(entry.name);
        offset += consumed;
    }
    assert_eq!(names, vec!["a.txt", "m.txt", "z.txt"]);
}
