//! End-to-end create/extract/inspect tests over real temporary directories

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use walkdir::WalkDir;

use ypf_archive::{
    create_archive, extract_archive, inspect_archive, ArchiveHeader, Error, FileType,
};

/// Build a representative source tree: nested directories, several file
/// types, a YCG twin, a Japanese filename, an empty file and an
/// incompressible payload.
fn build_source_tree(root: &Path) {
    fs::create_dir_all(root.join("script")).unwrap();
    fs::create_dir_all(root.join("cg")).unwrap();

    fs::write(
        root.join("script/main.ybn"),
        b"label start\nsay hello\nsay hello\nsay hello\njump start\n".repeat(40),
    )
    .unwrap();
    fs::write(root.join("script/empty.txt"), b"").unwrap();
    fs::write(root.join("cg/ev01.png.ycg"), b"fake ycg payload ".repeat(64)).unwrap();
    fs::write(root.join("cg/bg.bmp"), vec![0u8; 4096]).unwrap();
    fs::write(root.join("\u{30b7}\u{30ca}\u{30ea}\u{30aa}.txt"), "seed text").unwrap();

    // High-entropy bytes that zlib cannot shrink: a full xorshift64 step
    // per byte, taking only the high byte of each state
    let mut state = 0x9e3779b97f4a7c15u64;
    let noise: Vec<u8> = (0..991)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 56) as u8
        })
        .collect();
    fs::write(root.join("noise.dat"), noise).unwrap();
}

fn tree_contents(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<(PathBuf, Vec<u8>)> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            (
                e.path().strip_prefix(root).unwrap().to_path_buf(),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}

fn parse_archive(path: &Path) -> ArchiveHeader {
    let mut reader = BufReader::new(fs::File::open(path).unwrap());
    ArchiveHeader::read_from(&mut reader).unwrap()
}

#[test]
fn create_extract_round_trip_both_offset_widths() {
    // 290 exercises the legacy checksum pair and the 0x40 key, 479 the
    // murmur pair and 64-bit offsets
    for version in [290, 479] {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        build_source_tree(source.path());

        let archive = out.path().join("data.ypf");
        create_archive(source.path(), &archive, version).unwrap();

        let extracted = out.path().join("data");
        extract_archive(&archive, &extracted).unwrap();

        assert_eq!(
            tree_contents(source.path()),
            tree_contents(&extracted),
            "version {version}"
        );
    }
}

#[test]
fn ycg_suffix_is_stripped_in_table_and_restored_on_disk() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    build_source_tree(source.path());

    let archive = out.path().join("data.ypf");
    create_archive(source.path(), &archive, 479).unwrap();

    let header = parse_archive(&archive);
    let ycg = header
        .entries
        .iter()
        .find(|e| e.file_type == FileType::Ycg)
        .expect("one ycg entry");
    // Logical name lost the synthetic suffix
    assert_eq!(ycg.file_name, "cg\\ev01.png");

    let extracted = out.path().join("data");
    extract_archive(&archive, &extracted).unwrap();
    assert!(extracted.join("cg/ev01.png.ycg").is_file());
    assert!(!extracted.join("cg/ev01.png").exists());
}

#[test]
fn table_is_sorted_by_name_checksum() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    build_source_tree(source.path());

    let archive = out.path().join("data.ypf");
    create_archive(source.path(), &archive, 290).unwrap();

    let header = parse_archive(&archive);
    let checksums: Vec<u32> = header.entries.iter().map(|e| e.name_checksum).collect();
    let mut sorted = checksums.clone();
    sorted.sort_unstable();
    assert_eq!(checksums, sorted);
}

#[test]
fn incompressible_content_is_stored_raw() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    build_source_tree(source.path());

    let archive = out.path().join("data.ypf");
    create_archive(source.path(), &archive, 479).unwrap();

    let header = parse_archive(&archive);
    let noise = header
        .entries
        .iter()
        .find(|e| e.file_name == "noise.dat")
        .unwrap();
    assert!(!noise.is_compressed);
    assert_eq!(noise.compressed_size, noise.raw_size);

    let script = header
        .entries
        .iter()
        .find(|e| e.file_name == "script\\main.ybn")
        .unwrap();
    assert!(script.is_compressed);
    assert!(script.compressed_size < script.raw_size);
}

#[test]
fn identical_payloads_share_one_stored_copy() {
    for version in [290, 479] {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let payload = b"shared placeholder asset ".repeat(200);
        fs::write(source.path().join("first.txt"), &payload).unwrap();
        fs::write(source.path().join("second.txt"), &payload).unwrap();
        fs::write(source.path().join("unique.txt"), b"different").unwrap();

        let archive = out.path().join("data.ypf");
        create_archive(source.path(), &archive, version).unwrap();

        let header = parse_archive(&archive);
        let first = header
            .entries
            .iter()
            .find(|e| e.file_name == "first.txt")
            .unwrap();
        let second = header
            .entries
            .iter()
            .find(|e| e.file_name == "second.txt")
            .unwrap();
        assert_eq!(first.offset, second.offset, "version {version}");
        assert_eq!(first.compressed_size, second.compressed_size);
        assert_eq!(first.data_checksum, second.data_checksum);

        // The duplicate contributed a table record but no content bytes
        let archive_len = fs::metadata(&archive).unwrap().len();
        let content_len: u64 = archive_len - header.header_size;
        let stored_sum: u64 = header
            .entries
            .iter()
            .map(|e| u64::from(e.compressed_size))
            .sum();
        assert!(content_len < stored_sum);

        // Both entries still extract to the same bytes
        let extracted = out.path().join("data");
        extract_archive(&archive, &extracted).unwrap();
        assert_eq!(fs::read(extracted.join("first.txt")).unwrap(), payload);
        assert_eq!(fs::read(extracted.join("second.txt")).unwrap(), payload);
    }
}

#[test]
fn flipped_content_byte_is_detected() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), b"content that matters ".repeat(30)).unwrap();

    let archive = out.path().join("data.ypf");
    create_archive(source.path(), &archive, 479).unwrap();

    let header = parse_archive(&archive);
    let entry = &header.entries[0];

    let mut bytes = fs::read(&archive).unwrap();
    bytes[entry.offset as usize + 3] ^= 0x20;
    fs::write(&archive, bytes).unwrap();

    let extracted = out.path().join("data");
    let err = extract_archive(&archive, &extracted).unwrap_err();
    assert!(matches!(err, Error::DataChecksumMismatch { .. }), "{err}");

    // Inspection catches it too, unless told not to look
    let err = inspect_archive(&archive, false).unwrap_err();
    assert!(matches!(err, Error::DataChecksumMismatch { .. }), "{err}");
    inspect_archive(&archive, true).unwrap();
}

#[test]
fn inspect_validates_intact_archive() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    build_source_tree(source.path());

    let archive = out.path().join("data.ypf");
    create_archive(source.path(), &archive, 500).unwrap();
    inspect_archive(&archive, false).unwrap();
}

#[test]
fn colliding_logical_names_are_rejected() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    // Stripping the synthetic suffix makes these the same logical file
    fs::write(source.path().join("title.png"), b"png bytes").unwrap();
    fs::write(source.path().join("title.png.ycg"), b"ycg bytes").unwrap();

    let archive = out.path().join("data.ypf");
    let err = create_archive(source.path(), &archive, 479).unwrap_err();
    assert!(matches!(err, Error::DuplicateFileName(name) if name == "title.png"));
}

#[test]
fn bare_ycg_suffix_is_rejected() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(source.path().join(".ycg"), b"nameless").unwrap();

    let archive = out.path().join("data.ypf");
    let err = create_archive(source.path(), &archive, 479).unwrap_err();
    assert!(matches!(err, Error::EmptyFileName(_)), "{err}");
}

#[test]
fn unsupported_version_fails_before_any_output() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), b"data").unwrap();

    let archive = out.path().join("data.ypf");
    let err = create_archive(source.path(), &archive, 233).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion(233)));
    assert!(!archive.exists());
}

#[test]
fn empty_files_round_trip_and_dedup() {
    for version in [290, 479] {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(source.path().join("one.txt"), b"").unwrap();
        fs::write(source.path().join("two.txt"), b"").unwrap();

        let archive = out.path().join("data.ypf");
        create_archive(source.path(), &archive, version).unwrap();

        let header = parse_archive(&archive);
        for entry in &header.entries {
            assert_eq!(entry.raw_size, 0);
            assert_eq!(entry.compressed_size, 0);
            assert!(!entry.is_compressed);
        }

        let extracted = out.path().join("data");
        extract_archive(&archive, &extracted).unwrap();
        assert_eq!(fs::read(extracted.join("one.txt")).unwrap(), b"");
        assert_eq!(fs::read(extracted.join("two.txt")).unwrap(), b"");
    }
}
