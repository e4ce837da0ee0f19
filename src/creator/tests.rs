use super::*;
use std::fs;
use std::io::Read;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;
use zip::ZipArchive;

fn write_input(dir: &Path, rel: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, data).unwrap();
    path
}

fn read_entries(archive: &Path) -> Vec<(String, Vec<u8>)> {
    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut entries = Vec::new();
    for i in 0..zip.len() {
        let mut file = zip.by_index(i).unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).unwrap();
        entries.push((file.name().to_string(), contents));
    }
    entries
}

#[test]
fn test_create_from_args_requires_two_arguments() {
    let none: [&str; 0] = [];
    let err = create_from_args(&none).unwrap_err();
    assert!(matches!(err, ArchiveError::InvalidArguments(_)));

    let err = create_from_args(&["out.jar"]).unwrap_err();
    assert!(matches!(err, ArchiveError::InvalidArguments(_)));
    assert!(err.is_usage_error());
}

#[test]
fn test_invalid_arguments_touch_nothing() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.jar");
    let output_arg = output.to_str().unwrap();

    assert!(create_from_args(&[output_arg]).is_err());
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_create_with_empty_input_list() {
    let dir = tempdir().unwrap();
    let inputs: Vec<PathBuf> = Vec::new();
    let err = create(&dir.path().join("out.jar"), &inputs).unwrap_err();
    assert!(matches!(err, ArchiveError::InvalidArguments(_)));
}

#[test]
fn test_entries_are_flat_and_ordered() {
    let dir = tempdir().unwrap();
    let b = write_input(dir.path(), "deep/nested/b.txt", b"bravo");
    let a = write_input(dir.path(), "a.bin", &[0u8, 1, 2, 255]);
    let c = write_input(dir.path(), "other/c.class", b"\xca\xfe\xba\xbe");
    let output = dir.path().join("out.jar");

    let summary = create(&output, &[&b, &a, &c]).unwrap();
    assert_eq!(summary.entries, vec!["b.txt", "a.bin", "c.class"]);
    assert_eq!(summary.total_bytes, 5 + 4 + 4);

    let entries = read_entries(&output);
    assert_eq!(
        entries,
        vec![
            ("b.txt".to_string(), b"bravo".to_vec()),
            ("a.bin".to_string(), vec![0u8, 1, 2, 255]),
            ("c.class".to_string(), b"\xca\xfe\xba\xbe".to_vec()),
        ]
    );
}

#[test]
fn test_empty_input_file_becomes_empty_entry() {
    let dir = tempdir().unwrap();
    let empty = write_input(dir.path(), "empty.txt", b"");
    let output = dir.path().join("out.jar");

    create(&output, &[&empty]).unwrap();
    assert_eq!(read_entries(&output), vec![("empty.txt".to_string(), Vec::new())]);
}

#[test]
fn test_entry_metadata_is_fixed() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path(), "x.txt", b"payload");
    let output = dir.path().join("out.jar");
    create(&output, &[&input]).unwrap();

    let mut zip = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    let file = zip.by_index(0).unwrap();
    assert_eq!(file.last_modified(), Some(DateTime::default()));
    assert_eq!(file.compression(), CompressionMethod::Deflated);
    assert_eq!(file.unix_mode().map(|m| m & 0o777), Some(ENTRY_PERMISSIONS));
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();

    let a1 = write_input(first.path(), "in/a.txt", b"alpha");
    let b1 = write_input(first.path(), "in/b.txt", b"beta beta beta");
    let a2 = write_input(second.path(), "elsewhere/a.txt", b"alpha");
    let b2 = write_input(second.path(), "b.txt", b"beta beta beta");

    // Different input mtimes must not leak into the archive
    let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
    File::options()
        .write(true)
        .open(&a2)
        .unwrap()
        .set_modified(old)
        .unwrap();

    let out1 = first.path().join("out.jar");
    let out2 = second.path().join("out.jar");
    let s1 = create(&out1, &[&a1, &b1]).unwrap();
    let s2 = create(&out2, &[&a2, &b2]).unwrap();

    assert_eq!(fs::read(&out1).unwrap(), fs::read(&out2).unwrap());
    assert_eq!(s1.sha256, s2.sha256);
}

#[test]
fn test_input_order_changes_output() {
    let dir = tempdir().unwrap();
    let a = write_input(dir.path(), "a.txt", b"alpha");
    let b = write_input(dir.path(), "b.txt", b"beta");

    let ab = dir.path().join("ab.jar");
    let ba = dir.path().join("ba.jar");
    create(&ab, &[&a, &b]).unwrap();
    create(&ba, &[&b, &a]).unwrap();

    let names: Vec<String> = read_entries(&ba).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["b.txt", "a.txt"]);
    assert_ne!(fs::read(&ab).unwrap(), fs::read(&ba).unwrap());
}

#[test]
fn test_duplicate_base_names_rejected() {
    let dir = tempdir().unwrap();
    let first = write_input(dir.path(), "x/R.txt", b"one");
    let second = write_input(dir.path(), "y/R.txt", b"two");
    let output = dir.path().join("out.jar");

    let err = create(&output, &[&first, &second]).unwrap_err();
    match err {
        ArchiveError::DuplicateEntry { name, first: f, second: s } => {
            assert_eq!(name, "R.txt");
            assert_eq!(f, first);
            assert_eq!(s, second);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn test_missing_input_is_io_error_and_keeps_previous_output() {
    let dir = tempdir().unwrap();
    let present = write_input(dir.path(), "present.txt", b"here");
    let missing = dir.path().join("missing.txt");
    let output = dir.path().join("out.jar");
    fs::write(&output, b"previous artifact").unwrap();

    let err = create(&output, &[&present, &missing]).unwrap_err();
    match &err {
        ArchiveError::Io { path, .. } => assert_eq!(path, &missing),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!err.is_usage_error());

    assert_eq!(fs::read(&output).unwrap(), b"previous artifact");
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with(".jarsmith-"))
        .collect();
    assert!(leftovers.is_empty(), "stray temp files: {leftovers:?}");
}

#[test]
fn test_existing_output_is_overwritten() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path(), "only.txt", b"fresh");
    let output = dir.path().join("out.jar");
    fs::write(&output, b"stale bytes that are not a zip").unwrap();

    create(&output, &[&input]).unwrap();
    assert_eq!(read_entries(&output), vec![("only.txt".to_string(), b"fresh".to_vec())]);
}

#[test]
fn test_missing_output_directory_is_io_error() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path(), "a.txt", b"a");
    let output = dir.path().join("no/such/dir/out.jar");

    let err = create(&output, &[&input]).unwrap_err();
    assert!(matches!(err, ArchiveError::Io { .. }));
}

#[test]
fn test_summary_digest_matches_file() {
    use sha2::{Digest, Sha256};

    let dir = tempdir().unwrap();
    let input = write_input(dir.path(), "a.txt", b"digest me");
    let output = dir.path().join("out.jar");

    let summary = create(&output, &[&input]).unwrap();
    let expected = hex::encode(Sha256::digest(fs::read(&output).unwrap()));
    assert_eq!(summary.sha256, expected);
}

#[cfg(unix)]
#[test]
fn test_output_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let input = write_input(dir.path(), "a.txt", b"a");
    let output = dir.path().join("out.jar");
    create(&output, &[&input]).unwrap();

    let mode = fs::metadata(&output).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
