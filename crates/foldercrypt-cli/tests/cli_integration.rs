use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEST_PASSWORD: &str = "integration-test-password";

fn foldercrypt() -> Command {
    let mut cmd = Command::cargo_bin("foldercrypt").unwrap();
    cmd.env("FOLDERCRYPT_PASSWORD", TEST_PASSWORD);
    cmd
}

fn foldercrypt_with_password(password: &str) -> Command {
    let mut cmd = Command::cargo_bin("foldercrypt").unwrap();
    cmd.env("FOLDERCRYPT_PASSWORD", password);
    cmd
}

/// Create a plaintext folder with `a.txt` ("hello") and `notes/b.txt`
/// ("world"), returning the TempDir (keeps it alive) and the folder path.
fn plain_folder() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = temp.path().join("vault");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.txt"), b"hello").unwrap();
    fs::create_dir(root.join("notes")).unwrap();
    fs::write(root.join("notes/b.txt"), b"world").unwrap();
    (temp, root)
}

fn entry_names(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect()
}

fn is_hex(name: &str) -> bool {
    !name.is_empty() && name.len() % 2 == 0 && name.chars().all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn test_help() {
    foldercrypt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("password-encrypted folders"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("open"))
        .stdout(predicate::str::contains("close"));
}

#[test]
fn test_version() {
    foldercrypt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("foldercrypt"));
}

#[test]
fn test_create_requires_path() {
    foldercrypt().arg("create").assert().failure();
}

// ============================================================================
// Create
// ============================================================================

#[test]
fn test_create_encrypts_top_level_and_nested_entries() {
    let (_temp, root) = plain_folder();

    foldercrypt()
        .arg("create")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypted successfully"));

    let names = entry_names(&root);
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| is_hex(n)), "got {names:?}");
    assert!(!root.join("a.txt").exists());
    assert!(!root.join("notes").exists());

    // The nested directory is preserved under its encrypted name, and the
    // file inside it is encrypted too.
    let dir = fs::read_dir(&root)
        .unwrap()
        .map(|e| e.unwrap())
        .find(|e| e.file_type().unwrap().is_dir())
        .expect("encrypted folder should contain one directory");
    let inner = entry_names(&dir.path());
    assert_eq!(inner.len(), 1);
    assert!(is_hex(&inner[0]));
}

#[test]
fn test_create_on_missing_path_makes_empty_folder() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("fresh");

    foldercrypt().arg("create").arg(&root).assert().success();

    assert!(root.is_dir());
    assert_eq!(entry_names(&root).len(), 0);
}

// ============================================================================
// Open / close workflow
// ============================================================================

#[test]
fn test_full_workflow() {
    let (_temp, root) = plain_folder();
    let shadow = PathBuf::from(format!("{}_decrypt", root.display()));

    foldercrypt().arg("create").arg(&root).assert().success();

    foldercrypt()
        .arg("open")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("_decrypt"));

    assert_eq!(fs::read(shadow.join("a.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(shadow.join("notes/b.txt")).unwrap(), b"world");

    // Edit the cleartext mirror, then seal it again.
    fs::write(shadow.join("a.txt"), b"edited").unwrap();

    foldercrypt()
        .arg("close")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("closed"));

    assert!(!shadow.exists());
    assert!(entry_names(&root).iter().all(|n| is_hex(n)));

    // Reopen and verify the edit survived the round trip.
    foldercrypt().arg("open").arg(&root).assert().success();
    assert_eq!(fs::read(shadow.join("a.txt")).unwrap(), b"edited");
}

#[test]
fn test_open_missing_root_fails_with_not_found() {
    let temp = TempDir::new().unwrap();

    foldercrypt()
        .arg("open")
        .arg(temp.path().join("absent"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_open_twice_fails_with_state_error() {
    let (_temp, root) = plain_folder();

    foldercrypt().arg("create").arg(&root).assert().success();
    foldercrypt().arg("open").arg(&root).assert().success();

    foldercrypt()
        .arg("open")
        .arg(&root)
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("already open"));
}

#[test]
fn test_close_without_open_fails_with_state_error() {
    let (_temp, root) = plain_folder();

    foldercrypt().arg("create").arg(&root).assert().success();

    foldercrypt()
        .arg("close")
        .arg(&root)
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("nothing to close"));
}

// ============================================================================
// Wrong password
// ============================================================================

#[test]
fn test_open_with_wrong_password_leaves_no_shadow() {
    let (_temp, root) = plain_folder();
    let shadow = PathBuf::from(format!("{}_decrypt", root.display()));

    foldercrypt().arg("create").arg(&root).assert().success();
    let encrypted_names = {
        let mut names = entry_names(&root);
        names.sort();
        names
    };

    foldercrypt_with_password("wrong-password")
        .arg("open")
        .arg(&root)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Incorrect password"));

    assert!(!shadow.exists());
    let mut names = entry_names(&root);
    names.sort();
    assert_eq!(names, encrypted_names, "root must be unmodified");
}

#[test]
fn test_close_with_wrong_password_preserves_shadow() {
    let (_temp, root) = plain_folder();
    let shadow = PathBuf::from(format!("{}_decrypt", root.display()));

    foldercrypt().arg("create").arg(&root).assert().success();
    foldercrypt().arg("open").arg(&root).assert().success();

    foldercrypt_with_password("wrong-password")
        .arg("close")
        .arg(&root)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Incorrect password"));

    assert_eq!(fs::read(shadow.join("a.txt")).unwrap(), b"hello");
}

#[test]
fn test_open_empty_folder_accepts_any_password() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("empty");
    fs::create_dir(&root).unwrap();

    foldercrypt_with_password("any-password-works")
        .arg("open")
        .arg(&root)
        .assert()
        .success();
}

// ============================================================================
// Password plumbing
// ============================================================================

#[test]
fn test_password_stdin() {
    let (_temp, root) = plain_folder();

    Command::cargo_bin("foldercrypt")
        .unwrap()
        .env_remove("FOLDERCRYPT_PASSWORD")
        .arg("--password-stdin")
        .arg("create")
        .arg(&root)
        .write_stdin(format!("{TEST_PASSWORD}\n"))
        .assert()
        .success();

    // The env-var password matches, so open succeeds.
    foldercrypt().arg("open").arg(&root).assert().success();
}

#[test]
fn test_password_stdin_empty_fails() {
    let (_temp, root) = plain_folder();

    Command::cargo_bin("foldercrypt")
        .unwrap()
        .env_remove("FOLDERCRYPT_PASSWORD")
        .arg("--password-stdin")
        .arg("create")
        .arg(&root)
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}
