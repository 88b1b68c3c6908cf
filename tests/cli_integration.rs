use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use anyhow::Result;
use tempfile::tempdir;

/// Runs the `shelf` binary inside `cwd`, feeding `stdin` to its prompts.
fn shelf(cwd: &Path, args: &[&str], stdin: &str) -> Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_shelf"))
        .args(args)
        .current_dir(cwd)
        .env_remove("SHELF_LIBRARY")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut input) = child.stdin.take() {
        input.write_all(stdin.as_bytes())?;
    }
    Ok(child.wait_with_output()?)
}

fn library(dir: &Path) -> Result<String> {
    let root = dir.join("Library");
    fs::create_dir_all(root.join("Mystery"))?;
    fs::write(root.join("Mystery/book1.epub"), "")?;
    fs::write(root.join("Mystery/old.md"), "# Old\n")?;
    Ok(root.to_string_lossy().into_owned())
}

#[test]
fn test_yes_runs_both_passes() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let root = library(dir.path())?;

    // Act
    let output = shelf(dir.path(), &["--library", &root, "--yes"], "")?;

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Note created for: book1"));
    assert!(stdout.contains("Tag added to: old.md"));
    assert!(stdout.contains("=== Processing complete ==="));
    assert!(!stdout.contains('\x1b'), "piped output must be plain text");
    assert!(fs::read_to_string(dir.path().join("Library/Mystery/old.md"))?
        .starts_with("---\ntags: [mystery]\n"));

    Ok(())
}

#[test]
fn test_declined_prompts_change_nothing() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let root = library(dir.path())?;

    // Act
    let output = shelf(dir.path(), &["--library", &root], "n\nno\n")?;

    // Assert
    assert!(output.status.success());
    assert!(!dir.path().join("Library/Mystery/book1.md").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("Library/Mystery/old.md"))?,
        "# Old\n"
    );

    Ok(())
}

#[test]
fn test_library_path_from_dotenv() -> Result<()> {
    // Arrange: the root is only known through a .env file in the working dir
    let dir = tempdir()?;
    let root = library(dir.path())?;
    fs::write(dir.path().join(".env"), format!("SHELF_LIBRARY={root}\n"))?;

    // Act
    let output = shelf(dir.path(), &["--create-notes"], "")?;

    // Assert
    assert!(output.status.success());
    assert!(dir.path().join("Library/Mystery/book1.md").exists());

    Ok(())
}

#[test]
fn test_missing_library_exits_with_user_error() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let missing = dir.path().join("nowhere");

    // Act
    let output = shelf(dir.path(), &["--library", &missing.to_string_lossy(), "--yes"], "")?;

    // Assert
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("library not found"));
    assert!(!missing.exists());

    Ok(())
}
