use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with an initial commit over a small nested file layout
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_ugit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three\n".to_string(),
    ));

    ugit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_ugit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("ugit").expect("Failed to find ugit binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn ugit_commit(dir: &Path, message: &str) -> Command {
    run_ugit_command(dir, &["commit", "-m", message])
}

/// Raw content of one ref file under the control directory
pub fn read_ref(dir: &Path, refname: &str) -> String {
    std::fs::read_to_string(dir.join(".ugit").join(refname))
        .expect("Failed to read ref file")
        .trim()
        .to_string()
}

/// Dereferenced HEAD oid
pub fn head_oid(dir: &Path) -> String {
    let head = read_ref(dir, "HEAD");
    match head.strip_prefix("ref: ") {
        Some(target) => read_ref(dir, target),
        None => head,
    }
}

pub fn object_count(dir: &Path) -> usize {
    std::fs::read_dir(dir.join(".ugit").join("objects"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}
