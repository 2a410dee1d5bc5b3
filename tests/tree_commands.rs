use assert_fs::TempDir;
use fake::Fake;
use fake::faker::lorem::en::{Word, Words};
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{init_repository_dir, repository_dir, run_ugit_command};
use common::file::{FileSpec, read_file, write_file};

#[rstest]
fn hash_object_then_cat_file_round_trips(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_ugit_command(dir.path(), &["init"]).assert().success();

    let file_name = format!("{}.txt", Word().fake::<String>());
    let file_content = Words(5..10).fake::<Vec<String>>().join(" ");
    write_file(FileSpec::new(dir.path().join(&file_name), file_content.clone()));

    let output = run_ugit_command(dir.path(), &["hash-object", "--write", &file_name]).output()?;
    let oid = String::from_utf8(output.stdout)?.trim().to_string();
    assert_eq!(oid.len(), 40);

    run_ugit_command(dir.path(), &["cat-file", &oid, "--type", "blob"])
        .assert()
        .success()
        .stdout(predicate::eq(file_content));

    Ok(())
}

#[rstest]
fn hash_object_without_write_only_prints_the_oid(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_ugit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.path().join("dry.txt"),
        "dry run".to_string(),
    ));

    let output = run_ugit_command(dir.path(), &["hash-object", "dry.txt"]).output()?;
    let oid = String::from_utf8(output.stdout)?.trim().to_string();

    // nothing stored: cat-file cannot find it
    run_ugit_command(dir.path(), &["cat-file", &oid])
        .assert()
        .failure();

    Ok(())
}

#[rstest]
fn write_tree_read_tree_round_trip(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    let output = run_ugit_command(dir.path(), &["write-tree"]).output()?;
    let tree_oid = String::from_utf8(output.stdout)?.trim().to_string();

    // trash the working directory
    write_file(FileSpec::new(
        dir.path().join("1.txt"),
        "mangled\n".to_string(),
    ));
    write_file(FileSpec::new(
        dir.path().join("stray.txt"),
        "stray\n".to_string(),
    ));
    std::fs::remove_file(dir.path().join("a").join("2.txt"))?;

    run_ugit_command(dir.path(), &["read-tree", &tree_oid])
        .assert()
        .success();

    assert_eq!(read_file(&dir.path().join("1.txt")), "one\n");
    assert_eq!(read_file(&dir.path().join("a").join("2.txt")), "two\n");
    assert_eq!(read_file(&dir.path().join("a").join("b").join("3.txt")), "three\n");
    assert!(!dir.path().join("stray.txt").exists());

    // snapshotting the restored tree reproduces the same oid
    let output = run_ugit_command(dir.path(), &["write-tree"]).output()?;
    let again = String::from_utf8(output.stdout)?.trim().to_string();
    assert_eq!(again, tree_oid);

    Ok(())
}
