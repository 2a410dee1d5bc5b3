use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{head_oid, init_repository_dir, read_ref, run_ugit_command, ugit_commit};
use common::file::{FileSpec, read_file, write_file};

/// History:
///
/// ```text
///       A (base)
///      / \
///     B   C
///     |   |
///  master  feature
/// ```
#[rstest]
fn merge_divergent_branches_combines_both_edits(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    write_file(FileSpec::new(
        dir.path().join("shared.txt"),
        "top\nmiddle\nbottom\n".to_string(),
    ));
    ugit_commit(dir.path(), "Commit A - base").assert().success();

    run_ugit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    // Commit B on master: edit the top
    write_file(FileSpec::new(
        dir.path().join("shared.txt"),
        "TOP\nmiddle\nbottom\n".to_string(),
    ));
    ugit_commit(dir.path(), "Commit B - master").assert().success();

    // Commit C on feature: edit the bottom
    run_ugit_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(
        dir.path().join("shared.txt"),
        "top\nmiddle\nBOTTOM\n".to_string(),
    ));
    ugit_commit(dir.path(), "Commit C - feature").assert().success();
    let feature_oid = head_oid(dir.path());

    run_ugit_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    run_ugit_command(dir.path(), &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged in working tree"));

    // both edits landed, the merge is pending
    assert_eq!(
        read_file(&dir.path().join("shared.txt")),
        "TOP\nmiddle\nBOTTOM\n"
    );
    assert_eq!(read_ref(dir.path(), "MERGE_HEAD"), feature_oid);

    // committing closes the merge with two parents
    ugit_commit(dir.path(), "Merge feature").assert().success();
    assert!(!dir.path().join(".ugit").join("MERGE_HEAD").exists());

    let merge_oid = head_oid(dir.path());
    run_ugit_command(dir.path(), &["cat-file", &merge_oid])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("parent {feature_oid}")));

    Ok(())
}

#[rstest]
fn conflicting_merge_marks_the_overlap(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    write_file(FileSpec::new(
        dir.path().join("clash.txt"),
        "line\n".to_string(),
    ));
    ugit_commit(dir.path(), "Base").assert().success();

    run_ugit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    write_file(FileSpec::new(
        dir.path().join("clash.txt"),
        "ours\n".to_string(),
    ));
    ugit_commit(dir.path(), "Ours").assert().success();

    run_ugit_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(
        dir.path().join("clash.txt"),
        "theirs\n".to_string(),
    ));
    ugit_commit(dir.path(), "Theirs").assert().success();

    run_ugit_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    run_ugit_command(dir.path(), &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CONFLICT: clash.txt"));

    let merged = read_file(&dir.path().join("clash.txt"));
    assert!(merged.contains("<<<<<<< HEAD"));
    assert!(merged.contains("ours"));
    assert!(merged.contains("======="));
    assert!(merged.contains("theirs"));
    assert!(merged.contains(">>>>>>> MERGE_HEAD"));

    Ok(())
}

#[rstest]
fn merging_a_descendant_fast_forwards(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    // feature stays at the initial commit, master moves ahead
    run_ugit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(
        dir.path().join("1.txt"),
        "ahead\n".to_string(),
    ));
    ugit_commit(dir.path(), "Ahead").assert().success();
    let master_oid = head_oid(dir.path());

    run_ugit_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    run_ugit_command(dir.path(), &["merge", "master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fast-forward"));

    assert_eq!(read_ref(dir.path(), "refs/heads/feature"), master_oid);
    assert!(!dir.path().join(".ugit").join("MERGE_HEAD").exists());
    assert_eq!(read_file(&dir.path().join("1.txt")), "ahead\n");

    Ok(())
}

#[rstest]
fn merge_base_of_divergent_branches_is_the_fork_point(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let fork = head_oid(dir.path());

    run_ugit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    write_file(FileSpec::new(
        dir.path().join("1.txt"),
        "master\n".to_string(),
    ));
    ugit_commit(dir.path(), "On master").assert().success();

    run_ugit_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(
        dir.path().join("1.txt"),
        "feature\n".to_string(),
    ));
    ugit_commit(dir.path(), "On feature").assert().success();

    run_ugit_command(dir.path(), &["merge-base", "master", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&fork));

    Ok(())
}
