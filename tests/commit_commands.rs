use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::command::{
    init_repository_dir, minigit_commit, read_branch, repository_dir, run_minigit_command,
    stdout_of,
};
use common::{HELLO_BLOB_ID, HELLO_TREE_ID};

#[rstest]
fn first_commit_points_the_branch_at_it(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_minigit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir.child("a.txt").write_str("hello")?;
    run_minigit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    let stdout = stdout_of(&mut run_minigit_command(
        repository_dir.path(),
        &["commit", "-m", "first", "--author", "A <a@x.com>"],
    ));

    let commit_id = read_branch(repository_dir.path());
    let commit_id = commit_id.trim_end_matches('\n');
    assert_eq!(commit_id.len(), 40);
    assert_eq!(stdout, format!("[main (root-commit) {}] first\n", &commit_id[..7]));

    let commit = stdout_of(&mut run_minigit_command(
        repository_dir.path(),
        &["cat-file", "-p", commit_id],
    ));
    assert!(commit.starts_with(&format!("tree {HELLO_TREE_ID}\nauthor A <a@x.com> ")));
    assert!(commit.ends_with("\n\nfirst\n"));

    let tree = stdout_of(&mut run_minigit_command(
        repository_dir.path(),
        &["cat-file", "-p", HELLO_TREE_ID],
    ));
    assert_eq!(tree, format!("100644 blob {HELLO_BLOB_ID}\ta.txt\n"));

    Ok(())
}

#[rstest]
fn second_commit_records_its_parent(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;
    let first = read_branch(repository_dir.path()).trim().to_string();
    std::fs::write(repository_dir.path().join("1.txt"), "uno").unwrap();
    run_minigit_command(repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();

    minigit_commit(repository_dir.path(), "Second commit")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[main "))
        .stdout(predicate::str::ends_with("] Second commit\n"));

    let second = read_branch(repository_dir.path()).trim().to_string();
    let commit = stdout_of(&mut run_minigit_command(
        repository_dir.path(),
        &["cat-file", "-p", &second],
    ));
    assert!(commit.contains(&format!("\nparent {first}\n")));
    assert!(commit.contains(" 1672574400 +0000\n"));
}

#[rstest]
fn commit_without_identity_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_minigit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir.child("a.txt").write_str("hello")?;
    run_minigit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    run_minigit_command(repository_dir.path(), &["commit", "-m", "first"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("author identity unknown"));

    assert!(!repository_dir.path().join(".git/refs/heads/main").exists());

    Ok(())
}

#[rstest]
fn nested_paths_cannot_be_committed(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_minigit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir.child("src/lib.rs").write_str("")?;
    run_minigit_command(repository_dir.path(), &["add", "src"])
        .assert()
        .success();

    minigit_commit(repository_dir.path(), "nested")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "nested path src/lib.rs cannot be written to a flat tree",
        ));

    Ok(())
}
