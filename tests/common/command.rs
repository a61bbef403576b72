use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use derive_new::new;
use rstest::fixture;
use std::path::Path;

const IDENTITY_VARS: [&str; 3] = ["GIT_AUTHOR_NAME", "GIT_AUTHOR_EMAIL", "GIT_AUTHOR_DATE"];

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with `1.txt` and `2.txt` staged and committed
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_minigit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("2.txt"),
        "two".to_string(),
    ));

    run_minigit_command(repository_dir.path(), &["add", "1.txt", "2.txt"])
        .assert()
        .success();

    minigit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

/// Run the binary in `dir` with no identity inherited from the caller
pub fn run_minigit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("minigit").expect("Failed to find minigit binary");
    for var in IDENTITY_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

#[derive(Debug, Clone, new)]
pub struct RandomAuthor {
    pub name: String,
    pub email: String,
}

pub fn generate_random_author() -> RandomAuthor {
    use fake::Fake;
    use fake::faker::internet::en::FreeEmail;
    use fake::faker::name::en::Name;

    let name = Name().fake::<String>();
    let email = FreeEmail().fake::<String>();
    RandomAuthor::new(name, email)
}

/// Commit with a random identity supplied through the environment
pub fn minigit_commit(dir: &Path, message: &str) -> Command {
    let author = generate_random_author();

    let mut cmd = run_minigit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", author.name),
        ("GIT_AUTHOR_EMAIL", author.email),
        ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000".to_string()), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

pub fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout is not UTF-8")
}

pub fn read_branch(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".git").join("refs").join("heads").join("main"))
        .expect("Failed to read branch ref")
}
