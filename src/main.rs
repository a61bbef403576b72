use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minigit::areas::repository::Repository;
use minigit::commands::plumbing::cat_file::CatFileMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "minigit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal git-compatible version control core",
    long_about = "This is a minimal implementation of the git storage model, written in Rust. \
    It covers content-addressed objects, the binary index and single-branch commits, \
    and keeps every file it writes readable by git.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command computes the blob ID of a file and can write the blob to the object database."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content or kind of an object",
        long_about = "This command prints an object of the repository, looked up by its ID \
        or by an unambiguous prefix of at least 2 hex characters."
    )]
    CatFile {
        #[arg(short = 'p', conflicts_with = "show_type", help = "Pretty-print the object content")]
        pretty: bool,
        #[arg(short = 't', help = "Print the object kind")]
        show_type: bool,
        #[arg(index = 1, help = "The object ID or prefix")]
        object: String,
    },
    #[command(
        name = "add",
        about = "Add file contents to the index",
        long_about = "This command stores the content of the given files as blobs and records them in the index. \
        Directories are expanded to the files they contain."
    )]
    Add {
        #[arg(required = true, help = "The files to stage")]
        paths: Vec<String>,
    },
    #[command(name = "ls-files", about = "Show the files in the index")]
    LsFiles {
        #[arg(short, long, help = "Show mode, object ID and stage number")]
        stage: bool,
    },
    #[command(
        name = "write-tree",
        about = "Create a tree object from the index",
        long_about = "This command stores the staged files as a flat tree object and prints its ID."
    )]
    WriteTree,
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command lists files that changed, were added or were deleted relative to the index."
    )]
    Status,
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the specified commit message. \
        Without --author the identity is taken from GIT_AUTHOR_NAME and GIT_AUTHOR_EMAIL."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(long, help = "The author, as \"Name <email>\"")]
        author: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    colored::control::set_override(std::io::stdout().is_terminal());

    let cli = Cli::parse();
    let pwd = std::env::current_dir()?;

    match &cli.command {
        Commands::Init { path } => {
            let root = match path {
                Some(path) => pwd.join(path),
                None => pwd,
            };
            std::fs::create_dir_all(&root)?;

            Repository::new(&root, Box::new(std::io::stdout())).init()?
        }
        Commands::HashObject { write, file } => {
            Repository::new(&pwd, Box::new(std::io::stdout())).hash_object(file, *write)?;
        }
        Commands::CatFile {
            pretty,
            show_type,
            object,
        } => {
            let mode = match (*pretty, *show_type) {
                (_, true) => CatFileMode::Type,
                (true, false) => CatFileMode::Pretty,
                (false, false) => anyhow::bail!("cat-file needs one of -p or -t"),
            };

            Repository::new(&pwd, Box::new(std::io::stdout())).cat_file(object, mode)?
        }
        Commands::Add { paths } => Repository::new(&pwd, Box::new(std::io::stdout())).stage(paths)?,
        Commands::LsFiles { stage } => {
            Repository::new(&pwd, Box::new(std::io::stdout())).ls_files(*stage)?
        }
        Commands::WriteTree => Repository::new(&pwd, Box::new(std::io::stdout())).write_tree()?,
        Commands::Status => Repository::new(&pwd, Box::new(std::io::stdout())).status()?,
        Commands::Commit { message, author } => {
            Repository::new(&pwd, Box::new(std::io::stdout())).commit(message, author.as_deref())?;
        }
    }

    Ok(())
}
