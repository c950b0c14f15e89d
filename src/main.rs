//! grove CLI - git-compatible object store command line interface

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser, Subcommand};
use tracing::Level;

use grove::ops::{
    build_tree, cat_file, format_ls_tree, fsck, hash_object, ls_tree, CatFileMode, CommitBuilder,
};
use grove::{resolve_prefix, Repo};

#[derive(Parser)]
#[command(name = "grove")]
#[command(about = "git-compatible content-addressed object store")]
#[command(version)]
struct Cli {
    /// repository path
    #[arg(short, long, default_value = ".", env = "GROVE_REPO")]
    repo: PathBuf,

    /// log object reads and writes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a new repository
    Init {
        /// path to create repository at
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// compute a file's blob digest
    HashObject {
        /// file to hash
        file: PathBuf,

        /// also store the blob
        #[arg(short)]
        write: bool,
    },

    /// show an object
    #[command(group(
        ArgGroup::new("mode")
            .required(true)
            .args(["pretty", "kind", "size", "exists"])
    ))]
    CatFile {
        /// object digest (full or abbreviated)
        object: String,

        /// print contents
        #[arg(short = 'p')]
        pretty: bool,

        /// print kind
        #[arg(short = 't')]
        kind: bool,

        /// print body size
        #[arg(short = 's')]
        size: bool,

        /// exit non-zero if the object is missing
        #[arg(short = 'e')]
        exists: bool,
    },

    /// list a tree
    LsTree {
        /// tree digest (full or abbreviated)
        tree: String,

        /// print only entry names
        #[arg(long)]
        name_only: bool,

        /// recurse into subtrees
        #[arg(short = 'r')]
        recursive: bool,
    },

    /// store a directory as a tree
    WriteTree {
        /// directory to snapshot (defaults to the repository root)
        dir: Option<PathBuf>,
    },

    /// create a commit from a tree
    CommitTree {
        /// tree digest
        tree: String,

        /// parent commit digest
        #[arg(short = 'p')]
        parent: Option<String>,

        /// commit message
        #[arg(short, long)]
        message: String,
    },

    /// verify repository integrity
    Fsck,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> grove::Result<ExitCode> {
    match cli.command {
        Commands::Init { path } => {
            Repo::init(&path)?;
            println!("initialized grove repository at {}", path.display());
        }

        Commands::HashObject { file, write } => {
            let digest = if write {
                let repo = Repo::open(&cli.repo)?;
                hash_object(&file, Some(&repo))?
            } else {
                hash_object(&file, None)?
            };
            println!("{}", digest);
        }

        Commands::CatFile {
            object,
            pretty,
            kind,
            size,
            exists,
        } => {
            let repo = Repo::open(&cli.repo)?;
            let mode = match (pretty, kind, size, exists) {
                (true, ..) => CatFileMode::Pretty,
                (_, true, ..) => CatFileMode::Type,
                (_, _, true, _) => CatFileMode::Size,
                _ => CatFileMode::Exists,
            };

            let digest = match resolve_prefix(&repo, &object) {
                Ok(digest) => digest,
                Err(_) if mode == CatFileMode::Exists => return Ok(ExitCode::FAILURE),
                Err(e) => return Err(e),
            };

            match cat_file(&repo, &digest, mode) {
                Ok(out) => write_stdout(&out)?,
                Err(grove::Error::ObjectNotFound(_)) if mode == CatFileMode::Exists => {
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e),
            }
        }

        Commands::LsTree {
            tree,
            name_only,
            recursive,
        } => {
            let repo = Repo::open(&cli.repo)?;
            let digest = resolve_prefix(&repo, &tree)?;
            let entries = ls_tree(&repo, &digest, recursive)?;
            write_stdout(format_ls_tree(&entries, name_only).as_bytes())?;
        }

        Commands::WriteTree { dir } => {
            let repo = Repo::open(&cli.repo)?;
            let dir = dir.unwrap_or_else(|| repo.path().to_path_buf());
            let build = build_tree(&repo, &dir)?;

            if !build.is_complete() {
                tracing::warn!(skipped = build.skipped.len(), "tree written with entries skipped");
            }
            println!("{}", build.digest);
        }

        Commands::CommitTree {
            tree,
            parent,
            message,
        } => {
            let repo = Repo::open(&cli.repo)?;
            let tree = resolve_prefix(&repo, &tree)?;
            let parent = parent.map(|p| resolve_prefix(&repo, &p)).transpose()?;

            let digest = CommitBuilder::new(&repo).build(tree, parent, &message)?;
            println!("{}", digest);
        }

        Commands::Fsck => {
            let repo = Repo::open(&cli.repo)?;
            let report = fsck(&repo)?;

            println!("objects checked: {}", report.objects_checked);

            if !report.corrupt_objects.is_empty() {
                println!("\ncorrupt objects:");
                for obj in &report.corrupt_objects {
                    println!("  {}: {}", obj.digest, obj.message);
                }
            }

            if !report.missing_objects.is_empty() {
                println!("\nmissing objects:");
                for obj in &report.missing_objects {
                    println!(
                        "  {} {} (referenced by {})",
                        obj.kind, obj.digest, obj.referenced_by
                    );
                }
            }

            if report.is_ok() {
                println!("\nrepository is healthy");
            } else {
                println!("\nrepository has issues");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn write_stdout(bytes: &[u8]) -> grove::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|_| stdout.flush())
        .map_err(|e| grove::Error::Io {
            path: PathBuf::from("<stdout>"),
            source: e,
        })
}
