use anyhow::Result;
use clap::{Parser, Subcommand};
use ugit::areas::repository::Repository;

#[derive(Parser)]
#[command(
    name = "ugit",
    version = "0.1.0",
    about = "A minimal distributed version-control system",
    long_about = "A minimal distributed version-control system: a content-addressable \
    object store, a tree/commit model, branches and tags, three-way merges and \
    filesystem remotes. A learning project, not a git replacement.",
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
        long_about = "Initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally store it as a blob"
    )]
    HashObject {
        #[arg(short, long, help = "Write the blob to the object database")]
        write: bool,
        #[arg(index = 1, help = "The file to hash")]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the payload of a stored object"
    )]
    CatFile {
        #[arg(index = 1, help = "The object to print (oid or revision)")]
        object: String,
        #[arg(short = 't', long = "type", help = "Expected object kind (blob, tree, commit)")]
        kind: Option<String>,
    },
    #[command(
        name = "write-tree",
        about = "Snapshot the working directory into a tree object"
    )]
    WriteTree,
    #[command(
        name = "read-tree",
        about = "Replace the working directory with a stored tree"
    )]
    ReadTree {
        #[arg(index = 1, help = "The tree to read (oid or revision)")]
        tree: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message"
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show commit history")]
    Log {
        #[arg(index = 1, help = "The revision to start from (defaults to HEAD)")]
        revision: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Switch the working directory and HEAD to another revision"
    )]
    Checkout {
        #[arg(index = 1, help = "The branch, tag, oid or revision to check out")]
        target: String,
    },
    #[command(name = "branch", about = "Create or list branches")]
    Branch {
        #[arg(index = 1, help = "The branch name to create (lists branches when omitted)")]
        name: Option<String>,
        #[arg(index = 2, help = "The revision the branch starts at (defaults to HEAD)")]
        start_point: Option<String>,
    },
    #[command(name = "tag", about = "Tag a revision with a name")]
    Tag {
        #[arg(index = 1, help = "The tag name")]
        name: String,
        #[arg(index = 2, help = "The revision to tag (defaults to HEAD)")]
        target: Option<String>,
        #[arg(short, long, help = "Delete the tag instead of creating it")]
        delete: bool,
    },
    #[command(name = "status", about = "Show the current branch and working tree changes")]
    Status,
    #[command(
        name = "diff",
        about = "Show content changes between a commit and the working directory"
    )]
    Diff {
        #[arg(index = 1, help = "The revision to diff against (defaults to HEAD)")]
        revision: Option<String>,
    },
    #[command(name = "reset", about = "Move HEAD to another commit")]
    Reset {
        #[arg(index = 1, help = "The revision to reset to")]
        target: String,
        #[arg(long, help = "Also restore the working directory to the target tree")]
        hard: bool,
    },
    #[command(name = "merge", about = "Merge another revision into HEAD")]
    Merge {
        #[arg(index = 1, help = "The revision to merge")]
        target: String,
    },
    #[command(
        name = "merge-base",
        about = "Print the first common ancestor of two revisions"
    )]
    MergeBase {
        #[arg(index = 1, help = "The first revision")]
        first: String,
        #[arg(index = 2, help = "The second revision")]
        second: String,
    },
    #[command(name = "fetch", about = "Fetch branches from a filesystem remote")]
    Fetch {
        #[arg(index = 1, help = "The path to the remote repository")]
        remote: String,
    },
    #[command(name = "push", about = "Push a branch to a filesystem remote")]
    Push {
        #[arg(index = 1, help = "The path to the remote repository")]
        remote: String,
        #[arg(index = 2, help = "The branch to push")]
        branch: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => open_repository()?,
            };

            repository.init()?
        }
        Commands::HashObject { write, file } => open_repository()?.hash_object(file, *write)?,
        Commands::CatFile { object, kind } => {
            open_repository()?.cat_file(object, kind.as_deref())?
        }
        Commands::WriteTree => open_repository()?.write_tree_command()?,
        Commands::ReadTree { tree } => open_repository()?.read_tree(tree)?,
        Commands::Commit { message } => {
            open_repository()?.commit(message)?;
        }
        Commands::Log { revision } => open_repository()?.log(revision.as_deref())?,
        Commands::Checkout { target } => open_repository()?.checkout(target)?,
        Commands::Branch { name, start_point } => {
            open_repository()?.branch(name.as_deref(), start_point.as_deref())?
        }
        Commands::Tag {
            name,
            target,
            delete,
        } => {
            let repository = open_repository()?;
            if *delete {
                repository.delete_tag(name)?
            } else {
                repository.tag(name, target.as_deref())?
            }
        }
        Commands::Status => open_repository()?.status()?,
        Commands::Diff { revision } => open_repository()?.diff(revision.as_deref())?,
        Commands::Reset { target, hard } => open_repository()?.reset(target, *hard)?,
        Commands::Merge { target } => open_repository()?.merge(target)?,
        Commands::MergeBase { first, second } => open_repository()?.merge_base(first, second)?,
        Commands::Fetch { remote } => open_repository()?.fetch(remote)?,
        Commands::Push { remote, branch } => open_repository()?.push(remote, branch)?,
    }

    Ok(())
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
}
