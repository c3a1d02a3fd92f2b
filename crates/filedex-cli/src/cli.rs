use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "filedex",
    about = "filedex: index and query file metadata",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file (defaults to ./filedex.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Index file, overriding the configured one
    #[arg(long, global = true)]
    pub index: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan roots from scratch and write a new index
    Build(BuildArgs),
    /// Rescan roots and merge the result into the existing index
    Refresh(RefreshArgs),
    /// List indexed (name, path) pairs
    Files(FilesArgs),
    /// List the folder of every indexed file
    Folders(FoldersArgs),
    /// Show files grouped by folder
    Groups(GroupsArgs),
    /// Show index totals
    Stats(StatsArgs),
    /// Add a label to an indexed file
    Tag(TagArgs),
    /// Remove a label from an indexed file
    Untag(TagArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Root directories (defaults to the configured roots)
    pub roots: Vec<PathBuf>,
    /// Record a BLAKE3 content hash for every file
    #[arg(long)]
    pub hash: bool,
}

#[derive(Args)]
pub struct RefreshArgs {
    pub roots: Vec<PathBuf>,
    #[arg(long)]
    pub hash: bool,
    /// Replace tags, preview text and hash with the scan's values
    #[arg(long)]
    pub overwrite_derived: bool,
    /// Remove records for files that no longer exist
    #[arg(long)]
    pub prune: bool,
}

#[derive(Args)]
pub struct FilesArgs {}

#[derive(Args)]
pub struct FoldersArgs {
    /// Print each folder once
    #[arg(short, long)]
    pub unique: bool,
}

#[derive(Args)]
pub struct GroupsArgs {}

#[derive(Args)]
pub struct StatsArgs {}

#[derive(Args)]
pub struct TagArgs {
    pub path: String,
    pub tag: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build() {
        let cli = Cli::try_parse_from(["filedex", "build", "/a", "/b"]).unwrap();
        if let Command::Build(args) = cli.command {
            assert_eq!(args.roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
            assert!(!args.hash);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_build_with_hash() {
        let cli = Cli::try_parse_from(["filedex", "build", "--hash", "/a"]).unwrap();
        if let Command::Build(args) = cli.command {
            assert!(args.hash);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_refresh_flags() {
        let cli = Cli::try_parse_from(["filedex", "refresh", "--prune", "--overwrite-derived"]).unwrap();
        if let Command::Refresh(args) = cli.command {
            assert!(args.prune);
            assert!(args.overwrite_derived);
            assert!(args.roots.is_empty());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_folders_unique() {
        let cli = Cli::try_parse_from(["filedex", "folders", "-u"]).unwrap();
        if let Command::Folders(args) = cli.command {
            assert!(args.unique);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_tag() {
        let cli = Cli::try_parse_from(["filedex", "tag", "/a/b.txt", "work"]).unwrap();
        if let Command::Tag(args) = cli.command {
            assert_eq!(args.path, "/a/b.txt");
            assert_eq!(args.tag, "work");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "filedex", "stats", "--verbose", "--format", "json", "--index", "idx.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.index, Some(PathBuf::from("idx.json")));
        assert!(matches!(cli.command, Command::Stats(_)));
    }

    #[test]
    fn tag_requires_both_arguments() {
        assert!(Cli::try_parse_from(["filedex", "tag", "/a"]).is_err());
    }
}
