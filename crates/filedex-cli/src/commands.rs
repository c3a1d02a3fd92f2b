use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use filedex_index::{
    get_all_files, get_all_folders, group_by_folder, summarize, DerivedFieldPolicy, IndexStore,
    RefreshReport,
};
use filedex_persist::{load_index_report, save_index};
use filedex_scan::{LocalFileSystem, ScanConfig, ScanOutcome, Scanner};
use filedex_types::FileRecord;
use serde::Serialize;

use crate::cli::*;
use crate::config::FiledexConfig;
use crate::hash::Blake3Hook;

struct Session {
    config: FiledexConfig,
    index_path: PathBuf,
    format: OutputFormat,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = FiledexConfig::load(cli.config.as_deref())?;
    let index_path = cli.index.clone().unwrap_or_else(|| config.index_path.clone());
    let ctx = Session {
        config,
        index_path,
        format: cli.format,
    };

    match cli.command {
        Command::Build(args) => cmd_build(&ctx, args),
        Command::Refresh(args) => cmd_refresh(&ctx, args),
        Command::Files(_) => cmd_files(&ctx),
        Command::Folders(args) => cmd_folders(&ctx, args),
        Command::Groups(_) => cmd_groups(&ctx),
        Command::Stats(_) => cmd_stats(&ctx),
        Command::Tag(args) => cmd_tag(&ctx, args, true),
        Command::Untag(args) => cmd_tag(&ctx, args, false),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn resolve_roots(ctx: &Session, roots: Vec<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
    let roots = if roots.is_empty() { ctx.config.roots.clone() } else { roots };
    if roots.is_empty() {
        bail!("no root paths given and none configured");
    }
    Ok(roots)
}

fn scanner(config: &ScanConfig, hash: bool) -> Scanner<LocalFileSystem> {
    let scanner = Scanner::local(config);
    if hash { scanner.with_hook(Blake3Hook) } else { scanner }
}

fn load(ctx: &Session) -> anyhow::Result<IndexStore> {
    let (index, report) = load_index_report(&ctx.index_path)
        .with_context(|| format!("failed to load index {}", ctx.index_path.display()))?;
    if !report.skipped.is_empty() && matches!(ctx.format, OutputFormat::Text) {
        eprintln!(
            "{} skipped {} malformed record(s) in {}",
            "!".yellow().bold(),
            report.skipped.len(),
            ctx.index_path.display()
        );
    }
    Ok(index)
}

fn save(ctx: &Session, index: &IndexStore) -> anyhow::Result<()> {
    save_index(index, &ctx.index_path)
        .with_context(|| format!("failed to save index {}", ctx.index_path.display()))
}

fn cmd_build(ctx: &Session, args: BuildArgs) -> anyhow::Result<()> {
    let roots = resolve_roots(ctx, args.roots)?;
    let ScanOutcome { records, skipped } = scanner(&ctx.config.scan, args.hash).scan(&roots);
    let index = IndexStore::from_records(records);
    save(ctx, &index)?;

    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "index": ctx.index_path,
            "files": index.len(),
            "skipped": skipped,
        })),
        OutputFormat::Text => {
            println!(
                "{} Indexed {} files from {} root(s) into {}",
                "✓".green().bold(),
                index.len().to_string().bold(),
                roots.len(),
                ctx.index_path.display().to_string().bold()
            );
            for s in &skipped {
                println!("  {} {} ({})", "skipped:".yellow(), s.path.display(), s.reason);
            }
            Ok(())
        }
    }
}

fn cmd_refresh(ctx: &Session, args: RefreshArgs) -> anyhow::Result<()> {
    let roots = resolve_roots(ctx, args.roots)?;
    let mut policy = ctx.config.refresh.clone();
    if args.overwrite_derived {
        policy.derived_fields = DerivedFieldPolicy::Overwrite;
    }
    if args.prune {
        policy.prune_stale = true;
    }

    let mut index = load(ctx)?;
    let report = index.refresh(&scanner(&ctx.config.scan, args.hash), &roots, &policy);
    save(ctx, &index)?;

    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print_refresh_report(&report, index.len());
            Ok(())
        }
    }
}

fn print_refresh_report(report: &RefreshReport, total: usize) {
    if report.is_clean() {
        println!("{} Index up to date ({} files).", "✓".green().bold(), total);
        return;
    }
    for path in &report.added {
        println!("  {} {}", "added:".green(), path);
    }
    for path in &report.updated {
        println!("  {} {}", "updated:".cyan(), path);
    }
    for path in &report.removed {
        println!("  {} {}", "removed:".red(), path);
    }
    let kept_stale = report.stale.len() - report.removed.len();
    if kept_stale > 0 {
        println!("  {} {} file(s) no longer found (use --prune to remove)", "stale:".yellow(), kept_stale);
    }
    for s in &report.skipped {
        println!("  {} {} ({})", "skipped:".yellow(), s.path.display(), s.reason);
    }
    println!(
        "{} {} change(s), {} files indexed.",
        "✓".green().bold(),
        report.total_changes(),
        total
    );
}

fn cmd_files(ctx: &Session) -> anyhow::Result<()> {
    let index = load(ctx)?;
    let files = get_all_files(&index);
    match ctx.format {
        OutputFormat::Json => print_json(&files),
        OutputFormat::Text => {
            for f in &files {
                println!("{}  {}", f.name.bold(), f.path.dimmed());
            }
            Ok(())
        }
    }
}

fn cmd_folders(ctx: &Session, args: FoldersArgs) -> anyhow::Result<()> {
    let index = load(ctx)?;
    let mut folders = get_all_folders(&index);
    if args.unique {
        let mut seen = std::collections::HashSet::new();
        folders.retain(|f| seen.insert(*f));
    }
    match ctx.format {
        OutputFormat::Json => print_json(&folders),
        OutputFormat::Text => {
            for folder in folders {
                println!("{}", folder_label(folder));
            }
            Ok(())
        }
    }
}

fn folder_label(folder: &str) -> String {
    if folder.is_empty() { "(no folder)".to_string() } else { folder.to_string() }
}

fn cmd_groups(ctx: &Session) -> anyhow::Result<()> {
    let index = load(ctx)?;
    let groups = group_by_folder(&index);
    match ctx.format {
        OutputFormat::Json => print_json(&groups),
        OutputFormat::Text => {
            for (folder, records) in &groups {
                println!("{} ({})", folder_label(folder).yellow().bold(), records.len());
                for record in records {
                    print_record_line(record);
                }
            }
            Ok(())
        }
    }
}

fn print_record_line(record: &FileRecord) {
    let tags = if record.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", record.tags.join(", "))
    };
    println!("  {} {} bytes{}", record.name, record.size, tags.cyan());
}

fn cmd_stats(ctx: &Session) -> anyhow::Result<()> {
    let index = load(ctx)?;
    let summary = summarize(&index);
    match ctx.format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Text => {
            println!("Index: {}", ctx.index_path.display().to_string().bold());
            println!("  Files: {}", summary.files.to_string().bold());
            println!("  Bytes: {}", summary.total_bytes);
            println!("  Folders: {}", summary.folders);
            println!(
                "  Newest: {}",
                summary.newest_modified.as_deref().unwrap_or("-")
            );
            Ok(())
        }
    }
}

fn cmd_tag(ctx: &Session, args: TagArgs, add: bool) -> anyhow::Result<()> {
    let mut index = load(ctx)?;
    let path = resolve_indexed_path(&index, &args.path);
    let changed = if add {
        index.tag(&path, &args.tag)?
    } else {
        index.untag(&path, &args.tag)?
    };
    if changed {
        save(ctx, &index)?;
    }
    let verb = if add { "Tagged" } else { "Untagged" };
    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "path": path,
            "tag": args.tag,
            "changed": changed,
        })),
        OutputFormat::Text => {
            if changed {
                println!("{} {} {} {}", "✓".green(), verb, path, args.tag.yellow());
            } else {
                println!("No change to {}.", path);
            }
            Ok(())
        }
    }
}

/// Use `path` as typed when it is indexed, else its canonical form.
fn resolve_indexed_path(index: &IndexStore, path: &str) -> String {
    if index.contains(path) {
        return path.to_string();
    }
    std::fs::canonicalize(Path::new(path))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use filedex_persist::load_index;
    use std::fs;

    fn run(args: &[&str]) -> anyhow::Result<()> {
        run_command(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn build_tag_refresh_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("docs");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), b"one").unwrap();
        let index_file = tmp.path().join("index.json");
        let config = tmp.path().join("filedex.toml");
        fs::write(&config, "").unwrap();

        let root_s = root.to_str().unwrap();
        let index_s = index_file.to_str().unwrap();
        let config_s = config.to_str().unwrap();

        run(&["filedex", "--config", config_s, "--index", index_s, "build", root_s]).unwrap();
        assert_eq!(load_index(&index_file).unwrap().len(), 1);

        let a_path = root.join("a.txt");
        let a_s = a_path.to_str().unwrap();
        run(&["filedex", "--config", config_s, "--index", index_s, "tag", a_s, "keep"]).unwrap();

        fs::write(root.join("b.txt"), b"two").unwrap();
        run(&["filedex", "--config", config_s, "--index", index_s, "refresh", root_s]).unwrap();

        let index = load_index(&index_file).unwrap();
        assert_eq!(index.len(), 2);
        let a = index.iter().find(|r| r.name == "a.txt").unwrap();
        assert_eq!(a.tags, vec!["keep"]);

        run(&["filedex", "--config", config_s, "--index", index_s, "--format", "json", "groups"]).unwrap();
        run(&["filedex", "--config", config_s, "--index", index_s, "stats"]).unwrap();
    }

    #[test]
    fn refresh_without_roots_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("filedex.toml");
        fs::write(&config, "").unwrap();
        let index_file = tmp.path().join("index.json");
        let err = run(&[
            "filedex",
            "--config",
            config.to_str().unwrap(),
            "--index",
            index_file.to_str().unwrap(),
            "refresh",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("no root paths"));
    }

    #[test]
    fn tag_unknown_path_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("filedex.toml");
        fs::write(&config, "").unwrap();
        let index_file = tmp.path().join("index.json");
        assert!(run(&[
            "filedex",
            "--config",
            config.to_str().unwrap(),
            "--index",
            index_file.to_str().unwrap(),
            "tag",
            "/not/indexed",
            "x",
        ])
        .is_err());
    }

    #[test]
    fn folder_label_names_missing_folder() {
        assert_eq!(folder_label(""), "(no folder)");
        assert_eq!(folder_label("docs"), "docs");
    }
}
