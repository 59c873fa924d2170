use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use keel_engine::{rewrite_project, RewriteSummary};
use keel_git::{GitClient, GitConfig};
use keel_identity::ProjectIdentity;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "keel",
    version,
    about = "Scaffold a backend service from a template repository"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clone the template and re-key it to a new project identity
    New(NewArgs),
}

#[derive(Args)]
struct NewArgs {
    /// Human-readable project name, e.g. "Order Service"
    #[arg(long)]
    name: String,
    /// Dot-separated namespace, e.g. com.acme
    #[arg(long)]
    namespace: String,
    /// Short module identifier, e.g. order-svc
    #[arg(long)]
    module: String,
    /// Template repository URL or local path
    #[arg(long, env = "KEEL_TEMPLATE")]
    template: String,
    /// Destination directory (defaults to the module name)
    #[arg(long)]
    dest: Option<PathBuf>,
    /// Skip repository initialization and the initial commit
    #[arg(long)]
    no_git: bool,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::New(args) => {
            // The identity gates everything; nothing touches the filesystem
            // until all three fields pass validation.
            let identity = ProjectIdentity::new(&args.name, &args.namespace, &args.module)?;
            let dest = args
                .dest
                .clone()
                .unwrap_or_else(|| PathBuf::from(identity.module()));
            tracing::info!(
                target = "keel.cli",
                dest = %dest.display(),
                package = %identity.package_token(),
                "scaffolding project"
            );

            // Scaffold in a scratch directory beside the destination and move
            // the tree into place only once every step has succeeded. A failed
            // run drops the scratch tree and leaves no destination behind.
            let parent = match dest.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            std::fs::create_dir_all(&parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
            let staging = tempfile::Builder::new()
                .prefix(".keel-")
                .tempdir_in(&parent)
                .context("failed to create a staging directory")?;

            let git = GitClient::new(GitConfig::default());
            git.fetch_template(&args.template, staging.path())
                .context("failed to fetch the template")?;

            let summary = rewrite_project(staging.path(), &identity)
                .with_context(|| format!("failed to rewrite for {}", dest.display()))?;

            let committed = !args.no_git;
            if committed {
                git.finalize(staging.path())
                    .context("failed to initialize the project repository")?;
            }

            std::fs::rename(staging.path(), &dest).with_context(|| {
                format!("failed to move the scaffolded tree to {}", dest.display())
            })?;

            print_report(
                &NewReport::new(&dest, staging.path(), summary, committed),
                args.json,
            )?;
            Ok(0)
        }
    }
}

#[derive(Serialize)]
struct NewReport {
    root: PathBuf,
    package: String,
    entry_point: PathBuf,
    removed_dirs: Vec<PathBuf>,
    committed: bool,
}

impl NewReport {
    /// `rewrite_root` is the directory the summary paths are under, which is
    /// the staging tree rather than the final destination.
    fn new(root: &Path, rewrite_root: &Path, summary: RewriteSummary, committed: bool) -> Self {
        let rel = |p: PathBuf| {
            p.strip_prefix(rewrite_root)
                .map(Path::to_path_buf)
                .unwrap_or(p)
        };
        Self {
            root: root.to_path_buf(),
            package: summary.package_token,
            entry_point: rel(summary.entry_point),
            removed_dirs: summary.removed_dirs.into_iter().map(rel).collect(),
            committed,
        }
    }
}

fn print_report(report: &NewReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("scaffolded: {}", report.root.display());
    println!("  package: {}", report.package);
    println!("  entry_point: {}", report.entry_point.display());
    for dir in &report.removed_dirs {
        println!("  removed: {}", dir.display());
    }
    println!("  committed: {}", report.committed);
    Ok(())
}
