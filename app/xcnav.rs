//! Command-line interface for xcnav.
//!
//! `xcnav tree` prints the navigator of an Xcode project, `xcnav report`
//! writes a document with the project's tree and file contents.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::exit;
use xcnav::output::{self, OutputFormat};
use xcnav::{
    ConfigFile, ContentStatus, NavigatorBuilder, ProjectDescriptor, RenderOptions, Report,
    ReportBuilder, XcnavError, build_navigator, locate_project, render_tree, report,
    report_from_tree, sanitize,
};

/// xcnav: Xcode project navigator and report tool
#[derive(Parser)]
#[command(name = "xcnav", version, about, long_about = None)]
struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (TOML with [tree] and [report] sections)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the project navigator tree
    Tree(TreeArgs),
    /// Write a report with the project tree and file contents
    Report(ReportArgs),
}

#[derive(Args)]
struct TreeArgs {
    /// Project directory, .xcodeproj bundle or project.pbxproj (default current dir)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = TreeFormat::Text)]
    format: TreeFormat,

    /// Pretty JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Print names without icons
    #[arg(long)]
    no_icons: bool,

    /// Omit the target listing
    #[arg(long)]
    no_targets: bool,

    /// Directory name globs skipped in synchronized folders
    #[arg(long, value_delimiter = ',')]
    ignore_dirs: Vec<String>,

    /// File name globs skipped in synchronized folders
    #[arg(long, value_delimiter = ',')]
    ignore_files: Vec<String>,
}

#[derive(Args)]
struct ReportArgs {
    /// Project directory
    path: PathBuf,

    /// Output file (default `<dir name>_report.<ext>` in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
    format: ReportFormat,

    /// Pretty JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Collect files from the project navigator instead of the directory
    #[arg(long)]
    navigator: bool,

    /// Character limit for code files (-1 for unlimited)
    #[arg(long, allow_negative_numbers = true)]
    max_code_chars: Option<i64>,

    /// Character limit for data files (-1 for unlimited)
    #[arg(long, allow_negative_numbers = true)]
    max_data_chars: Option<i64>,

    /// Character limit for project.pbxproj (-1 for unlimited)
    #[arg(long, allow_negative_numbers = true)]
    max_pbxproj_chars: Option<i64>,

    /// Directory name globs to skip
    #[arg(long, value_delimiter = ',')]
    ignore_dirs: Vec<String>,

    /// File name globs to skip
    #[arg(long, value_delimiter = ',')]
    ignore_files: Vec<String>,

    /// Code file extensions or names
    #[arg(long, value_delimiter = ',')]
    code_exts: Vec<String>,

    /// Data file extensions or names
    #[arg(long, value_delimiter = ',')]
    data_exts: Vec<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TreeFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Markdown,
    Text,
    Json,
}

impl From<ReportFormat> for OutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Markdown => OutputFormat::Markdown,
            ReportFormat::Text => OutputFormat::Text,
            ReportFormat::Json => OutputFormat::Json,
        }
    }
}

#[cfg(feature = "logging")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "xcnav=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    #[cfg(feature = "logging")]
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => match ConfigFile::load(path) {
            Ok(config) => config,
            Err(e) => fail(e),
        },
        None => ConfigFile::default(),
    };

    let result = match cli.command {
        Command::Tree(args) => run_tree(args, config),
        Command::Report(args) => run_report(args, config),
    };
    if let Err(e) = result {
        fail(e);
    }
}

fn fail(e: XcnavError) -> ! {
    eprintln!("Error: {}", e);
    exit(1);
}

fn run_tree(args: TreeArgs, config: ConfigFile) -> Result<(), XcnavError> {
    let location = locate_project(&args.path)?;
    let descriptor = ProjectDescriptor::load(&location.descriptor)?;
    let mut builder = NavigatorBuilder::new(&location.root).scan_options(config.tree);
    if !args.ignore_dirs.is_empty() {
        builder = builder.ignore_dirs(args.ignore_dirs);
    }
    if !args.ignore_files.is_empty() {
        builder = builder.ignore_files(args.ignore_files);
    }
    let tree = build_navigator(&descriptor, &builder.build())?;

    match args.format {
        TreeFormat::Text => {
            let options = RenderOptions {
                icons: !args.no_icons,
                targets: !args.no_targets,
            };
            println!("{}", render_tree(&tree, &options));
        }
        TreeFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(&tree)?
            } else {
                serde_json::to_string(&tree)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_report(args: ReportArgs, config: ConfigFile) -> Result<(), XcnavError> {
    let mut builder = ReportBuilder::new(&args.path)
        .scan_options(config.report.scan)
        .content_options(config.report.content);
    if !args.ignore_dirs.is_empty() {
        builder = builder.ignore_dirs(args.ignore_dirs);
    }
    if !args.ignore_files.is_empty() {
        builder = builder.ignore_files(args.ignore_files);
    }
    if !args.code_exts.is_empty() {
        builder = builder.code_extensions(args.code_exts);
    }
    if !args.data_exts.is_empty() {
        builder = builder.data_extensions(args.data_exts);
    }
    if let Some(limit) = args.max_code_chars {
        builder = builder.max_code_chars(limit);
    }
    if let Some(limit) = args.max_data_chars {
        builder = builder.max_data_chars(limit);
    }
    if let Some(limit) = args.max_pbxproj_chars {
        builder = builder.max_pbxproj_chars(limit);
    }
    let options = builder.build();

    let result: Report = if args.navigator {
        let location = locate_project(&options.root)?;
        let descriptor = ProjectDescriptor::load(&location.descriptor)?;
        let navigator_options = NavigatorBuilder::new(&location.root)
            .scan_options(config.tree)
            .build();
        let tree = build_navigator(&descriptor, &navigator_options)?;
        report_from_tree(&location.root, tree.root, &options.content)
    } else {
        report(&options)?
    };

    let format = OutputFormat::from(args.format);
    let path = args
        .output
        .unwrap_or_else(|| default_output_path(&result.root, format));
    output::write_report_to_file(&result, format, &path, args.pretty)?;
    let summary = &result.summary;
    println!(
        "Wrote {} ({} files: {} partial, {} non-text, {} errors)",
        path.display(),
        summary.total,
        result
            .files
            .iter()
            .filter(|f| f.status == ContentStatus::Partial)
            .count(),
        summary.non_text,
        summary.errors,
    );
    Ok(())
}

fn default_output_path(root: &Path, format: OutputFormat) -> PathBuf {
    let name = root
        .file_name()
        .map(|n| sanitize(&n.to_string_lossy()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "project".to_string());
    PathBuf::from(format!("{}_report.{}", name, format.extension()))
}
