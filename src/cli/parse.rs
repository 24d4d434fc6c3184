//! CLI parse: clap types for imgdiff. No behavior; definitions only.

use crate::report::ReportFormat;
use crate::tree::SymlinkPolicy;
use clap::Parser;
use std::path::PathBuf;

/// imgdiff - binary diff of two built filesystem images
#[derive(Parser, Debug)]
#[command(name = "imgdiff")]
#[command(version)]
#[command(about = "Image and directory binary diff tool for build reproducibility checks")]
pub struct Cli {
    /// Left image: a directory or a .tar.bz2 (also .tar.gz, .tar) archive
    #[arg(value_name = "IMAGE_FILE")]
    pub left: PathBuf,

    /// Right image: a directory or a .tar.bz2 (also .tar.gz, .tar) archive
    #[arg(value_name = "IMAGE_FILE")]
    pub right: PathBuf,

    /// Run the deep-diff tool (diffoscope by default) on files that do not match
    #[arg(short = 'd', long, alias = "diffoscope")]
    pub deep_diff: bool,

    /// Write the report to this file instead of stdout
    #[arg(short = 'o', long)]
    pub output_file: Option<PathBuf>,

    /// Append statistics about the diff
    #[arg(short = 's', long)]
    pub stats: bool,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Disable colored report headings
    #[arg(long)]
    pub no_color: bool,

    /// Symlink handling
    #[arg(long, value_enum)]
    pub symlinks: Option<SymlinkPolicy>,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}
