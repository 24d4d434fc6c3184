//! CLI route: run context and the single comparison pipeline.

use crate::cli::output::{EXIT_MATCH, EXIT_MISMATCH};
use crate::cli::parse::Cli;
use crate::compare::{compare, ComparisonStats};
use crate::config::{ConfigLoader, ImgdiffConfig};
use crate::deep_diff::DeepDiffRunner;
use crate::error::{ImgdiffError, TreeError};
use crate::image;
use crate::report::{self, Report};
use crate::tree::{Tree, TreeBuilder};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Result of a completed comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Both images hold the same files with the same content
    Match,
    /// At least one file differs or exists on one side only
    Mismatch,
}

impl RunOutcome {
    pub fn exit_code(self) -> u8 {
        match self {
            RunOutcome::Match => EXIT_MATCH,
            RunOutcome::Mismatch => EXIT_MISMATCH,
        }
    }
}

/// Runtime context for one comparison: resolved config plus run flags
#[derive(Debug, Clone)]
pub struct RunContext {
    config: ImgdiffConfig,
    left: PathBuf,
    right: PathBuf,
    deep_diff: bool,
    stats: bool,
    output_file: Option<PathBuf>,
}

impl RunContext {
    /// Create a context for two inputs with default flags
    pub fn new(config: ImgdiffConfig, left: PathBuf, right: PathBuf) -> Self {
        Self {
            config,
            left,
            right,
            deep_diff: false,
            stats: false,
            output_file: None,
        }
    }

    /// Build the context from parsed arguments, loading layered config
    pub fn from_cli(cli: &Cli) -> Result<Self, ImgdiffError> {
        let mut config = ConfigLoader::load(cli.config.as_deref())?;
        apply_cli_overrides(&mut config, cli);
        config
            .logging
            .validate()
            .map_err(crate::error::ConfigError::Invalid)?;

        Ok(Self {
            deep_diff: cli.deep_diff,
            stats: cli.stats,
            output_file: cli.output_file.clone(),
            ..Self::new(config, cli.left.clone(), cli.right.clone())
        })
    }

    pub fn with_deep_diff(mut self, enabled: bool) -> Self {
        self.deep_diff = enabled;
        self
    }

    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.stats = enabled;
        self
    }

    pub fn with_output_file(mut self, path: Option<PathBuf>) -> Self {
        self.output_file = path;
        self
    }

    pub fn config(&self) -> &ImgdiffConfig {
        &self.config
    }

    /// Resolve both images, compare them and emit the report
    ///
    /// Extracted archives live until this returns, on success or error.
    pub fn execute(&self) -> Result<RunOutcome, ImgdiffError> {
        let report = self.compare_images()?;
        let rendered = report::render(&report, self.config.report.format, self.use_color())?;
        self.emit(&rendered)?;

        Ok(if report.matched {
            RunOutcome::Match
        } else {
            RunOutcome::Mismatch
        })
    }

    /// Resolve, build and compare without emitting anything
    pub fn compare_images(&self) -> Result<Report, ImgdiffError> {
        let start = Instant::now();
        let (left_image, right_image) = image::resolve_pair(&self.left, &self.right)?;

        let (left_tree, right_tree) = self.build_trees(left_image.root(), right_image.root())?;
        let result = compare(&left_tree, &right_tree);
        info!(
            identical = result.identical.len(),
            different = result.different.len(),
            only_in_left = result.only_in_left.len(),
            only_in_right = result.only_in_right.len(),
            duration_ms = start.elapsed().as_millis(),
            "Comparison completed"
        );

        let mut report = Report::new(
            left_image.source().display().to_string(),
            right_image.source().display().to_string(),
            result,
        );

        if self.stats {
            report.stats = Some(ComparisonStats::new(&left_tree, &right_tree, &report.result));
        }

        if self.deep_diff {
            let runner = DeepDiffRunner::new(self.config.deep_diff.clone());
            for path in &report.result.different {
                if let (Some(l), Some(r)) = (left_tree.get(path), right_tree.get(path)) {
                    let outcome = runner.run(&l.source_path, &r.source_path);
                    report.deep_diffs.insert(path.clone(), outcome);
                }
            }
        }

        Ok(report)
    }

    fn tree_builder(&self, root: &Path) -> TreeBuilder {
        TreeBuilder::new(root.to_path_buf())
            .with_walker_config(self.config.walk.walker_config())
            .with_chunk_size(self.config.walk.chunk_size)
    }

    /// Build both trees side by side; neither build shares state with the other
    fn build_trees(&self, left_root: &Path, right_root: &Path) -> Result<(Tree, Tree), TreeError> {
        let left_builder = self.tree_builder(left_root);
        let right_builder = self.tree_builder(right_root);

        std::thread::scope(|scope| {
            let left = scope.spawn(|| left_builder.build());
            let right = right_builder.build();
            let left = left
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            Ok((left?, right?))
        })
    }

    fn use_color(&self) -> bool {
        self.config.report.color && self.output_file.is_none() && std::io::stdout().is_terminal()
    }

    fn emit(&self, rendered: &str) -> Result<(), ImgdiffError> {
        let mut text = rendered.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }

        match self.output_file {
            Some(ref path) => {
                debug!(output = %path.display(), "Writing report to file");
                std::fs::write(path, text).map_err(ImgdiffError::Output)
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .and_then(|_| stdout.flush())
                    .map_err(ImgdiffError::Output)
            }
        }
    }
}

/// Fold CLI flags over the loaded configuration
///
/// Flags win over every config layer; `--log-level` wins over `--verbose`.
pub fn apply_cli_overrides(config: &mut ImgdiffConfig, cli: &Cli) {
    if let Some(symlinks) = cli.symlinks {
        config.walk.symlinks = symlinks;
    }
    if let Some(format) = cli.format {
        config.report.format = format;
    }
    if cli.no_color {
        config.report.color = false;
        config.logging.color = false;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = format.clone();
    }
}
