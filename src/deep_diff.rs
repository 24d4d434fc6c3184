//! External deep-diff tool invocation
//!
//! Runs a content diffing program (diffoscope by default) on a mismatched
//! pair and captures what it prints. The tool's verdict never changes the
//! comparison outcome.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Deep-diff tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepDiffConfig {
    /// Program to execute, looked up on PATH
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the two file paths
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_program() -> String {
    "diffoscope".to_string()
}

impl Default for DeepDiffConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
        }
    }
}

impl DeepDiffConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("Deep-diff program cannot be empty".to_string());
        }
        Ok(())
    }
}

/// What the tool produced for one pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeepDiffOutcome {
    /// The tool ran; `exit_code` is None when it was killed by a signal
    Completed {
        exit_code: Option<i32>,
        output: String,
    },
    /// The tool could not be started
    Unavailable { message: String },
}

/// Runs the configured tool on file pairs
pub struct DeepDiffRunner {
    config: DeepDiffConfig,
}

impl DeepDiffRunner {
    pub fn new(config: DeepDiffConfig) -> Self {
        Self { config }
    }

    /// Diff `left` against `right`, capturing stdout followed by stderr
    pub fn run(&self, left: &Path, right: &Path) -> DeepDiffOutcome {
        debug!(
            program = %self.config.program,
            left = %left.display(),
            right = %right.display(),
            "Running deep-diff tool"
        );

        let output = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(left)
            .arg(right)
            .output();

        match output {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                DeepDiffOutcome::Completed {
                    exit_code: output.status.code(),
                    output: combined,
                }
            }
            Err(e) => {
                let message = format!("Call to {} failed: {}", self.config.program, e);
                warn!(left = %left.display(), "{}", message);
                DeepDiffOutcome::Unavailable { message }
            }
        }
    }
}
