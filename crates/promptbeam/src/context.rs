// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Run identity and output paths.
//!
//! A `RunContext` is constructed explicitly and passed in, rather than
//! derived from process-wide state, so tests can inject a fixed run id.

use std::path::{Path, PathBuf};

/// Identity and output location of one optimization run
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: String,
    results_dir: PathBuf,
}

impl RunContext {
    /// Create a context with a wall-clock run id
    pub fn new(results_dir: impl AsRef<Path>) -> Self {
        let run_id = chrono::Local::now()
            .format("%Y-%m-%d_%H-%M-%S%.6f")
            .to_string();
        Self::with_run_id(results_dir, run_id)
    }

    /// Create a context with an explicit run id
    pub fn with_run_id(results_dir: impl AsRef<Path>, run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            results_dir: results_dir.as_ref().to_path_buf(),
        }
    }

    /// The run id
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Directory all run artifacts are written under
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Path of the line-delimited results file
    pub fn results_path(&self) -> PathBuf {
        self.results_dir
            .join(format!("prompt_gen_{}.json", self.run_id))
    }

    /// Path of the CSV audit log
    pub fn audit_path(&self) -> PathBuf {
        self.results_dir.join(format!("prompts_{}.csv", self.run_id))
    }

    /// Path of the final summary file
    pub fn summary_path(&self) -> PathBuf {
        self.results_dir
            .join(format!("final_prompt_gen_{}.json", self.run_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_run_id() {
        let ctx = RunContext::with_run_id("results", "2025-01-01_00-00-00");
        assert_eq!(ctx.run_id(), "2025-01-01_00-00-00");
        assert_eq!(
            ctx.results_path(),
            PathBuf::from("results/prompt_gen_2025-01-01_00-00-00.json")
        );
        assert_eq!(
            ctx.audit_path(),
            PathBuf::from("results/prompts_2025-01-01_00-00-00.csv")
        );
        assert_eq!(
            ctx.summary_path(),
            PathBuf::from("results/final_prompt_gen_2025-01-01_00-00-00.json")
        );
    }

    #[test]
    fn test_clock_run_id_has_no_colons_or_spaces() {
        let ctx = RunContext::new("results");
        assert!(!ctx.run_id().contains(':'));
        assert!(!ctx.run_id().contains(' '));
    }
}
