// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Durable run records.
//!
//! Writes are fire-and-forget: the optimization loop never waits on or
//! aborts for a failed write. I/O errors are logged and swallowed.

use crate::candidate::{Candidate, OptimizeResult};
use crate::context::RunContext;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use tracing::{info, warn};

/// Parameters recorded at the start of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunParameters {
    /// Seed prompt
    pub base_prompt: String,
    /// Model used for variation generation
    pub generator_model: String,
    /// Model used for evaluation
    pub evaluator_model: String,
    /// Population size per round
    pub breadth: usize,
    /// Number of rounds
    pub max_rounds: u32,
    /// Early-stopping threshold
    pub pruning_threshold: f64,
    /// Generation temperature
    pub temperature: f32,
    /// Run id
    pub run_start: String,
}

/// Append-only record of run parameters, per-candidate results, and the
/// final summary.
pub trait ResultStore: Send {
    /// Record run parameters at the start of a run
    fn write_parameters(&mut self, params: &RunParameters);

    /// Record one scored candidate
    fn record_candidate(&mut self, candidate: &Candidate);

    /// Record the final summary
    fn write_final_summary(&mut self, summary: &OptimizeResult);
}

/// File-backed store: a line-delimited results file, a CSV audit log, and
/// a pretty-printed final summary.
pub struct JsonlStore {
    context: RunContext,
}

impl JsonlStore {
    /// Create the store, its directory, and the audit log header
    pub fn new(context: RunContext) -> Result<Self> {
        std::fs::create_dir_all(context.results_dir())?;

        let mut audit = File::create(context.audit_path())?;
        audit.write_all(b"Round,Variation,Fitness,Prompt\n")?;

        info!(path = %context.audit_path().display(), "logging prompts");
        Ok(Self { context })
    }

    /// The run context this store writes under
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Audit preview: newlines flattened, quotes doubled, at most 100
    /// characters, with an ellipsis marker when the prompt was longer.
    fn preview(prompt: &str) -> String {
        let escaped = prompt.replace('\n', " ").replace('"', "\"\"");
        let mut preview: String = escaped.chars().take(100).collect();
        if prompt.chars().count() > 100 {
            preview.push_str("...");
        }
        preview
    }

    fn try_write_parameters(&self, params: &RunParameters) -> std::io::Result<()> {
        let mut file = File::create(self.context.results_path())?;
        let line = serde_json::json!({ "parameters": params });
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn try_record_candidate(&self, candidate: &Candidate) -> std::io::Result<()> {
        let mut results = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.context.results_path())?;
        let record = candidate.record();
        writeln!(
            results,
            "{}",
            serde_json::to_string(&record).map_err(std::io::Error::other)?
        )?;

        let mut audit = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.context.audit_path())?;
        writeln!(
            audit,
            "{},{},{:.4},\"{}\"",
            candidate.round,
            candidate.index + 1,
            record.fitness,
            Self::preview(&candidate.prompt)
        )?;
        Ok(())
    }

    fn try_write_summary(&self, summary: &OptimizeResult) -> std::io::Result<()> {
        let file = File::create(self.context.summary_path())?;
        serde_json::to_writer_pretty(file, summary).map_err(std::io::Error::other)?;
        Ok(())
    }
}

impl ResultStore for JsonlStore {
    fn write_parameters(&mut self, params: &RunParameters) {
        if let Err(e) = self.try_write_parameters(params) {
            warn!(error = %e, "failed to write run parameters");
        }
    }

    fn record_candidate(&mut self, candidate: &Candidate) {
        if let Err(e) = self.try_record_candidate(candidate) {
            warn!(error = %e, "failed to record candidate");
        }
    }

    fn write_final_summary(&mut self, summary: &OptimizeResult) {
        if let Err(e) = self.try_write_summary(summary) {
            warn!(error = %e, "failed to write final summary");
        } else {
            info!(path = %self.context.summary_path().display(), "results saved");
        }
    }
}

/// In-memory store for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Recorded parameters, if any
    pub parameters: Option<RunParameters>,
    /// Every recorded candidate, in record order
    pub candidates: Vec<Candidate>,
    /// The final summary, if written
    pub summary: Option<OptimizeResult>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryStore {
    fn write_parameters(&mut self, params: &RunParameters) {
        self.parameters = Some(params.clone());
    }

    fn record_candidate(&mut self, candidate: &Candidate) {
        self.candidates.push(candidate.clone());
    }

    fn write_final_summary(&mut self, summary: &OptimizeResult) {
        self.summary = Some(summary.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_prompt_untouched() {
        assert_eq!(JsonlStore::preview("short prompt"), "short prompt");
    }

    #[test]
    fn test_preview_escapes_and_truncates() {
        let long = format!("line1\nline2 \"quoted\" {}", "x".repeat(120));
        let preview = JsonlStore::preview(&long);
        assert!(preview.ends_with("..."));
        assert!(!preview.contains('\n'));
        assert!(preview.contains("\"\"quoted\"\""));
        assert_eq!(preview.chars().count(), 103);
    }

    #[test]
    fn test_memory_store_records() {
        let mut store = MemoryStore::new();
        store.record_candidate(&Candidate::new("p", 0, 0).scored(0.5));
        assert_eq!(store.candidates.len(), 1);
        assert_eq!(store.candidates[0].fitness, Some(0.5));
    }
}
