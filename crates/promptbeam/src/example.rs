// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Labeled evaluation examples

use serde::{Deserialize, Serialize};

/// A single labeled example: an input and the expected output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalExample {
    /// Input sent as the user message
    pub input: String,
    /// Expected/reference output for metric evaluation
    pub expected: String,
}

impl EvalExample {
    /// Create a new example
    pub fn new(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected: expected.into(),
        }
    }
}

/// A fixed evaluation set for one optimization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalSet {
    /// The examples
    pub examples: Vec<EvalExample>,
}

impl EvalSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an example
    pub fn example(mut self, input: impl Into<String>, expected: impl Into<String>) -> Self {
        self.examples.push(EvalExample::new(input, expected));
        self
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Examples as a slice
    pub fn as_slice(&self) -> &[EvalExample] {
        &self.examples
    }
}

impl From<Vec<EvalExample>> for EvalSet {
    fn from(examples: Vec<EvalExample>) -> Self {
        Self { examples }
    }
}
