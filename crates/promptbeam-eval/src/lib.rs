// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Text similarity metrics for Promptbeam
//!
//! Lightweight lexical metrics implementing [`promptbeam::Metric`].
//! Embedding-based similarity lives behind the same trait in downstream
//! crates; everything here is pure string comparison.

pub mod metric;

pub use metric::{ExactMatch, F1Score, TokenOverlap};
