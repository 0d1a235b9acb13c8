// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Property tests for the variation generator's exact-count contract.

use promptbeam::VariationGenerator;
use promptbeam_client::MockLm;
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    /// Whatever the LM returns, `generate(seed, count)` yields exactly
    /// `count` variations.
    #[test]
    fn generate_returns_exactly_count(count in 0usize..64, lines in 0usize..64) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let lm = Arc::new(MockLm::new("mock-gen", move |_| {
            Ok((0..lines)
                .map(|i| format!("variation {}", i))
                .collect::<Vec<_>>()
                .join("\n"))
        }));
        let generator = VariationGenerator::new(lm, 0.7);

        let variations = rt.block_on(generator.generate("seed", count));
        prop_assert_eq!(variations.len(), count);
    }

    /// A failing LM still yields exactly `count` fallback variants.
    #[test]
    fn failing_lm_still_returns_exactly_count(count in 0usize..64) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let lm = Arc::new(MockLm::new("mock-gen", |_| {
            Err(anyhow::anyhow!("service unavailable"))
        }));
        let generator = VariationGenerator::new(lm, 0.7);

        let variations = rt.block_on(generator.generate("seed", count));
        prop_assert_eq!(variations.len(), count);
    }
}
