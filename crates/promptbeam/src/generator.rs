// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! LM-powered prompt variation generation.
//!
//! This component never fails: service errors and shortfalls degrade to
//! trivially suffixed variants of the seed so the optimization loop can
//! always proceed with a full population.

use promptbeam_client::{ChatRequest, Lm, Message};
use std::sync::Arc;
use tracing::warn;

const GENERATION_SYSTEM_PROMPT: &str = "\
You are an expert prompt engineer. Your task is to generate creative variations of a given prompt.

Each variation should:
- Maintain the core intent of the original prompt
- Use different wording, structure, or approach
- Be practical and effective for the intended use case
- Explore different styles (concise, detailed, formal, casual, etc.)

Generate EXACTLY the requested number of variations, each on a new line.
Output ONLY the variations, nothing else.";

const GENERATION_MAX_TOKENS: u32 = 2000;

/// Generates reworded variations of a seed prompt
pub struct VariationGenerator {
    lm: Arc<dyn Lm>,
    temperature: f32,
}

impl VariationGenerator {
    /// Create a generator over an LM
    pub fn new(lm: Arc<dyn Lm>, temperature: f32) -> Self {
        Self { lm, temperature }
    }

    /// Model name of the underlying LM
    pub fn model(&self) -> &str {
        self.lm.model()
    }

    /// Generate exactly `count` variations of `seed`.
    ///
    /// A shortfall from the LM is padded with suffixed variants of the seed;
    /// an outright failure falls back to suffixed variants entirely. Both
    /// degradations are logged, never propagated.
    pub async fn generate(&self, seed: &str, count: usize) -> Vec<String> {
        if count == 0 {
            return Vec::new();
        }

        let user = format!(
            "Original prompt:\n{}\n\nGenerate {} creative variations of this prompt.",
            seed, count
        );
        let request = ChatRequest::new()
            .message(Message::system(GENERATION_SYSTEM_PROMPT))
            .message(Message::user(user))
            .with_temperature(self.temperature)
            .with_max_tokens(GENERATION_MAX_TOKENS);

        match self.lm.generate(request).await {
            Ok(response) => {
                let mut variations: Vec<String> = response
                    .text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();

                if variations.len() < count {
                    warn!(
                        generated = variations.len(),
                        requested = count,
                        "generated fewer variations than requested"
                    );
                    for i in variations.len()..count {
                        variations.push(Self::suffixed(seed, i + 1));
                    }
                }
                variations.truncate(count);
                variations
            }
            Err(e) => {
                warn!(error = %e, "error generating variations, using fallback variants");
                (1..=count).map(|i| Self::suffixed(seed, i)).collect()
            }
        }
    }

    fn suffixed(seed: &str, i: usize) -> String {
        format!("{} (variation {})", seed, i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptbeam_client::MockLm;

    fn generator<F>(respond: F) -> VariationGenerator
    where
        F: Fn(&ChatRequest<'_>) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        VariationGenerator::new(Arc::new(MockLm::new("mock-gen", respond)), 0.7)
    }

    #[tokio::test]
    async fn test_exact_count_from_clean_response() {
        let gen = generator(|_| Ok("one\ntwo\nthree".to_string()));
        let variations = gen.generate("seed", 3).await;
        assert_eq!(variations, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_surplus_truncated() {
        let gen = generator(|_| Ok("a\nb\nc\nd\ne".to_string()));
        let variations = gen.generate("seed", 2).await;
        assert_eq!(variations, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_shortfall_padded_with_suffixed_variants() {
        let gen = generator(|_| Ok("only one\n\n  \n".to_string()));
        let variations = gen.generate("seed", 3).await;
        assert_eq!(
            variations,
            vec!["only one", "seed (variation 2)", "seed (variation 3)"]
        );
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_suffixed_variants() {
        let gen = generator(|_| Err(anyhow::anyhow!("service down")));
        let variations = gen.generate("seed", 3).await;
        assert_eq!(
            variations,
            vec![
                "seed (variation 1)",
                "seed (variation 2)",
                "seed (variation 3)"
            ]
        );
    }

    #[tokio::test]
    async fn test_zero_count() {
        let gen = generator(|_| Ok("a\nb".to_string()));
        assert!(gen.generate("seed", 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_seed_and_count() {
        let gen = generator(|req| {
            let user = req.user_content().unwrap_or("");
            assert!(user.contains("Original prompt:\nmy seed"));
            assert!(user.contains("Generate 4 creative variations"));
            assert_eq!(req.temperature, Some(0.7));
            Ok("a\nb\nc\nd".to_string())
        });
        assert_eq!(gen.generate("my seed", 4).await.len(), 4);
    }
}
