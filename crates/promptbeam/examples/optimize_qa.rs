// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Optimize a question-answering prompt against stub backends.
//!
//! Swap the mocks for `LmClient::new(LmConfig::for_model("gpt-4"),
//! Box::new(OpenAiProvider::new(key)))` and `OpenAiBatchClient::new(key)`
//! to run against real services.

use promptbeam::{EvalSet, OptimizerConfig, PromptOptimizer, RunContext};
use promptbeam_client::{MockBatchClient, MockLm};
use promptbeam_eval::TokenOverlap;
use std::sync::Arc;

#[tokio::main]
async fn main() -> promptbeam::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // A generator that rewords the seed deterministically.
    let generator = Arc::new(MockLm::new("mock-gpt-4", |req| {
        let seed = req
            .user_content()
            .and_then(|u| u.strip_prefix("Original prompt:\n"))
            .and_then(|rest| rest.split("\n\nGenerate").next())
            .unwrap_or("assistant");
        Ok(format!(
            "{seed} Be concise.\n{seed} Answer directly.\n{seed} Cite facts.\n{seed} Think first."
        ))
    }));

    // An evaluator that answers correctly when the prompt asks for
    // directness; everything else rambles.
    let batch = Arc::new(MockBatchClient::new(|system, user| {
        if system.contains("Answer directly") {
            match user {
                "What is the capital of France?" => "Paris".to_string(),
                "What is 2 + 2?" => "4".to_string(),
                _ => "I am not sure.".to_string(),
            }
        } else {
            format!("Well, regarding \"{user}\", there is much to say.")
        }
    }));

    let eval_set = EvalSet::new()
        .example("What is the capital of France?", "Paris")
        .example("What is 2 + 2?", "4");

    let mut optimizer = PromptOptimizer::builder(
        "You are a knowledgeable assistant that provides accurate answers.",
        generator,
    )
    .batch_evaluator(batch, "mock-gpt-3.5-turbo")
    .metric(Arc::new(TokenOverlap))
    .config(OptimizerConfig::new().with_breadth(4).with_max_rounds(3))
    .context(RunContext::new("results"))
    .build()?;

    let result = optimizer.optimize(&eval_set, None).await?;

    println!();
    println!("best fitness: {:.4}", result.best_fitness);
    println!("total evaluations: {}", result.total_evaluations);
    println!("best prompt:\n{}", result.best_prompt);
    Ok(())
}
