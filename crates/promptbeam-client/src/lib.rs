// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! LM client abstraction for Promptbeam

pub mod batch;
pub mod lm;
pub mod provider;
pub mod request;
pub mod response;

pub use batch::{
    BatchClient, BatchOutputItem, BatchRequestItem, BatchStatus, MockBatchClient,
    OpenAiBatchClient,
};
pub use lm::{Lm, LmClient, LmConfig, MockLm};
pub use provider::{OpenAiProvider, Provider, ProviderType};
pub use request::{ChatRequest, Message};
pub use response::{LmResponse, Usage};
