// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Chat request types

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message<'a> {
    /// Role (system, user, assistant)
    #[serde(borrow)]
    pub role: Cow<'a, str>,

    /// Content
    #[serde(borrow)]
    pub content: Cow<'a, str>,
}

impl<'a> Message<'a> {
    /// Create a system message
    pub fn system(content: impl Into<Cow<'a, str>>) -> Self {
        Self {
            role: Cow::Borrowed("system"),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<Cow<'a, str>>) -> Self {
        Self {
            role: Cow::Borrowed("user"),
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<Cow<'a, str>>) -> Self {
        Self {
            role: Cow::Borrowed("assistant"),
            content: content.into(),
        }
    }
}

/// Request to a chat-completion model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest<'a> {
    /// Messages in the conversation
    #[serde(borrow)]
    pub messages: Vec<Message<'a>>,

    /// Override temperature
    pub temperature: Option<f32>,

    /// Override max tokens
    pub max_tokens: Option<u32>,
}

impl<'a> ChatRequest<'a> {
    /// Create a new empty request
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Add a message
    pub fn message(mut self, message: Message<'a>) -> Self {
        self.messages.push(message);
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Content of the first user message, if any
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_ref())
    }

    /// Content of the first system message, if any
    pub fn system_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_ref())
    }
}

impl<'a> Default for ChatRequest<'a> {
    fn default() -> Self {
        Self::new()
    }
}
