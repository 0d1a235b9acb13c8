// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Bulk evaluation over a batch-completions API.
//!
//! A batch job covers an entire prompt × example cross product in one
//! submission. Jobs are billed and rate-limited as units, so the client
//! exposes only submit / status / results; there is no per-item retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Lifecycle status of a batch job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Input file is being validated
    Validating,
    /// Requests are being processed
    InProgress,
    /// Output file is being assembled
    Finalizing,
    /// All requests processed, results available
    Completed,
    /// Job failed validation or processing
    Failed,
    /// Completion window elapsed before the job finished
    Expired,
    /// Cancellation requested, still draining
    Cancelling,
    /// Job was cancelled
    Cancelled,
}

impl BatchStatus {
    /// Whether the job has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Expired | Self::Cancelled
        )
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Validating => "validating",
            Self::InProgress => "in_progress",
            Self::Finalizing => "finalizing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One request in a batch submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequestItem {
    /// Caller-chosen correlation id, echoed back with the result
    pub custom_id: String,
    /// Model to run the request against
    pub model: String,
    /// System message (the prompt under evaluation)
    pub system: String,
    /// User message (the example input)
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Max completion tokens
    pub max_tokens: u32,
}

/// One result from a completed batch job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutputItem {
    /// Correlation id from the submitted request
    pub custom_id: String,
    /// Generated text, empty if the item produced no body
    pub text: String,
}

/// Client for asynchronous bulk evaluation jobs
#[async_trait]
pub trait BatchClient: Send + Sync {
    /// Submit a batch of requests, returning the job id
    async fn submit(&self, items: &[BatchRequestItem]) -> anyhow::Result<String>;

    /// Query the current status of a job
    async fn status(&self, job_id: &str) -> anyhow::Result<BatchStatus>;

    /// Retrieve results of a completed job
    async fn results(&self, job_id: &str) -> anyhow::Result<Vec<BatchOutputItem>>;
}

/// OpenAI Batch API client.
///
/// Uploads the request set as a JSONL file, creates a batch against the
/// chat-completions endpoint with a 24h completion window, and downloads
/// the output file once the job completes.
pub struct OpenAiBatchClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct FileObject {
    id: String,
}

#[derive(Deserialize)]
struct BatchObject {
    id: String,
    status: BatchStatus,
    output_file_id: Option<String>,
}

impl OpenAiBatchClient {
    /// Create a new batch client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with custom base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Render the request set as JSONL in the Batch API request schema
    fn render_jsonl(items: &[BatchRequestItem]) -> String {
        let mut out = String::new();
        for item in items {
            let line = json!({
                "custom_id": item.custom_id,
                "method": "POST",
                "url": "/v1/chat/completions",
                "body": {
                    "model": item.model,
                    "messages": [
                        {"role": "system", "content": item.system},
                        {"role": "user", "content": item.user},
                    ],
                    "temperature": item.temperature,
                    "max_tokens": item.max_tokens,
                },
            });
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    async fn retrieve(&self, job_id: &str) -> anyhow::Result<BatchObject> {
        let batch = self
            .auth(self.client.get(format!("{}/batches/{}", self.base_url, job_id)))
            .send()
            .await?
            .error_for_status()?
            .json::<BatchObject>()
            .await?;
        Ok(batch)
    }
}

#[async_trait]
impl BatchClient for OpenAiBatchClient {
    async fn submit(&self, items: &[BatchRequestItem]) -> anyhow::Result<String> {
        let jsonl = Self::render_jsonl(items);

        let part = reqwest::multipart::Part::bytes(jsonl.into_bytes())
            .file_name("batch_requests.jsonl")
            .mime_str("application/jsonl")?;
        let form = reqwest::multipart::Form::new()
            .text("purpose", "batch")
            .part("file", part);

        let file = self
            .auth(self.client.post(format!("{}/files", self.base_url)))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<FileObject>()
            .await?;

        let batch = self
            .auth(self.client.post(format!("{}/batches", self.base_url)))
            .json(&json!({
                "input_file_id": file.id,
                "endpoint": "/v1/chat/completions",
                "completion_window": "24h",
                "metadata": {"description": "prompt_optimization"},
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<BatchObject>()
            .await?;

        Ok(batch.id)
    }

    async fn status(&self, job_id: &str) -> anyhow::Result<BatchStatus> {
        Ok(self.retrieve(job_id).await?.status)
    }

    async fn results(&self, job_id: &str) -> anyhow::Result<Vec<BatchOutputItem>> {
        let batch = self.retrieve(job_id).await?;
        let output_file_id = batch
            .output_file_id
            .ok_or_else(|| anyhow::anyhow!("batch {} has no output file", job_id))?;

        let content = self
            .auth(self.client.get(format!(
                "{}/files/{}/content",
                self.base_url, output_file_id
            )))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        #[derive(Deserialize)]
        struct ResultLine {
            custom_id: String,
            response: Option<ResultResponse>,
        }

        #[derive(Deserialize)]
        struct ResultResponse {
            body: Option<ResultBody>,
        }

        #[derive(Deserialize)]
        struct ResultBody {
            choices: Vec<ResultChoice>,
        }

        #[derive(Deserialize)]
        struct ResultChoice {
            message: ResultMessage,
        }

        #[derive(Deserialize)]
        struct ResultMessage {
            content: String,
        }

        let mut items = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let parsed: ResultLine = serde_json::from_str(line)?;
            let text = parsed
                .response
                .and_then(|r| r.body)
                .and_then(|b| b.choices.into_iter().next())
                .map(|c| c.message.content)
                .unwrap_or_default();
            items.push(BatchOutputItem {
                custom_id: parsed.custom_id,
                text,
            });
        }
        Ok(items)
    }
}

/// A deterministic in-memory batch client for tests and examples.
///
/// Responses come from a closure over (system, user). The reported status
/// sequence and the set of dropped result ids are scriptable, so poll loops
/// and partial-result handling can be exercised without a network.
pub struct MockBatchClient<F>
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    respond: F,
    statuses: Mutex<Vec<BatchStatus>>,
    drop_ids: Vec<String>,
    jobs: Mutex<HashMap<String, Vec<BatchRequestItem>>>,
    next_job: AtomicU64,
}

impl<F> MockBatchClient<F>
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    /// Create a mock that completes immediately
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            statuses: Mutex::new(vec![BatchStatus::Completed]),
            drop_ids: Vec::new(),
            jobs: Mutex::new(HashMap::new()),
            next_job: AtomicU64::new(0),
        }
    }

    /// Script the sequence of statuses reported by `status()`.
    ///
    /// Statuses are consumed front to back; the last entry repeats.
    pub fn with_statuses(mut self, statuses: Vec<BatchStatus>) -> Self {
        self.statuses = Mutex::new(statuses);
        self
    }

    /// Omit the result for a given custom id
    pub fn with_dropped_id(mut self, custom_id: impl Into<String>) -> Self {
        self.drop_ids.push(custom_id.into());
        self
    }
}

#[async_trait]
impl<F> BatchClient for MockBatchClient<F>
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    async fn submit(&self, items: &[BatchRequestItem]) -> anyhow::Result<String> {
        let n = self.next_job.fetch_add(1, Ordering::SeqCst);
        let job_id = format!("mock-batch-{}", n);
        self.jobs
            .lock()
            .expect("mock jobs poisoned")
            .insert(job_id.clone(), items.to_vec());
        Ok(job_id)
    }

    async fn status(&self, _job_id: &str) -> anyhow::Result<BatchStatus> {
        let mut statuses = self.statuses.lock().expect("mock statuses poisoned");
        if statuses.len() > 1 {
            Ok(statuses.remove(0))
        } else {
            statuses
                .first()
                .copied()
                .ok_or_else(|| anyhow::anyhow!("no scripted status"))
        }
    }

    async fn results(&self, job_id: &str) -> anyhow::Result<Vec<BatchOutputItem>> {
        let jobs = self.jobs.lock().expect("mock jobs poisoned");
        let items = jobs
            .get(job_id)
            .ok_or_else(|| anyhow::anyhow!("unknown job {}", job_id))?;
        Ok(items
            .iter()
            .filter(|item| !self.drop_ids.contains(&item.custom_id))
            .map(|item| BatchOutputItem {
                custom_id: item.custom_id.clone(),
                text: (self.respond)(&item.system, &item.user),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> BatchRequestItem {
        BatchRequestItem {
            custom_id: id.to_string(),
            model: "gpt-3.5-turbo".to_string(),
            system: "You are helpful.".to_string(),
            user: "hello".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(BatchStatus::Completed.is_terminal());
        assert!(BatchStatus::Failed.is_terminal());
        assert!(BatchStatus::Expired.is_terminal());
        assert!(BatchStatus::Cancelled.is_terminal());
        assert!(!BatchStatus::Validating.is_terminal());
        assert!(!BatchStatus::InProgress.is_terminal());
        assert!(!BatchStatus::Finalizing.is_terminal());
        assert!(!BatchStatus::Cancelling.is_terminal());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let status: BatchStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, BatchStatus::InProgress);
        assert_eq!(status.to_string(), "in_progress");
    }

    #[test]
    fn test_render_jsonl() {
        let jsonl = OpenAiBatchClient::render_jsonl(&[item("r0_p0_e0"), item("r0_p0_e1")]);
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["custom_id"], "r0_p0_e0");
        assert_eq!(first["method"], "POST");
        assert_eq!(first["url"], "/v1/chat/completions");
        assert_eq!(first["body"]["messages"][0]["role"], "system");
        assert_eq!(first["body"]["messages"][1]["content"], "hello");
        assert_eq!(first["body"]["temperature"], 0.3);
    }

    #[tokio::test]
    async fn test_mock_round_trip() {
        let client = MockBatchClient::new(|system, user| format!("{}|{}", system, user));
        let job = client.submit(&[item("a"), item("b")]).await.unwrap();

        assert_eq!(client.status(&job).await.unwrap(), BatchStatus::Completed);

        let results = client.results(&job).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "You are helpful.|hello");
    }

    #[tokio::test]
    async fn test_mock_status_sequence() {
        let client = MockBatchClient::new(|_, _| String::new()).with_statuses(vec![
            BatchStatus::Validating,
            BatchStatus::InProgress,
            BatchStatus::Completed,
        ]);

        assert_eq!(client.status("j").await.unwrap(), BatchStatus::Validating);
        assert_eq!(client.status("j").await.unwrap(), BatchStatus::InProgress);
        assert_eq!(client.status("j").await.unwrap(), BatchStatus::Completed);
        // Last status repeats
        assert_eq!(client.status("j").await.unwrap(), BatchStatus::Completed);
    }

    #[tokio::test]
    async fn test_mock_dropped_id() {
        let client = MockBatchClient::new(|_, _| "out".to_string()).with_dropped_id("b");
        let job = client.submit(&[item("a"), item("b")]).await.unwrap();

        let results = client.results(&job).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].custom_id, "a");
    }
}
