use std::sync::Arc;

use log::debug;
use reqwest::Client;
use serde_json::json;

use carelens_runtime::{Config, ConfigTokenProvider, TokenProvider};

use crate::error::{NluError, Result};
use crate::expertai::{Relation, RelationsResponse};
use crate::google::AnalyzeResponse;
use crate::meaning::Meaning;

const WIT_ENDPOINT: &str = "https://api.wit.ai/message";
const EXPERTAI_ENDPOINT: &str =
    "https://nlapi.expert.ai/v2/analyze/standard/en/relations";

/// Client for the Wit message endpoint. The token is resolved once at
/// construction; Wit tokens are long-lived application keys.
#[derive(Debug, Clone)]
pub struct WitClient {
    client: Client,
    token: String,
}

impl WitClient {
    pub fn new(client: Client, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }

    /// Build from configuration, reading the `WIT_TOKEN` key.
    pub fn from_config(client: Client, config: &Config) -> Result<Self> {
        let token = config.require("WIT_TOKEN")?;
        Ok(Self::new(client, token))
    }

    /// Raw response body for one utterance.
    pub async fn message_raw(&self, text: &str) -> Result<String> {
        debug!("wit query: {text}");
        let response = self
            .client
            .get(WIT_ENDPOINT)
            .query(&[("q", text)])
            .bearer_auth(&self.token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| NluError::Transport("wit", e))?;
        response
            .text()
            .await
            .map_err(|e| NluError::Transport("wit", e))
    }

    /// Parsed meaning for one utterance.
    pub async fn message(&self, text: &str) -> Result<Meaning> {
        let raw = self.message_raw(text).await?;
        Meaning::from_json(&raw)
    }
}

/// Client for the Healthcare NLP service. Unlike the Wit token, the access
/// token here expires quickly, so a fresh one is fetched before every
/// request.
pub struct GoogleNluClient {
    client: Client,
    endpoint: String,
    tokens: Arc<dyn TokenProvider>,
}

impl GoogleNluClient {
    pub fn new(client: Client, endpoint: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            tokens,
        }
    }

    /// Build from configuration: `GOOGLE_PROJECT_ID` names the project,
    /// `GOOGLE_LOCATION` the region (defaults to `us-central1`), and
    /// `GOOGLE_TOKEN` is re-read on every request.
    pub fn from_config(client: Client, config: &Config) -> Result<Self> {
        let project = config.require("GOOGLE_PROJECT_ID")?;
        let location = config.get("GOOGLE_LOCATION").unwrap_or("us-central1");
        if config.get("GOOGLE_TOKEN").is_none() {
            return Err(carelens_runtime::RuntimeError::NotInitialized("Healthcare NLP").into());
        }
        let tokens = Arc::new(ConfigTokenProvider::new(config.clone(), "GOOGLE_TOKEN"));
        Ok(Self::new(client, analyze_endpoint(project, location), tokens))
    }

    /// Raw response body for one document.
    pub async fn analyze_raw(&self, text: &str) -> Result<String> {
        let token = self.tokens.access_token().await?;
        debug!("google analyze: {} chars to {}", text.len(), self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&json!({ "documentContent": text }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| NluError::Transport("google", e))?;
        response
            .text()
            .await
            .map_err(|e| NluError::Transport("google", e))
    }

    /// Typed analysis for one document.
    pub async fn analyze(&self, text: &str) -> Result<AnalyzeResponse> {
        let raw = self.analyze_raw(text).await?;
        AnalyzeResponse::from_json(&raw)
    }
}

fn analyze_endpoint(project: &str, location: &str) -> String {
    format!(
        "https://healthcare.googleapis.com/v1/projects/{project}/locations/{location}/services/nlp:analyzeEntities"
    )
}

/// Client for the expert.ai relations analysis.
#[derive(Debug, Clone)]
pub struct ExpertAiClient {
    client: Client,
    token: String,
}

impl ExpertAiClient {
    pub fn new(client: Client, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }

    /// Build from configuration, reading the `EXPERTAI_TOKEN` key.
    pub fn from_config(client: Client, config: &Config) -> Result<Self> {
        let token = config.require("EXPERTAI_TOKEN")?;
        Ok(Self::new(client, token))
    }

    /// Verb-centred relations for one document.
    pub async fn relations(&self, text: &str) -> Result<Vec<Relation>> {
        debug!("expertai analyze: {} chars", text.len());
        let response = self
            .client
            .post(EXPERTAI_ENDPOINT)
            .bearer_auth(&self.token)
            .json(&json!({ "document": { "text": text } }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| NluError::Transport("expertai", e))?;
        let raw = response
            .text()
            .await
            .map_err(|e| NluError::Transport("expertai", e))?;
        Ok(RelationsResponse::from_json(&raw)?.into_relations())
    }
}
