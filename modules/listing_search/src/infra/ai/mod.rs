//! Generative filter extraction over an OpenAI-compatible chat API
//!
//! The extractor only transports text. Whatever comes back is handed to the
//! sanitizer as an untrusted object.

use crate::config::AiConfig;
use crate::contract::SearchMode;
use crate::domain::strategy::FilterExtractor;
use crate::domain::taxonomy::Taxonomy;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Filter extractor backed by a chat-completion endpoint
pub struct OpenAiFilterExtractor {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    taxonomy: Arc<Taxonomy>,
}

impl OpenAiFilterExtractor {
    /// Build from config, reading the key from the configured environment variable
    pub fn from_env(config: &AiConfig, taxonomy: Arc<Taxonomy>) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .with_context(|| format!("environment variable {} is not set", config.api_key_env))?;
        Self::new(config, api_key, taxonomy)
    }

    pub fn new(config: &AiConfig, api_key: String, taxonomy: Arc<Taxonomy>) -> Result<Self> {
        if api_key.trim().is_empty() {
            bail!("AI filter extraction requires a non-empty API key");
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client for filter extraction")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            taxonomy,
        })
    }

    fn system_prompt(&self, mode: SearchMode) -> String {
        let mut categories = String::new();
        for category in self.taxonomy.categories_for(mode) {
            let subs: Vec<&str> = category
                .subcategories
                .iter()
                .map(|s| s.code.as_str())
                .collect();
            categories.push_str(&format!("- {} ({}): {}\n", category.code, category.label, subs.join(", ")));
        }

        format!(
            "You turn a buyer's search for a business to acquire into JSON filters.\n\
             Marketplace side: {mode}.\n\
             Reply with one JSON object and nothing else. Allowed keys: category, subcategory, \
             location, min_price, max_price, min_revenue, min_ebitda, min_mrr, churn_rate, \
             verified_only, sort. Amounts are plain numbers in dollars. churn_rate is a percent ceiling.\n\
             Use only these category codes with their subcategory codes:\n{categories}\
             Leave out any key the text does not clearly state."
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl FilterExtractor for OpenAiFilterExtractor {
    async fn extract(&self, text: &str, mode: SearchMode) -> Result<Option<Value>> {
        let system = self.system_prompt(mode);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        tracing::debug!(model = %self.model, mode = %mode, "requesting filter extraction");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("filter extraction request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("filter extraction endpoint returned {status}");
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("filter extraction response is not valid JSON")?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);

        Ok(content.as_deref().and_then(extract_json_object))
    }
}

/// Pull the JSON object out of a model reply, tolerating markdown fences
pub fn extract_json_object(content: &str) -> Option<Value> {
    let mut body = content.trim();
    if let Some(rest) = body.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        body = rest.trim_end().strip_suffix("```").unwrap_or(rest).trim();
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => None,
        Err(_) => {
            // Fall back to the outermost braces when the model added prose
            let start = body.find('{')?;
            let end = body.rfind('}')?;
            if end <= start {
                return None;
            }
            match serde_json::from_str::<Value>(&body[start..=end]) {
                Ok(value @ Value::Object(_)) => Some(value),
                _ => None,
            }
        }
    }
}
