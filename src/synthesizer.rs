//! Per-day plan text from an OpenAI-compatible chat-completion service

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::LlmConfig;
use crate::error::FetchError;
use crate::http::ensure_success;

/// Only this many attractions are mentioned per day
const ATTRACTIONS_PER_DAY: usize = 2;

pub struct ItinerarySynthesizer {
    client: Client,
    config: LlmConfig,
}

/// Everything the synthesizer needs to write one day
#[derive(Debug, Clone, Copy)]
pub struct DayContext<'a> {
    pub destination: &'a str,
    pub day: u32,
    pub weather: &'a str,
    pub attractions: &'a [String],
}

impl DayContext<'_> {
    fn highlighted_attractions(&self) -> String {
        self.attractions
            .iter()
            .take(ATTRACTIONS_PER_DAY)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Instruction sent to the language model
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Create a brief 1-2 sentence itinerary for Day {} in {}. Weather: {}. Attractions: {}.",
            self.day,
            self.destination,
            self.weather,
            self.highlighted_attractions()
        )
    }

    /// Deterministic plan used whenever the completion service is unavailable
    #[must_use]
    pub fn fallback_plan(&self) -> String {
        format!(
            "Day {}: Explore {} in {} weather. Visit: {}",
            self.day,
            self.destination,
            self.weather,
            self.highlighted_attractions()
        )
    }
}

impl ItinerarySynthesizer {
    pub fn new(client: Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    #[instrument(skip_all, fields(destination = context.destination, day = context.day))]
    pub async fn plan_day(&self, context: DayContext<'_>) -> String {
        match self.complete(&context.prompt()).await {
            Ok(plan) => {
                info!("Plan generated for day {}", context.day);
                plan
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Completion failed, using fallback plan");
                context.fallback_plan()
            }
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, FetchError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let request = openai::ChatRequest {
            model: &self.config.model,
            messages: vec![openai::Message {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        debug!("Requesting completion from {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .json(&request)
            .send()
            .await?;

        let body: openai::ChatResponse = ensure_success(response)?.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| FetchError::parse("completion has no message content"))?;

        let plan = content.trim();
        if plan.is_empty() {
            return Err(FetchError::empty("completion text is blank"));
        }
        Ok(plan.to_string())
    }
}

mod openai {
    use super::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct ChatRequest<'a> {
        pub model: &'a str,
        pub messages: Vec<Message<'a>>,
        pub max_tokens: u32,
        pub temperature: f32,
    }

    #[derive(Debug, Serialize)]
    pub struct Message<'a> {
        pub role: &'a str,
        pub content: &'a str,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatResponse {
        #[serde(default)]
        pub choices: Vec<Choice>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: ResponseMessage,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseMessage {
        pub content: Option<String>,
    }
}
