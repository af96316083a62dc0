use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bd_core::{ArticleGenerator, Commentary, Error, GeneratedArticle, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::payload;
use crate::prompt;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

pub struct GeminiModel {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiModel {
    pub fn new(api_key: Option<String>, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
            model: model.to_string(),
        })
    }

    /// Single attempt, no retry. Retries are the caller's responsibility.
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("GEMINI_API_KEY is not set".to_string()))?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Gemini request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Generation(format!("Gemini returned an error status: {}", e)))?
            .json::<GenerateResponse>()
            .await
            .map_err(|e| Error::Generation(format!("Gemini response was not decodable: {}", e)))?;

        let text: String = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Generation(
                "Gemini returned an empty response".to_string(),
            ));
        }

        debug!("🤖 Gemini returned {} chars", text.chars().count());
        Ok(text)
    }
}

#[async_trait]
impl ArticleGenerator for GeminiModel {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(
        &self,
        topic: &str,
        source_link: Option<&str>,
    ) -> Result<GeneratedArticle> {
        let prompt = prompt::draft_prompt(topic, source_link);
        let text = self.generate_text(&prompt).await?;
        payload::parse_article(&text)
    }

    async fn commentary(&self, body_text: &str) -> Result<Commentary> {
        let prompt = prompt::commentary_prompt(body_text);
        let text = self.generate_text(&prompt).await?;
        payload::parse_commentary(&text)
    }
}
