use super::TextModel;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GENERATE_TIMEOUT_SECS: u64 = 30;

/// Gemini `generateContent` client. The key is read lazily so that a
/// missing key degrades to the markup fallback instead of blocking
/// ingestion at startup.
pub struct GeminiModel {
    model: String,
    api_key: Option<String>,
    api_base: String,
}

impl GeminiModel {
    pub fn from_env(model: &str) -> Self {
        Self {
            model: model.to_string(),
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            api_base: API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl TextModel for GeminiModel {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("GEMINI_API_KEY is not set"))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(GENERATE_TIMEOUT_SECS))
            .build()?;

        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("model endpoint returned {status}"));
        }

        let parsed: GenerateContentResponse = resp.json()?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| anyhow!("model response had no candidates"))
    }
}
