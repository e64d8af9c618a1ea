use log::debug;
use reqwest::Client;
use serde::{ Deserialize, Serialize };
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One role-tagged block of the request payload. Gemini models context
/// sequentially, so callers are responsible for ordering.
#[derive(Serialize, Debug, Clone)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug, Clone)]
pub struct Part {
    pub text: String,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::tagged("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::tagged("model", text)
    }

    fn tagged(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 350,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// All four standard harm categories at the most permissive threshold.
pub fn permissive_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .iter()
    .map(|category| SafetySetting {
        category: category.to_string(),
        threshold: "BLOCK_NONE".to_string(),
    })
    .collect()
}

#[derive(Serialize, Debug)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Deserialize, Debug)]
pub struct GenerateResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if present and
    /// non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
    }
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GeminiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn api_key_len(&self) -> usize {
        self.api_key.len()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single POST to `models/{model}:generateContent`. The body is parsed
    /// regardless of HTTP status; Gemini reports failures through the
    /// `error` object in the response body.
    pub async fn generate(&self, contents: Vec<Content>) -> Result<GenerateResponse, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );

        let request = GenerateRequest {
            contents,
            generation_config: GenerationConfig::default(),
            safety_settings: permissive_safety_settings(),
        };

        debug!("GeminiClient::generate() → model={}", self.model);
        let response = self.http.post(&url).json(&request).send().await?;
        Ok(response.json::<GenerateResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_candidate_text() {
        let data: GenerateResponse = serde_json::from_value(
            json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "¡Hola! ¿Cómo estás?" }] } },
                    { "content": { "parts": [{ "text": "segundo" }] } }
                ]
            })
        ).unwrap();

        assert!(data.error.is_none());
        assert_eq!(data.first_text(), Some("¡Hola! ¿Cómo estás?"));
    }

    #[test]
    fn error_payload_deserializes() {
        let data: GenerateResponse = serde_json::from_value(
            json!({
                "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
            })
        ).unwrap();

        let error = data.error.unwrap();
        assert_eq!(error.code, Some(400));
        assert_eq!(error.status.as_deref(), Some("INVALID_ARGUMENT"));
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let data: GenerateResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert_eq!(data.first_text(), None);

        // Safety block shape: a candidate without content.
        let data: GenerateResponse = serde_json::from_value(
            json!({ "candidates": [{ "finishReason": "SAFETY" }] })
        ).unwrap();
        assert_eq!(data.first_text(), None);

        let data: GenerateResponse = serde_json::from_value(
            json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] })
        ).unwrap();
        assert_eq!(data.first_text(), None);
    }

    #[test]
    fn request_body_matches_wire_shape() {
        let request = GenerateRequest {
            contents: vec![Content::user("hola")],
            generation_config: GenerationConfig::default(),
            safety_settings: permissive_safety_settings(),
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hola");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 350);
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_NONE");
    }
}
