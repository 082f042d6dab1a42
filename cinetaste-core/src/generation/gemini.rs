use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{GenerationBackend, GenerationError, GenerationRequest};
use crate::config::GeminiSettings;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini `generateContent` over REST.
#[derive(Clone)]
pub struct GeminiBackend {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiBackend {
    pub fn new(settings: &GeminiSettings) -> Result<Self, GenerationError> {
        if settings.api_key.trim().is_empty() {
            return Err(GenerationError::Unavailable(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        Ok(Self {
            http: Client::builder().build()?,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: Option<String>,
}

fn build_body(request: &GenerationRequest) -> GenerateContentBody<'_> {
    let tools = if request.web_search {
        vec![serde_json::json!({ "google_search": {} })]
    } else {
        Vec::new()
    };

    GenerateContentBody {
        contents: [Content {
            parts: [Part {
                text: &request.prompt,
            }],
        }],
        tools,
        generation_config: request.response_schema.as_ref().map(|schema| {
            GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }
        }),
    }
}

fn collect_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::Malformed(
            "response carried no text".to_string(),
        ));
    }
    Ok(text.to_string())
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        debug!(
            purpose = %request.purpose,
            model = %self.model,
            web_search = request.web_search,
            "generation request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_body(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GeminiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| format!("Gemini request failed with status {}", status));
            return Err(GenerationError::Api(message));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;
        collect_text(body)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationPurpose;

    #[test]
    fn body_includes_search_tool_and_schema_only_when_asked() {
        let plain = GenerationRequest::new(GenerationPurpose::Disambiguation, "which id?");
        let value = serde_json::to_value(build_body(&plain)).expect("body");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "which id?");
        assert!(value.get("tools").is_none());
        assert!(value.get("generationConfig").is_none());

        let grounded = plain.clone().with_web_search();
        let value = serde_json::to_value(build_body(&grounded)).expect("body");
        assert!(value["tools"][0].get("google_search").is_some());

        let schema = serde_json::json!({ "type": "OBJECT" });
        let typed = plain.with_schema(schema);
        let value = serde_json::to_value(build_body(&typed)).expect("body");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn text_parts_are_concatenated() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"12"},{"text":"34\n"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).expect("response");
        assert_eq!(collect_text(response).expect("text"), "1234");

        let empty: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[]}"#).expect("response");
        assert!(matches!(
            collect_text(empty),
            Err(GenerationError::Malformed(_))
        ));
    }
}
