use crate::domain::model::{EncodedImage, Row};
use crate::domain::ports::Recognizer;
use crate::recognition::parse;
use crate::utils::error::{ExtractError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const EXTRACTION_PROMPT: &str = r#"You are an expert data extraction AI. Analyze the supplied document image and convert it into structured JSON data.

First classify the document as one of: 'table', 'receipt', 'structured_list', 'note' or 'other'. Then extract the data according to the rules for that type and reply with a JSON array of objects.

Extraction rules:
1. 'table': use the header row as JSON keys (be robust to multi-line headers); each subsequent table row becomes one object.
2. 'receipt': extract key-value pairs, prioritizing 'merchant_name', 'total_amount', 'transaction_date' and 'transaction_time'. Where possible also extract line items into an 'items' array with 'description', 'quantity' and 'price'. Return a single object in an array.
3. 'structured_list' (repeating blocks of information not laid out as a grid): identify the distinct repeating groups and extract each into an object, with consistent keys inferred from the content.
4. 'note' (handwritten or typed notes): transcribe the full text and return a single object with 'title', 'date' and 'content' keys.
5. 'other': perform a general OCR and return a single object with an 'extracted_text' key holding all text found.

IMPORTANT: ALWAYS return a valid JSON array. If no usable data can be extracted, return an empty array []. Do not invent data; represent missing values as null. Trim whitespace and ignore watermarks or irrelevant background text."#;

/// HTTP client for a Gemini-style `generateContent` endpoint. One request per
/// extraction; the reply text is handed to [`parse::rows_from_text`].
pub struct GeminiRecognizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiRecognizer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
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
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

#[async_trait]
impl Recognizer for GeminiRecognizer {
    async fn extract_rows(&self, images: &[EncodedImage]) -> Result<Vec<Row>> {
        let mut parts = vec![serde_json::json!({ "text": EXTRACTION_PROMPT })];
        for image in images {
            parts.push(serde_json::json!({
                "inline_data": {
                    "mime_type": image.media_type,
                    "data": image.payload,
                }
            }));
        }
        let body = serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        tracing::debug!("Requesting extraction from {}", self.request_url());
        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractError::RecognitionError {
                message: format!(
                    "recognition service returned {}: {}",
                    status,
                    truncate(&detail, 200)
                ),
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        tracing::debug!("Recognition reply carried {} byte(s) of text", text.len());
        parse::rows_from_text(&text)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
