use super::types::*;
use super::{ClientDiag, InferenceClient};
use crate::assemble::ContentPart;
use crate::config::Config;
use crate::error::{Result, TranslateError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::time::Duration;
use tracing::debug;

/// Blocking HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    model: String,
    base_url: String,
    api_key: String,
    temperature: f64,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.api.timeout_seconds))
            .build()
            .map_err(|e| TranslateError::Inference(format!("building HTTP client: {e}")))?;
        Ok(Self {
            http,
            model: cfg.api.model.clone(),
            base_url: cfg.api.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.resolve_api_key(),
            temperature: cfg.api.temperature,
            max_output_tokens: cfg.api.max_output_tokens,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/models/{}:{action}?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(&self, parts: &[ContentPart], instruction: &str) -> GenerateRequest {
        let wire_parts = parts
            .iter()
            .map(|p| match p {
                ContentPart::Blob { data, mime_type } => WirePart::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.clone(),
                        data: BASE64.encode(data),
                    },
                },
                ContentPart::Text { text } => WirePart::Text { text: text.clone() },
            })
            .collect();

        GenerateRequest {
            contents: vec![Content {
                role: "user".into(),
                parts: wire_parts,
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: instruction.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

impl InferenceClient for GeminiClient {
    fn doctor(&self) -> Result<ClientDiag> {
        let mut diag = ClientDiag {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            key_present: !self.api_key.is_empty(),
            ok: false,
            error: None,
        };
        if !diag.key_present {
            diag.error = Some("no API key configured".into());
            return Ok(diag);
        }

        let url = format!(
            "{}/models/{}?key={}",
            self.base_url, self.model, self.api_key
        );
        match self.http.get(&url).send() {
            Ok(resp) if resp.status().is_success() => {
                diag.ok = true;
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().unwrap_or_default();
                diag.error = Some(format!("{status}: {}", api_error_message(&body)));
            }
            Err(e) => {
                diag.error = Some(e.to_string());
            }
        }
        Ok(diag)
    }

    fn generate(&self, parts: &[ContentPart], instruction: &str) -> Result<String> {
        let request = self.build_request(parts, instruction);
        let url = self.endpoint("generateContent");
        debug!("calling {} with {} parts", self.model, parts.len());

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| TranslateError::Inference(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| TranslateError::Inference(format!("reading response body: {e}")))?;

        if !status.is_success() {
            return Err(TranslateError::Inference(format!(
                "{status}: {}",
                api_error_message(&body)
            )));
        }

        let decoded: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| TranslateError::Inference(format!("decoding response envelope: {e}")))?;

        let text: String = decoded
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(TranslateError::Inference(
                "response contained no text candidates".into(),
            ));
        }

        Ok(text)
    }
}

/// Pulls the human-readable message out of the API error envelope, falling
/// back to the raw body when it does not match.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(env) => env.error.message,
        Err(_) => body.trim().to_string(),
    }
}
