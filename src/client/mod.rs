pub mod gemini;
pub mod types;

use crate::assemble::ContentPart;
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub use gemini::GeminiClient;

/// The remote inference collaborator. Exactly one outbound round trip per
/// `generate` call, blocking until the service answers; stateless across
/// calls. Implementations decide timeout policy; the orchestrator enforces
/// none and never retries.
pub trait InferenceClient {
    fn doctor(&self) -> Result<ClientDiag>;
    fn generate(&self, parts: &[ContentPart], instruction: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDiag {
    pub model: String,
    pub base_url: String,
    pub key_present: bool,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}
