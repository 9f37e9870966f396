use crate::assemble;
use crate::client::InferenceClient;
use crate::config::Config;
use crate::document::SourceDocument;
use crate::error::{Result, TranslateError};
use crate::normalize::{self, ResultRecord};
use crate::postprocess;
use tracing::{debug, info};

/// The batch orchestrator: one call is exactly one remote round trip,
/// whatever the file count. Stateless and reentrant; a fresh instance per
/// call is fine, and a shared one is safe as long as the client is.
pub struct Translator<C: InferenceClient> {
    cfg: Config,
    client: C,
}

#[derive(Debug)]
pub struct TranslationOutput {
    pub records: Vec<ResultRecord>,
    /// The unparsed response body, kept for the debug artifact.
    pub raw_response: String,
}

impl<C: InferenceClient> Translator<C> {
    pub fn new(cfg: &Config, client: C) -> Self {
        Self {
            cfg: cfg.clone(),
            client,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Credential check first, before any file is opened; then assemble,
    /// one remote call, normalize, tidy. No retries.
    pub fn translate(&self, documents: &[SourceDocument]) -> Result<TranslationOutput> {
        if self.cfg.resolve_api_key().is_empty() {
            return Err(TranslateError::Configuration(
                "Gemini API key is not set".into(),
            ));
        }
        if documents.len() > self.cfg.limits.max_batch_files {
            return Err(TranslateError::Configuration(format!(
                "batch of {} files exceeds max_batch_files={}",
                documents.len(),
                self.cfg.limits.max_batch_files
            )));
        }

        let base_prompt = self
            .cfg
            .resolve_prompt()
            .map_err(|e| TranslateError::Configuration(format!("{e:#}")))?;

        info!("starting translation for {} files", documents.len());
        let request = assemble::assemble(documents, &base_prompt)?;

        let raw_response = self
            .client
            .generate(&request.parts, &request.instruction)?;
        debug!("received raw response ({} bytes)", raw_response.len());

        let records = normalize::normalize(&raw_response, documents.len());
        let records = postprocess::tidy_records(&self.cfg, records);

        Ok(TranslationOutput {
            records,
            raw_response,
        })
    }
}
