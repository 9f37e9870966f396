use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub prompt: Prompt,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub postprocess: Postprocess,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
    #[serde(default)]
    pub security: Security,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// A stable, normalization-friendly string for hashing job identity.
    /// The API key is blanked so rotating a credential does not change the
    /// job id of an otherwise identical batch.
    pub fn normalized_for_hash(&self) -> String {
        let mut cfg = self.clone();
        cfg.api.key = String::new();
        toml::to_string(&cfg).unwrap_or_default()
    }

    /// The credential used for remote calls: the inline `[api].key` value,
    /// or the environment variable named by `[api].key_env` when the inline
    /// value is empty. Returns an empty string when neither is set.
    pub fn resolve_api_key(&self) -> String {
        if !self.api.key.is_empty() {
            return self.api.key.clone();
        }
        if self.api.key_env.is_empty() {
            return String::new();
        }
        std::env::var(&self.api.key_env).unwrap_or_default()
    }

    /// The system prompt: `[prompt].file` contents when set, else the
    /// inline `[prompt].system` text.
    pub fn resolve_prompt(&self) -> Result<String> {
        if !self.prompt.file.is_empty() {
            return std::fs::read_to_string(&self.prompt.file)
                .with_context(|| format!("reading prompt file: {}", self.prompt.file));
        }
        Ok(self.prompt.system.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: Default::default(),
            paths: Default::default(),
            api: Default::default(),
            prompt: Default::default(),
            limits: Default::default(),
            postprocess: Default::default(),
            output: Default::default(),
            logging: Default::default(),
            debug: Default::default(),
            security: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    pub resume: bool,
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            resume: true,
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub out_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    pub model: String,
    pub base_url: String,
    /// Inline API key. Leave empty to read from the variable in `key_env`.
    pub key: String,
    pub key_env: String,
    pub timeout_seconds: u64,
    pub temperature: f64,
    pub max_output_tokens: u32,
}
impl Default for Api {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            key: "".into(),
            key_env: "GEMINI_API_KEY".into(),
            timeout_seconds: 120,
            temperature: 0.2,
            max_output_tokens: 8192,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub system: String,
    /// Optional path to a prompt file; overrides `system` when non-empty.
    pub file: String,
}
impl Default for Prompt {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.into(),
            file: "".into(),
        }
    }
}

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a scholarly assistant digitizing scanned Jain manuscript pages. For \
each supplied file, perform optical character recognition of the Devanagari \
text and produce a faithful Hindi transcription, then translate it into \
English, rendering technical Sanskrit/Prakrit terms in IAST transliteration. \
Preserve verse numbering and line breaks where legible. Respond with JSON \
using exactly two string fields per file: \"hindi_ocr\" and \
\"english_translation\".";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    pub max_input_file_bytes: u64,
    pub max_batch_files: usize,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_file_bytes: 50_000_000,
            max_batch_files: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Postprocess {
    pub normalize_newlines: bool,
    pub normalize_unicode: bool,
    pub trim_trailing_whitespace: bool,
}
impl Default for Postprocess {
    fn default() -> Self {
        Self {
            normalize_newlines: true,
            normalize_unicode: true,
            trim_trailing_whitespace: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub write_results_json: bool,
    pub write_text_files: bool,
    pub write_report_json: bool,
    pub write_index_json: bool,
    pub results_filename: String,
    pub report_filename: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            write_results_json: true,
            write_text_files: true,
            write_report_json: true,
            write_index_json: true,
            results_filename: "results.json".into(),
            report_filename: "report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debug {
    pub dump_effective_config: bool,
    pub keep_raw_response: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            dump_effective_config: true,
            keep_raw_response: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    pub reject_url_inputs: bool,
}
impl Default for Security {
    fn default() -> Self {
        Self {
            reject_url_inputs: true,
        }
    }
}
