use crate::{
    client::{GeminiClient, InferenceClient},
    config::Config,
    document::SourceDocument,
    normalize::ResultRecord,
    report::JobReport,
    translator::Translator,
    util::{ensure_dir, now_rfc3339, sha256_file, sha256_hex},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "granthika")]
#[command(about = "Batch manuscript OCR/translation orchestrator (Gemini batching + response normalization)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./granthika.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check credential and model reachability.
    Doctor {},
    /// Dry-run request assembly: show parts and the derived instruction.
    Plan {
        #[arg(long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
    },
    /// Translate a batch of scans in one remote round trip.
    Run {
        #[arg(long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;

    match &args.cmd {
        Command::Doctor {} => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            doctor(&cfg)
        }
        Command::Plan { input } => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            plan(&cfg, input)
        }
        Command::Run { input, out_dir } => run(&args, &cfg, input, out_dir.as_deref()),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("granthika.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("granthika.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    let client = GeminiClient::new(cfg)?;
    let diag = client.doctor()?;
    println!("{}", serde_json::to_string_pretty(&diag)?);
    Ok(())
}

fn plan(cfg: &Config, inputs: &[PathBuf]) -> Result<()> {
    validate_inputs(cfg, inputs)?;
    let documents = load_documents(inputs);

    let base_prompt = cfg.resolve_prompt()?;
    let assembled = crate::assemble::assemble(&documents, &base_prompt)?;

    let parts: Vec<serde_json::Value> = documents
        .iter()
        .enumerate()
        .map(|(i, d)| {
            serde_json::json!({
                "index": i + 1,
                "filename": d.filename(),
                "mime_type": d.mime_type(),
                "file_bytes": d.byte_len(),
            })
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "parts": parts,
            "instruction": assembled.instruction,
        }))?
    );
    Ok(())
}

fn run(args: &Args, cfg: &Config, inputs: &[PathBuf], out_override: Option<&Path>) -> Result<()> {
    validate_inputs(cfg, inputs)?;

    let cfg_norm = cfg.normalized_for_hash();
    let cfg_hash = sha256_hex(cfg_norm.as_bytes());
    let mut input_hashes = Vec::with_capacity(inputs.len());
    for input in inputs {
        let h =
            sha256_file(input).with_context(|| format!("hashing input: {}", input.display()))?;
        input_hashes.push(h);
    }
    let job_id = sha256_hex(format!("{}:{}", cfg_hash, input_hashes.join(",")).as_bytes());

    let out_root = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));
    let job_dir = out_root.join(&job_id);

    if job_dir.exists() && !cfg.global.resume {
        return Err(anyhow!(
            "job_dir already exists and resume=false: {}",
            job_dir.display()
        ));
    }

    ensure_dir(&job_dir)?;
    ensure_dir(&job_dir.join("final"))?;
    ensure_dir(&job_dir.join("logs"))?;

    let log_path = resolve_log_path(cfg, Some(&job_dir));
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    info!("job_id={job_id} out={}", job_dir.display());

    if cfg.debug.dump_effective_config {
        // Dump the key-blanked form so the credential never lands on disk.
        std::fs::write(job_dir.join("effective-config.toml"), cfg_norm)?;
    }

    let documents = load_documents(inputs);
    let client = GeminiClient::new(cfg)?;
    let translator = Translator::new(cfg, client);

    let started = now_rfc3339();
    let output = translator.translate(&documents)?;

    if cfg.debug.keep_raw_response {
        std::fs::write(job_dir.join("raw-response.json"), &output.raw_response)?;
    }

    if cfg.output.write_results_json {
        std::fs::write(
            job_dir.join("final").join(&cfg.output.results_filename),
            serde_json::to_string_pretty(&output.records)?,
        )?;
    }

    if cfg.output.write_text_files {
        write_text_files(&job_dir.join("final"), &documents, &output.records)?;
    }

    let report = JobReport::build(&documents, &output.records);

    if cfg.output.write_report_json {
        std::fs::write(
            job_dir.join("final").join(&cfg.output.report_filename),
            serde_json::to_string_pretty(&report)?,
        )?;
    }

    if cfg.output.write_index_json {
        let index = serde_json::json!({
            "job_id": job_id,
            "started": started,
            "finished": now_rfc3339(),
            "results": format!("final/{}", cfg.output.results_filename),
            "report": format!("final/{}", cfg.output.report_filename),
        });
        std::fs::write(
            job_dir.join("index.json"),
            serde_json::to_string_pretty(&index)?,
        )?;
    }

    if cfg.global.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "job_id": job_id,
                "job_dir": job_dir,
                "succeeded": report.succeeded,
                "failed": report.failed,
            }))?
        );
    }

    Ok(())
}

fn load_documents(inputs: &[PathBuf]) -> Vec<SourceDocument> {
    inputs.iter().map(|p| SourceDocument::from_path(p)).collect()
}

/// One output pair per document. On a count mismatch (the normalizer does
/// not reconcile lengths) the extra documents or records are skipped with
/// a warning instead of panicking on an index.
fn write_text_files(
    final_dir: &Path,
    documents: &[SourceDocument],
    records: &[ResultRecord],
) -> Result<()> {
    if documents.len() != records.len() {
        warn!(
            "{} documents but {} records; writing the overlapping prefix",
            documents.len(),
            records.len()
        );
    }
    for (doc, rec) in documents.iter().zip(records.iter()) {
        match rec {
            ResultRecord::Success {
                hindi_ocr,
                english_translation,
            } => {
                std::fs::write(final_dir.join(format!("{}.hindi.md", doc.stem())), hindi_ocr)?;
                std::fs::write(
                    final_dir.join(format!("{}.english.md", doc.stem())),
                    english_translation,
                )?;
            }
            ResultRecord::Failure { error, .. } => {
                warn!("no output for {}: {error}", doc.filename());
            }
        }
    }
    Ok(())
}

fn validate_inputs(cfg: &Config, inputs: &[PathBuf]) -> Result<()> {
    if inputs.is_empty() {
        return Err(anyhow!("no input files given"));
    }

    for input in inputs {
        let input_str = input.display().to_string();

        if cfg.security.reject_url_inputs && looks_like_url(&input_str) {
            return Err(anyhow!("URL inputs are disabled: {input_str}"));
        }

        if !input.exists() {
            return Err(anyhow!("input does not exist: {}", input.display()));
        }

        if let Ok(meta) = std::fs::metadata(input) {
            if meta.len() > cfg.limits.max_input_file_bytes {
                return Err(anyhow!(
                    "input exceeds max_input_file_bytes: {} ({} bytes)",
                    input.display(),
                    meta.len()
                ));
            }
        }

        match input.extension().and_then(|s| s.to_str()) {
            Some(ext) => {
                let ext = ext.to_ascii_lowercase();
                if !matches!(ext.as_str(), "pdf" | "jpg" | "jpeg" | "png") {
                    warn!(
                        "unrecognized extension .{ext}; submitting as image/{ext}: {}",
                        input.display()
                    );
                }
            }
            None => warn!("input has no extension: {}", input.display()),
        }
    }

    Ok(())
}

fn looks_like_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("file://")
}

fn resolve_log_path(cfg: &Config, job_dir: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    if let Some(job_dir) = job_dir {
        return Some(job_dir.join("logs").join("granthika.log"));
    }

    Some(PathBuf::from(&cfg.paths.out_dir).join("granthika.log"))
}
