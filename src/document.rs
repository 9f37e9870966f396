use crate::error::{Result, TranslateError};
use std::path::{Path, PathBuf};

/// One unit of input: a scanned page image or a PDF, submitted by path or
/// as an in-memory buffer (the web/capture front ends hold bytes, the CLI
/// holds paths). Immutable once constructed.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    source: DocumentSource,
    filename: String,
    mime_type: String,
}

#[derive(Debug, Clone)]
enum DocumentSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

impl SourceDocument {
    pub fn from_path(path: &Path) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_for_filename(&filename);
        Self {
            source: DocumentSource::Path(path.to_path_buf()),
            filename,
            mime_type,
        }
    }

    pub fn from_bytes(data: Vec<u8>, filename: &str, mime_type: &str) -> Self {
        Self {
            source: DocumentSource::Memory(data),
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The filename without its extension, for naming output files.
    pub fn stem(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.filename,
        }
    }

    /// Size in bytes without reading the content; `None` when the path
    /// cannot be stat'ed.
    pub fn byte_len(&self) -> Option<u64> {
        match &self.source {
            DocumentSource::Path(p) => std::fs::metadata(p).ok().map(|m| m.len()),
            DocumentSource::Memory(data) => Some(data.len() as u64),
        }
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.source {
            DocumentSource::Path(p) => {
                std::fs::read(p).map_err(|source| TranslateError::DocumentRead {
                    name: self.filename.clone(),
                    source,
                })
            }
            DocumentSource::Memory(data) => Ok(data.clone()),
        }
    }
}

/// Extension-to-MIME lookup. The `image/{ext}` fallback is best-effort and
/// not validated against the IANA registry; the remote service rejects
/// types it cannot decode.
pub fn mime_for_filename(filename: &str) -> String {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => return "application/octet-stream".to_string(),
    };
    match ext.as_str() {
        "pdf" => "application/pdf".to_string(),
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        other => format!("image/{other}"),
    }
}
