use crate::document::SourceDocument;
use crate::error::{Result, TranslateError};
use tracing::debug;

/// One element of the multi-part request body, in submission order.
#[derive(Debug, Clone)]
pub enum ContentPart {
    Blob { data: Vec<u8>, mime_type: String },
    Text { text: String },
}

#[derive(Debug, Clone)]
pub struct AssembledRequest {
    pub parts: Vec<ContentPart>,
    pub instruction: String,
}

/// Directive appended for batches of two or more files. The exact phrasing
/// is load-bearing: it is the only signal telling the remote service to
/// answer with an array instead of a single object.
const MULTI_FILE_DIRECTIVE: &str = "\n\nCRITICAL: You are processing multiple \
files. Return a JSON ARRAY of objects, one for each file in the same order.";

const SINGLE_FILE_DIRECTIVE: &str = "\n\nReturn a single JSON object for the file.";

/// Packages the documents into an ordered part list and derives the final
/// instruction text. Each document contributes its raw bytes immediately
/// followed by a `File {n}: {name}` label; position and label are the only
/// correlation the stateless remote call gets.
///
/// Reading any document fails the whole batch; there is no partial
/// submission.
pub fn assemble(documents: &[SourceDocument], base_prompt: &str) -> Result<AssembledRequest> {
    if documents.is_empty() {
        return Err(TranslateError::Configuration(
            "no documents to translate".into(),
        ));
    }

    let mut parts = Vec::with_capacity(documents.len() * 2);
    for (idx, doc) in documents.iter().enumerate() {
        debug!(
            "preparing file {}: {} ({})",
            idx + 1,
            doc.filename(),
            doc.mime_type()
        );
        let data = doc.read_bytes()?;
        parts.push(ContentPart::Blob {
            data,
            mime_type: doc.mime_type().to_string(),
        });
        parts.push(ContentPart::Text {
            text: format!("File {}: {}", idx + 1, doc.filename()),
        });
    }

    let directive = if documents.len() > 1 {
        MULTI_FILE_DIRECTIVE
    } else {
        SINGLE_FILE_DIRECTIVE
    };
    let instruction = format!("{base_prompt}{directive}");

    Ok(AssembledRequest { parts, instruction })
}
