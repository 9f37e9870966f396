use crate::config::Config;
use crate::normalize::ResultRecord;
use unicode_normalization::UnicodeNormalization;

/// Config-gated cleanup of the remote text. NFC (not NFKC) so Devanagari
/// conjuncts and IAST combining diacritics compose without losing
/// distinctions. Failure records pass through untouched.
pub fn tidy_records(cfg: &Config, records: Vec<ResultRecord>) -> Vec<ResultRecord> {
    records
        .into_iter()
        .map(|rec| match rec {
            ResultRecord::Success {
                hindi_ocr,
                english_translation,
            } => ResultRecord::Success {
                hindi_ocr: tidy_text(cfg, &hindi_ocr),
                english_translation: tidy_text(cfg, &english_translation),
            },
            failure => failure,
        })
        .collect()
}

pub fn tidy_text(cfg: &Config, s: &str) -> String {
    let mut out = s.to_string();

    if cfg.postprocess.normalize_newlines {
        out = out.replace("\r\n", "\n");
    }

    if cfg.postprocess.normalize_unicode {
        out = out.nfc().collect::<String>();
    }

    if cfg.postprocess.trim_trailing_whitespace {
        out = out
            .lines()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
    }

    out
}
