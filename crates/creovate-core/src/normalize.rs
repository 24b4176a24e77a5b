//! Conversion of raw backend payloads into the values each view renders.
//!
//! Every function here is pure. Text workflows accept a bare JSON string body
//! in place of the expected object; an object without the expected field is a
//! [`NormalizationError`], never a silently displayed body.

use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde_json::Value;

use crate::error::NormalizationError;
use crate::state::{GenerationResult, ImageAsset, SentimentBucket, Workflow};
use crate::transport::RawResponse;

fn ordinal_prefix() -> &'static Regex {
    static ORDINAL: OnceLock<Regex> = OnceLock::new();
    ORDINAL.get_or_init(|| Regex::new(r"^\s*\d+\.\s*").expect("static regex"))
}

fn text_field(raw: &RawResponse, field: &'static str) -> Result<String, NormalizationError> {
    match raw {
        Value::String(body) => Ok(body.clone()),
        Value::Object(map) => match map.get(field) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(_) => Err(NormalizationError::NotText { field }),
            None => Err(NormalizationError::MissingField { field }),
        },
        _ => Err(NormalizationError::MissingField { field }),
    }
}

/// Strip the ordinal marker, then quote and asterisk characters.
pub fn clean_brand_name(line: &str) -> String {
    ordinal_prefix()
        .replace(line, "")
        .chars()
        .filter(|c| *c != '"' && *c != '*')
        .collect()
}

/// Split a newline-delimited suggestion blob into ranked names.
pub fn split_brand_names(blob: &str) -> Vec<String> {
    blob.lines()
        .filter(|line| !line.trim().is_empty())
        .map(clean_brand_name)
        .collect()
}

pub fn brand_names(raw: &RawResponse) -> Result<Vec<String>, NormalizationError> {
    // Some backends already return the list split.
    if let Some(Value::Array(items)) = raw.get("brands") {
        return items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or(NormalizationError::NotText { field: "brands" })
            })
            .filter(|item| !matches!(item, Ok(name) if name.trim().is_empty()))
            .map(|item| item.map(clean_brand_name))
            .collect();
    }
    text_field(raw, "brands").map(|blob| split_brand_names(&blob))
}

pub fn content_text(raw: &RawResponse) -> Result<String, NormalizationError> {
    text_field(raw, "content")
}

pub fn sentiment_label(raw: &RawResponse) -> Result<String, NormalizationError> {
    text_field(raw, "sentiment")
}

/// Lossy display classification: "positive" wins over "negative", anything
/// else is neutral.
pub fn classify_sentiment(label: &str) -> SentimentBucket {
    let lower = label.to_lowercase();
    if lower.contains("positive") {
        SentimentBucket::Positive
    } else if lower.contains("negative") {
        SentimentBucket::Negative
    } else {
        SentimentBucket::Neutral
    }
}

pub fn chat_reply(raw: &RawResponse) -> Result<String, NormalizationError> {
    text_field(raw, "reply")
}

pub fn logo_image(raw: &RawResponse) -> Result<ImageAsset, NormalizationError> {
    let encoded = raw
        .get("image")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(NormalizationError::NoImageReturned)?;

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| NormalizationError::InvalidImage(e.to_string()))?;

    Ok(ImageAsset::png(bytes))
}

impl Workflow {
    pub fn normalize(&self, raw: &RawResponse) -> Result<GenerationResult, NormalizationError> {
        match self {
            Workflow::Brand => brand_names(raw).map(GenerationResult::NameList),
            Workflow::Content => content_text(raw).map(GenerationResult::Text),
            Workflow::Sentiment => sentiment_label(raw).map(GenerationResult::SentimentLabel),
            Workflow::Chat => chat_reply(raw).map(GenerationResult::ChatReply),
            Workflow::Logo => logo_image(raw).map(GenerationResult::ImageAsset),
        }
    }
}
