//! Typed request bodies for the five generation endpoints.
//!
//! Field names serialize exactly as the backend expects them. Optional fields
//! are still sent, as empty strings, because the backend declares every field
//! as a required string.

use serde::Serialize;

use crate::error::UserInputError;
use crate::state::Workflow;

pub const DEFAULT_TONE: &str = "Sophisticated";
pub const DEFAULT_CONTENT_TYPE: &str = "Blog Post";
pub const DEFAULT_LOGO_COLOR: &str = "gold";

pub const BRAND_TONES: &[&str] = &["Sophisticated", "Modern", "Classic", "Avant-Garde"];
pub const CONTENT_TONES: &[&str] = &["Sophisticated", "Persuasive", "Inspirational", "Technical"];
pub const CONTENT_TYPES: &[&str] = &[
    "Blog Post",
    "Social Media Caption",
    "Email Newsletter",
    "Product Description",
    "Press Release",
];

fn require(value: &str, field: &'static str) -> Result<(), UserInputError> {
    if value.trim().is_empty() {
        Err(UserInputError::MissingField(field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandRequest {
    pub industry: String,
    pub keywords: String,
    pub tone: String,
}

impl Default for BrandRequest {
    fn default() -> Self {
        Self {
            industry: String::new(),
            keywords: String::new(),
            tone: DEFAULT_TONE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentRequest {
    pub description: String,
    pub tone: String,
    pub content_type: String,
}

impl Default for ContentRequest {
    fn default() -> Self {
        Self {
            description: String::new(),
            tone: DEFAULT_TONE.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoRequest {
    pub brand_name: String,
    pub industry: String,
    pub keywords: String,
    pub color: String,
}

impl Default for LogoRequest {
    fn default() -> Self {
        Self {
            brand_name: String::new(),
            industry: String::new(),
            keywords: String::new(),
            color: DEFAULT_LOGO_COLOR.to_string(),
        }
    }
}

/// One submitted form, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    Brand(BrandRequest),
    Content(ContentRequest),
    Sentiment(SentimentRequest),
    Chat(ChatRequest),
    Logo(LogoRequest),
}

impl GenerationRequest {
    pub fn workflow(&self) -> Workflow {
        match self {
            GenerationRequest::Brand(_) => Workflow::Brand,
            GenerationRequest::Content(_) => Workflow::Content,
            GenerationRequest::Sentiment(_) => Workflow::Sentiment,
            GenerationRequest::Chat(_) => Workflow::Chat,
            GenerationRequest::Logo(_) => Workflow::Logo,
        }
    }

    /// Check required fields before anything is sent.
    pub fn validate(&self) -> Result<(), UserInputError> {
        match self {
            GenerationRequest::Brand(r) => require(&r.industry, "Industry"),
            GenerationRequest::Content(r) => require(&r.description, "Description"),
            GenerationRequest::Sentiment(r) => require(&r.text, "Text"),
            GenerationRequest::Chat(r) => require(&r.message, "Message"),
            GenerationRequest::Logo(r) => {
                require(&r.brand_name, "Brand name")?;
                require(&r.industry, "Industry")
            }
        }
    }
}
