//! UI-agnostic workflow state types
//!
//! These types are shared by every front end and don't depend on any UI
//! framework. Each workflow view owns one [`RequestState`]; the chat view also
//! owns a transcript of [`ConversationTurn`]s.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

pub const PNG_MIME: &str = "image/png";

/// The five independent generation tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Workflow {
    Brand,
    Content,
    Sentiment,
    Chat,
    Logo,
}

impl Workflow {
    pub fn all() -> [Workflow; 5] {
        [
            Workflow::Brand,
            Workflow::Content,
            Workflow::Sentiment,
            Workflow::Chat,
            Workflow::Logo,
        ]
    }

    /// Endpoint path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Workflow::Brand => "generate-brand",
            Workflow::Content => "generate-content",
            Workflow::Sentiment => "analyze-sentiment",
            Workflow::Chat => "chat",
            Workflow::Logo => "generate-logo",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Workflow::Brand => "Brand Identity",
            Workflow::Content => "Content Suite",
            Workflow::Sentiment => "Sentiment Intelligence",
            Workflow::Chat => "AI Concierge",
            Workflow::Logo => "Logo Design",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Workflow::Brand => "Curate unique, premium brand names that resonate with luxury.",
            Workflow::Content => "Craft sophisticated marketing copy for your high-end clientele.",
            Workflow::Sentiment => "Deeply understand the emotional spectrum of your audience.",
            Workflow::Chat => "A dedicated intelligent assistant for your creative needs.",
            Workflow::Logo => "Generate stunning, minimalist vector logos instantly.",
        }
    }

    /// User-safe text shown when a request for this workflow fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Workflow::Brand => "Unable to generate brand names. Please try again.",
            Workflow::Content => "Unable to draft content. Please try again.",
            Workflow::Sentiment => "Unable to analyze sentiment. Please try again.",
            Workflow::Chat => CHAT_APOLOGY,
            Workflow::Logo => "Failed to generate logo. Please check your API key and try again.",
        }
    }
}

pub const CHAT_GREETING: &str = "Greetings. I am Creovate. How may I assist you today?";
pub const CHAT_APOLOGY: &str = "I apologize, but I am currently unable to process your request.";

/// A decoded image ready for display or export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl ImageAsset {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: PNG_MIME,
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// Width and height from the PNG IHDR chunk, if the header is intact.
    pub fn png_dimensions(&self) -> Option<(u32, u32)> {
        const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
        let b = &self.bytes;
        if b.len() < 24 || &b[..8] != SIGNATURE || &b[12..16] != b"IHDR" {
            return None;
        }
        let width = u32::from_be_bytes([b[16], b[17], b[18], b[19]]);
        let height = u32::from_be_bytes([b[20], b[21], b[22], b[23]]);
        Some((width, height))
    }
}

/// Normalized value a view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    NameList(Vec<String>),
    Text(String),
    SentimentLabel(String),
    ChatReply(String),
    ImageAsset(ImageAsset),
}

/// Display bucket for an open-vocabulary sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBucket {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Normalization,
    Timeout,
}

/// Failure surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    /// Workflow-specific, user-safe message.
    pub message: String,
    /// Underlying cause, for logs and an optional detail line.
    pub detail: String,
}

impl ErrorInfo {
    pub fn describe(workflow: Workflow, err: &GenerationError) -> Self {
        let kind = match err {
            GenerationError::Transport(_) | GenerationError::Cancelled => ErrorKind::Transport,
            GenerationError::Normalization(_) => ErrorKind::Normalization,
            GenerationError::Timeout(_) => ErrorKind::Timeout,
        };
        Self {
            kind,
            message: workflow.failure_message().to_string(),
            detail: err.to_string(),
        }
    }
}

/// Lifecycle of the single request a view may have in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded(GenerationResult),
    Failed(ErrorInfo),
    Cancelled,
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            RequestState::Failed(info) => Some(info),
            _ => None,
        }
    }
}

/// Who wrote a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Author {
    User,
    Assistant,
}

/// A single entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub author: Author,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            author: Author::Assistant,
            content: content.into(),
        }
    }
}
