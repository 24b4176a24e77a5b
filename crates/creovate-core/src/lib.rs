pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod lifecycle;
pub mod normalize;
pub mod requests;
pub mod state;
pub mod transport;

// Re-export main types for convenience
pub use api::CreovateClient;
pub use config::{ClientSettings, Config};
pub use conversation::Conversation;
pub use error::{GenerationError, NormalizationError, SubmitError, TransportError, UserInputError};
pub use lifecycle::RequestController;
pub use normalize::classify_sentiment;
pub use requests::{
    BrandRequest, ChatRequest, ContentRequest, GenerationRequest, LogoRequest, SentimentRequest,
};
pub use state::{
    Author, ConversationTurn, ErrorInfo, ErrorKind, GenerationResult, ImageAsset, RequestState,
    SentimentBucket, Workflow,
};
pub use transport::{RawResponse, Transport};
