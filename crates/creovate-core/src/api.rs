use crate::config::ClientSettings;
use crate::error::TransportError;
use crate::requests::{
    BrandRequest, ChatRequest, ContentRequest, GenerationRequest, LogoRequest, SentimentRequest,
};
use crate::state::Workflow;
use crate::transport::{RawResponse, Transport};

/// The five generation endpoints. Each call shapes the request and hands back
/// the unnormalized body.
#[derive(Clone, Debug)]
pub struct CreovateClient {
    transport: Transport,
}

impl CreovateClient {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            transport: Transport::new(base_url)?,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, TransportError> {
        Self::new(&settings.base_url)
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub async fn generate_brand(&self, req: &BrandRequest) -> Result<RawResponse, TransportError> {
        self.transport.post(Workflow::Brand.path(), req).await
    }

    pub async fn generate_content(&self, req: &ContentRequest) -> Result<RawResponse, TransportError> {
        self.transport.post(Workflow::Content.path(), req).await
    }

    pub async fn analyze_sentiment(&self, req: &SentimentRequest) -> Result<RawResponse, TransportError> {
        self.transport.post(Workflow::Sentiment.path(), req).await
    }

    pub async fn chat(&self, req: &ChatRequest) -> Result<RawResponse, TransportError> {
        self.transport.post(Workflow::Chat.path(), req).await
    }

    pub async fn generate_logo(&self, req: &LogoRequest) -> Result<RawResponse, TransportError> {
        self.transport.post(Workflow::Logo.path(), req).await
    }

    /// Route a request to its endpoint.
    pub async fn send(&self, request: &GenerationRequest) -> Result<RawResponse, TransportError> {
        match request {
            GenerationRequest::Brand(r) => self.generate_brand(r).await,
            GenerationRequest::Content(r) => self.generate_content(r).await,
            GenerationRequest::Sentiment(r) => self.analyze_sentiment(r).await,
            GenerationRequest::Chat(r) => self.chat(r).await,
            GenerationRequest::Logo(r) => self.generate_logo(r).await,
        }
    }
}
