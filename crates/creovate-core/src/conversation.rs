//! Chat transcript driven by a [`RequestController`].

use std::future::Future;
use std::time::Duration;

use crate::api::CreovateClient;
use crate::error::{SubmitError, TransportError};
use crate::lifecycle::RequestController;
use crate::requests::{ChatRequest, GenerationRequest};
use crate::state::{
    Author, CHAT_APOLOGY, CHAT_GREETING, ConversationTurn, GenerationResult, RequestState,
    Workflow,
};
use crate::transport::RawResponse;

/// Append-only transcript for one chat view.
///
/// Every accepted message adds exactly two turns: the user's message right
/// away, and either the assistant reply or a fixed apology once the request
/// settles.
pub struct Conversation {
    transcript: Vec<ConversationTurn>,
    controller: RequestController,
}

impl Conversation {
    pub fn new(timeout: Duration) -> Self {
        Self {
            transcript: vec![ConversationTurn::assistant(CHAT_GREETING)],
            controller: RequestController::new(Workflow::Chat, timeout),
        }
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    pub fn state(&self) -> &RequestState {
        self.controller.state()
    }

    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    /// Most recent assistant turn, greeting included.
    pub fn last_reply(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|turn| turn.author == Author::Assistant)
            .map(|turn| turn.content.as_str())
    }

    pub fn send(&mut self, client: &CreovateClient, message: &str) -> Result<(), SubmitError> {
        let request = GenerationRequest::Chat(ChatRequest {
            message: message.to_string(),
        });
        self.controller.submit(client, request)?;
        self.transcript.push(ConversationTurn::user(message));
        Ok(())
    }

    /// Like [`Conversation::send`] with a caller-supplied request future.
    pub fn send_with<F>(&mut self, message: &str, request: F) -> Result<(), SubmitError>
    where
        F: Future<Output = Result<RawResponse, TransportError>> + Send + 'static,
    {
        if self.controller.is_pending() {
            return Err(SubmitError::Busy);
        }
        GenerationRequest::Chat(ChatRequest {
            message: message.to_string(),
        })
        .validate()?;
        self.controller.submit_with(request)?;
        self.transcript.push(ConversationTurn::user(message));
        Ok(())
    }

    /// Record the reply if the exchange has settled. Returns `true` when a
    /// turn was appended.
    pub async fn poll(&mut self) -> bool {
        if self.controller.poll().await {
            self.record_reply();
            true
        } else {
            false
        }
    }

    pub async fn wait(&mut self) {
        if self.controller.is_pending() {
            self.controller.wait().await;
            self.record_reply();
        }
    }

    pub fn cancel(&mut self) -> bool {
        if self.controller.cancel() {
            self.record_reply();
            true
        } else {
            false
        }
    }

    fn record_reply(&mut self) {
        let turn = match self.controller.state() {
            RequestState::Succeeded(GenerationResult::ChatReply(reply)) => {
                ConversationTurn::assistant(reply.clone())
            }
            RequestState::Idle | RequestState::Pending => return,
            _ => ConversationTurn::assistant(CHAT_APOLOGY),
        };
        self.transcript.push(turn);
    }
}
