//! Per-view request lifecycle.
//!
//! A [`RequestController`] owns the [`RequestState`] of one workflow view and
//! at most one in-flight request. The request runs on a spawned task; the view
//! calls [`RequestController::poll`] from its event loop and the state settles
//! once the task has finished. Dropping the controller cancels whatever is
//! still in flight.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::CreovateClient;
use crate::error::{GenerationError, SubmitError, TransportError};
use crate::requests::GenerationRequest;
use crate::state::{ErrorInfo, RequestState, Workflow};
use crate::transport::RawResponse;

type Outcome = Result<RawResponse, GenerationError>;

pub struct RequestController {
    workflow: Workflow,
    timeout: Duration,
    state: RequestState,
    task: Option<JoinHandle<Outcome>>,
    request_token: Option<CancellationToken>,
    view_token: CancellationToken,
}

impl RequestController {
    pub fn new(workflow: Workflow, timeout: Duration) -> Self {
        Self {
            workflow,
            timeout,
            state: RequestState::Idle,
            task: None,
            request_token: None,
            view_token: CancellationToken::new(),
        }
    }

    pub fn workflow(&self) -> Workflow {
        self.workflow
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Validate and send `request` through `client`.
    ///
    /// Rejected without any state change while a request is pending. Requests
    /// built for another workflow or missing a required field are rejected too.
    pub fn submit(
        &mut self,
        client: &CreovateClient,
        request: GenerationRequest,
    ) -> Result<(), SubmitError> {
        if self.is_pending() {
            tracing::debug!(workflow = ?self.workflow, "ignoring submit while pending");
            return Err(SubmitError::Busy);
        }
        if request.workflow() != self.workflow {
            return Err(SubmitError::WrongWorkflow {
                expected: self.workflow,
                got: request.workflow(),
            });
        }
        request.validate()?;

        let client = client.clone();
        self.submit_with(async move { client.send(&request).await })
    }

    /// Start `request` as this view's in-flight request.
    pub fn submit_with<F>(&mut self, request: F) -> Result<(), SubmitError>
    where
        F: Future<Output = Result<RawResponse, TransportError>> + Send + 'static,
    {
        if self.is_pending() {
            tracing::debug!(workflow = ?self.workflow, "ignoring submit while pending");
            return Err(SubmitError::Busy);
        }

        let token = self.view_token.child_token();
        let task_token = token.clone();
        let timeout = self.timeout;

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => Err(GenerationError::Cancelled),
                outcome = tokio::time::timeout(timeout, request) => match outcome {
                    Ok(result) => result.map_err(GenerationError::from),
                    Err(_) => Err(GenerationError::Timeout(timeout)),
                },
            }
        });

        tracing::debug!(workflow = ?self.workflow, "request pending");
        self.task = Some(handle);
        self.request_token = Some(token);
        self.state = RequestState::Pending;
        Ok(())
    }

    /// Settle the state if the in-flight request has finished.
    ///
    /// Returns `true` when the state changed.
    pub async fn poll(&mut self) -> bool {
        let finished = self.task.as_ref().is_some_and(|handle| handle.is_finished());
        if !finished {
            return false;
        }
        self.wait().await;
        true
    }

    /// Wait for the in-flight request, if any, and settle.
    pub async fn wait(&mut self) -> &RequestState {
        if let Some(handle) = self.task.take() {
            self.request_token = None;
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_cancelled() => Err(GenerationError::Cancelled),
                Err(e) => Err(GenerationError::Transport(TransportError::Network(format!(
                    "request task failed: {e}"
                )))),
            };
            self.settle(outcome);
        }
        &self.state
    }

    /// Abandon the in-flight request. Returns `false` if nothing was pending.
    pub fn cancel(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        if let Some(token) = self.request_token.take() {
            token.cancel();
        }
        self.task = None;
        self.state = RequestState::Cancelled;
        tracing::debug!(workflow = ?self.workflow, "request cancelled");
        true
    }

    fn settle(&mut self, outcome: Outcome) {
        if !self.is_pending() {
            return;
        }
        let normalized = outcome.and_then(|raw| {
            self.workflow
                .normalize(&raw)
                .map_err(GenerationError::from)
        });

        self.state = match normalized {
            Ok(result) => {
                tracing::debug!(workflow = ?self.workflow, "request succeeded");
                RequestState::Succeeded(result)
            }
            Err(GenerationError::Cancelled) => RequestState::Cancelled,
            Err(err) => {
                tracing::warn!(workflow = ?self.workflow, error = %err, "request failed");
                RequestState::Failed(ErrorInfo::describe(self.workflow, &err))
            }
        };
    }
}

impl Drop for RequestController {
    fn drop(&mut self) {
        self.view_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ErrorKind, GenerationResult};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    const TIMEOUT: Duration = Duration::from_secs(5);

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    fn assert_exclusive(state: &RequestState) {
        assert!(!(state.result().is_some() && state.error().is_some()));
    }

    #[tokio::test]
    async fn success_normalizes_into_succeeded() {
        let mut controller = RequestController::new(Workflow::Brand, TIMEOUT);
        controller
            .submit_with(async { Ok(json!({ "brands": "1. Aurelia\n2. Lumen" })) })
            .unwrap();
        assert!(controller.is_pending());

        let state = controller.wait().await;
        assert_eq!(
            state,
            &RequestState::Succeeded(GenerationResult::NameList(vec![
                "Aurelia".into(),
                "Lumen".into()
            ]))
        );
        assert_exclusive(state);
    }

    #[tokio::test]
    async fn reentrant_submit_is_ignored() {
        let mut controller = RequestController::new(Workflow::Chat, TIMEOUT);
        controller
            .submit_with(std::future::pending::<Result<RawResponse, TransportError>>())
            .unwrap();

        let second_ran = Arc::new(AtomicBool::new(false));
        let flag = second_ran.clone();
        let result = controller.submit_with(async move {
            flag.store(true, Ordering::SeqCst);
            Ok(json!({ "reply": "second" }))
        });

        assert_eq!(result, Err(SubmitError::Busy));
        assert_eq!(controller.state(), &RequestState::Pending);
        tokio::task::yield_now().await;
        assert!(!second_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn transport_failure_lands_in_failed() {
        let mut controller = RequestController::new(Workflow::Sentiment, TIMEOUT);
        controller
            .submit_with(async { Err(TransportError::Network("connection refused".into())) })
            .unwrap();

        let state = controller.wait().await;
        let info = state.error().expect("failed state");
        assert_eq!(info.kind, ErrorKind::Transport);
        assert_eq!(info.message, Workflow::Sentiment.failure_message());
        assert!(info.detail.contains("connection refused"));
        assert_exclusive(state);
    }

    #[tokio::test]
    async fn missing_logo_image_fails_with_message() {
        let mut controller = RequestController::new(Workflow::Logo, TIMEOUT);
        controller
            .submit_with(async { Ok(json!({ "prompt": "<svg></svg>" })) })
            .unwrap();

        let state = controller.wait().await;
        assert!(state.result().is_none());
        let info = state.error().expect("failed state");
        assert_eq!(info.kind, ErrorKind::Normalization);
        assert!(!info.message.is_empty());
    }

    #[tokio::test]
    async fn hung_request_times_out() {
        let mut controller = RequestController::new(Workflow::Content, Duration::from_millis(20));
        controller
            .submit_with(std::future::pending::<Result<RawResponse, TransportError>>())
            .unwrap();

        let state = controller.wait().await;
        assert_eq!(state.error().map(|e| e.kind), Some(ErrorKind::Timeout));
    }

    #[tokio::test]
    async fn cancel_moves_to_cancelled_and_allows_resubmit() {
        let mut controller = RequestController::new(Workflow::Content, TIMEOUT);
        assert!(!controller.cancel());

        controller
            .submit_with(std::future::pending::<Result<RawResponse, TransportError>>())
            .unwrap();
        assert!(controller.cancel());
        assert_eq!(controller.state(), &RequestState::Cancelled);
        assert!(!controller.poll().await);

        controller
            .submit_with(async { Ok(json!({ "content": "Draft" })) })
            .unwrap();
        assert_eq!(
            controller.wait().await,
            &RequestState::Succeeded(GenerationResult::Text("Draft".into()))
        );
    }

    #[tokio::test]
    async fn resubmit_after_failure_clears_error() {
        let mut controller = RequestController::new(Workflow::Chat, TIMEOUT);
        controller
            .submit_with(async { Err(TransportError::Status { status: 500, body: String::new() }) })
            .unwrap();
        controller.wait().await;
        assert!(controller.state().error().is_some());

        controller
            .submit_with(std::future::pending::<Result<RawResponse, TransportError>>())
            .unwrap();
        assert_eq!(controller.state(), &RequestState::Pending);
        assert!(controller.state().error().is_none());
    }

    #[tokio::test]
    async fn poll_settles_only_once_finished() {
        let mut controller = RequestController::new(Workflow::Sentiment, TIMEOUT);
        let (tx, rx) = tokio::sync::oneshot::channel::<RawResponse>();
        controller
            .submit_with(async move {
                rx.await
                    .map_err(|e| TransportError::Network(e.to_string()))
            })
            .unwrap();

        assert!(!controller.poll().await);
        assert!(controller.is_pending());

        tx.send(json!({ "sentiment": "Positive" })).unwrap();
        let mut settled = false;
        for _ in 0..100 {
            if controller.poll().await {
                settled = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(settled);
        assert_eq!(
            controller.state(),
            &RequestState::Succeeded(GenerationResult::SentimentLabel("Positive".into()))
        );
    }

    #[tokio::test]
    async fn dropping_controller_cancels_in_flight_request() {
        let dropped = Arc::new(AtomicBool::new(false));
        let guard = DropFlag(dropped.clone());

        let mut controller = RequestController::new(Workflow::Logo, TIMEOUT);
        controller
            .submit_with(async move {
                let _guard = guard;
                std::future::pending::<Result<RawResponse, TransportError>>().await
            })
            .unwrap();
        tokio::task::yield_now().await;
        drop(controller);

        for _ in 0..100 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn submit_validates_before_sending() {
        let client = CreovateClient::new("http://127.0.0.1:9").unwrap();
        let mut controller = RequestController::new(Workflow::Brand, TIMEOUT);
        let result = controller.submit(
            &client,
            GenerationRequest::Brand(crate::requests::BrandRequest::default()),
        );
        assert_eq!(
            result,
            Err(SubmitError::Invalid(crate::error::UserInputError::MissingField("Industry")))
        );
        assert_eq!(controller.state(), &RequestState::Idle);
    }

    #[tokio::test]
    async fn submit_rejects_request_for_another_workflow() {
        let client = CreovateClient::new("http://127.0.0.1:9").unwrap();
        let mut controller = RequestController::new(Workflow::Logo, TIMEOUT);
        let result = controller.submit(
            &client,
            GenerationRequest::Brand(crate::requests::BrandRequest {
                industry: "Perfume".into(),
                ..Default::default()
            }),
        );
        assert_eq!(
            result,
            Err(SubmitError::WrongWorkflow {
                expected: Workflow::Logo,
                got: Workflow::Brand
            })
        );
        assert_eq!(controller.state(), &RequestState::Idle);
    }
}
