use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use creovate_core::{
    BrandRequest, ContentRequest, Conversation, CreovateClient, GenerationRequest,
    GenerationResult, LogoRequest, RequestController, RequestState, SentimentRequest,
    SubmitError, Workflow,
};
use ratatui::widgets::ListState;

use crate::form::{Form, TextField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Brand,
    Content,
    Sentiment,
    Chat,
    Logo,
}

impl Screen {
    pub fn for_workflow(workflow: Workflow) -> Self {
        match workflow {
            Workflow::Brand => Screen::Brand,
            Workflow::Content => Screen::Content,
            Workflow::Sentiment => Screen::Sentiment,
            Workflow::Chat => Screen::Chat,
            Workflow::Logo => Screen::Logo,
        }
    }

    pub fn workflow(self) -> Option<Workflow> {
        match self {
            Screen::Home => None,
            Screen::Brand => Some(Workflow::Brand),
            Screen::Content => Some(Workflow::Content),
            Screen::Sentiment => Some(Workflow::Sentiment),
            Screen::Chat => Some(Workflow::Chat),
            Screen::Logo => Some(Workflow::Logo),
        }
    }
}

/// A single-shot workflow: a form and the state of its one request.
pub struct GenerateView {
    pub form: Form,
    pub controller: RequestController,
    /// The request behind the current result, kept for the logo export name.
    pub submitted: Option<GenerationRequest>,
    pub notice: Option<String>,
}

pub struct ChatView {
    pub input: TextField,
    pub conversation: Conversation,
    pub notice: Option<String>,
    pub scroll: u16,
    pub height: u16, // Inner height of the transcript area
    pub width: u16,  // Inner width of the transcript area
}

impl GenerateView {
    /// Brand name the current logo was generated for.
    pub fn logo_brand_name(&self) -> &str {
        match &self.submitted {
            Some(GenerationRequest::Logo(request)) => request.brand_name.as_str(),
            _ => self.form.value("Brand name"),
        }
    }
}

/// Per-screen state. Created when a workflow is entered and dropped when
/// the user leaves it, which cancels anything still in flight.
pub enum View {
    Generate(GenerateView),
    Chat(ChatView),
}

impl View {
    fn new(workflow: Workflow, timeout: Duration) -> Self {
        match Form::for_workflow(workflow) {
            Some(form) => View::Generate(GenerateView {
                form,
                controller: RequestController::new(workflow, timeout),
                submitted: None,
                notice: None,
            }),
            None => View::Chat(ChatView {
                input: TextField::default(),
                conversation: Conversation::new(timeout),
                notice: None,
                scroll: 0,
                height: 0,
                width: 0,
            }),
        }
    }

    pub fn state(&self) -> &RequestState {
        match self {
            View::Generate(view) => view.controller.state(),
            View::Chat(view) => view.conversation.state(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }
}

/// Build the request for `workflow` from the current form values. Chat
/// messages come from the chat input line, not a form.
pub fn build_request(workflow: Workflow, form: &Form) -> Option<GenerationRequest> {
    let value = |label: &str| form.value(label).trim().to_string();
    let request = match workflow {
        Workflow::Brand => GenerationRequest::Brand(BrandRequest {
            industry: value("Industry"),
            keywords: value("Keywords"),
            tone: value("Tone"),
        }),
        Workflow::Content => GenerationRequest::Content(ContentRequest {
            description: value("Description"),
            tone: value("Tone"),
            content_type: value("Content type"),
        }),
        Workflow::Sentiment => GenerationRequest::Sentiment(SentimentRequest {
            text: value("Text"),
        }),
        Workflow::Chat => return None,
        Workflow::Logo => GenerationRequest::Logo(LogoRequest {
            brand_name: value("Brand name"),
            industry: value("Industry"),
            keywords: value("Keywords"),
            color: value("Color"),
        }),
    };
    Some(request)
}

/// File name for an exported logo: whitespace runs become `_`.
pub fn logo_file_name(brand_name: &str) -> String {
    let mut stem = String::new();
    let mut in_space = false;
    for c in brand_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            // Keep the name inside the target directory
            stem.push(if c == '/' || c == '\\' { '_' } else { c });
            in_space = false;
        }
    }
    format!("{stem}_logo.png")
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub home_state: ListState,
    pub view: Option<View>,

    // One-line feedback in the header (copy, export)
    pub status: Option<String>,

    // Animation state
    pub animation_frame: u8,

    client: CreovateClient,
    timeout: Duration,
}

impl App {
    pub fn new(client: CreovateClient, timeout: Duration) -> Self {
        let mut home_state = ListState::default();
        home_state.select(Some(0));
        Self {
            should_quit: false,
            screen: Screen::Home,
            home_state,
            view: None,
            status: None,
            animation_frame: 0,
            client,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn selected_workflow(&self) -> Workflow {
        let workflows = Workflow::all();
        let i = self.home_state.selected().unwrap_or(0);
        workflows[i.min(workflows.len() - 1)]
    }

    pub fn home_nav_down(&mut self) {
        let len = Workflow::all().len();
        let i = match self.home_state.selected() {
            Some(i) if i + 1 >= len => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.home_state.select(Some(i));
    }

    pub fn home_nav_up(&mut self) {
        let len = Workflow::all().len();
        let i = match self.home_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.home_state.select(Some(i));
    }

    pub fn enter(&mut self, workflow: Workflow) {
        tracing::debug!(?workflow, "entering workflow");
        self.view = Some(View::new(workflow, self.timeout));
        self.screen = Screen::for_workflow(workflow);
        self.status = None;
        self.animation_frame = 0;
    }

    pub fn enter_selected(&mut self) {
        self.enter(self.selected_workflow());
    }

    /// Tear the current view down and return to the menu.
    pub fn go_home(&mut self) {
        if let Some(view) = self.view.take() {
            if view.is_pending() {
                tracing::debug!(screen = ?self.screen, "leaving view with request in flight");
            }
        }
        self.screen = Screen::Home;
        self.status = None;
    }

    pub fn is_pending(&self) -> bool {
        self.view.as_ref().is_some_and(View::is_pending)
    }

    pub fn submit(&mut self) {
        let Some(workflow) = self.screen.workflow() else {
            return;
        };
        let client = &self.client;

        match self.view.as_mut() {
            Some(View::Generate(view)) => {
                let Some(request) = build_request(workflow, &view.form) else {
                    return;
                };
                match view.controller.submit(client, request.clone()) {
                    Ok(()) => {
                        view.submitted = Some(request);
                        view.notice = None;
                    }
                    Err(SubmitError::Busy) => {}
                    Err(e) => view.notice = Some(e.to_string()),
                }
            }
            Some(View::Chat(view)) => {
                let message = view.input.value().to_string();
                match view.conversation.send(client, &message) {
                    Ok(()) => {
                        view.input.clear();
                        view.notice = None;
                        scroll_chat_to_bottom(view);
                    }
                    Err(SubmitError::Busy) => {}
                    Err(e) => view.notice = Some(e.to_string()),
                }
            }
            None => {}
        }
    }

    pub fn cancel(&mut self) -> bool {
        match self.view.as_mut() {
            Some(View::Generate(view)) => view.controller.cancel(),
            Some(View::Chat(view)) => {
                let cancelled = view.conversation.cancel();
                if cancelled {
                    scroll_chat_to_bottom(view);
                }
                cancelled
            }
            None => false,
        }
    }

    /// Settle the active view's request if it has finished.
    pub async fn poll(&mut self) -> bool {
        match self.view.as_mut() {
            Some(View::Generate(view)) => view.controller.poll().await,
            Some(View::Chat(view)) => {
                let settled = view.conversation.poll().await;
                if settled {
                    scroll_chat_to_bottom(view);
                }
                settled
            }
            None => false,
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Text for the clipboard: every brand name, the draft, the sentiment
    /// label, or the latest chat reply.
    pub fn result_text(&self) -> Option<String> {
        match self.view.as_ref()? {
            View::Generate(view) => match view.controller.state().result()? {
                GenerationResult::NameList(names) => Some(names.join("\n")),
                GenerationResult::Text(text)
                | GenerationResult::SentimentLabel(text)
                | GenerationResult::ChatReply(text) => Some(text.clone()),
                GenerationResult::ImageAsset(_) => None,
            },
            View::Chat(view) => view.conversation.last_reply().map(str::to_string),
        }
    }

    /// Write the generated logo into `dir`. Returns `None` when there is no
    /// logo to save.
    pub fn save_logo(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let Some(View::Generate(view)) = self.view.as_ref() else {
            return Ok(None);
        };
        let Some(GenerationResult::ImageAsset(asset)) = view.controller.state().result() else {
            return Ok(None);
        };
        let path = dir.join(logo_file_name(view.logo_brand_name()));
        std::fs::write(&path, &asset.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = asset.bytes.len(), "logo saved");
        Ok(Some(path))
    }
}

/// Scroll the transcript so the newest turn (or "Thinking...") is visible.
fn scroll_chat_to_bottom(view: &mut ChatView) {
    // Use actual transcript width for wrap calculation, default to 50 if not set
    let wrap_width = if view.width > 0 { view.width as usize } else { 50 };

    let mut total_lines: usize = 0;
    for turn in view.conversation.transcript() {
        total_lines = total_lines.saturating_add(1); // Author line ("You:" or "AI:")
        for line in turn.content.lines() {
            let char_count = line.chars().count();
            total_lines = total_lines.saturating_add(char_count / wrap_width + 1);
        }
        total_lines = total_lines.saturating_add(1); // Blank line after turn
    }
    if view.conversation.is_pending() {
        total_lines = total_lines.saturating_add(2); // "AI:" + "Thinking..."
    }

    // Paragraph scroll offsets are u16; pin very long transcripts to the cap.
    let total_lines = u16::try_from(total_lines).unwrap_or(u16::MAX);
    let visible_height = if view.height > 0 { view.height } else { 20 };
    view.scroll = total_lines.saturating_sub(visible_height);
}
