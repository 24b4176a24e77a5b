use creovate_core::{
    classify_sentiment, Author, ErrorInfo, GenerationResult, ImageAsset, RequestState,
    SentimentBucket, Workflow,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{logo_file_name, App, ChatView, GenerateView, Screen, View};
use crate::form::{Field, FieldInput};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let animation_frame = app.animation_frame;
    match app.view.as_mut() {
        None => render_home(app, frame, body_area),
        Some(View::Generate(view)) => render_generate(view, animation_frame, frame, body_area),
        Some(View::Chat(view)) => render_chat(view, animation_frame, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" Creovate ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" "),
        Span::styled(app.base_url().to_string(), Style::default().fg(Color::Gray)),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Yellow)));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = if app.is_pending() {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else {
        Style::default().bg(Color::Blue).fg(Color::White)
    };

    let mode_text = match app.screen {
        Screen::Home => " HOME ",
        Screen::Brand => " BRAND ",
        Screen::Content => " CONTENT ",
        Screen::Sentiment => " SENTIMENT ",
        Screen::Chat => " CHAT ",
        Screen::Logo => " LOGO ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(format!(" {key} "), key_style),
            Span::styled(format!(" {label} "), label_style),
        ]
    };

    let mut hints: Vec<Span> = Vec::new();
    match app.screen {
        Screen::Home => {
            hints.extend(hint("j/k", "nav"));
            hints.extend(hint("Enter", "open"));
            hints.extend(hint("q", "quit"));
        }
        Screen::Chat => {
            hints.extend(hint("Enter", "send"));
            hints.extend(hint("↑/↓", "scroll"));
            if app.is_pending() {
                hints.extend(hint("^X", "cancel"));
            }
            hints.extend(hint("^Y", "copy reply"));
            hints.extend(hint("Esc", "home"));
        }
        screen => {
            hints.extend(hint("Tab", "field"));
            hints.extend(hint("←/→", "option"));
            hints.extend(hint("Enter", "generate"));
            if app.is_pending() {
                hints.extend(hint("^X", "cancel"));
            }
            if screen == Screen::Logo {
                hints.extend(hint("^S", "save png"));
            } else {
                hints.extend(hint("^Y", "copy"));
            }
            hints.extend(hint("Esc", "home"));
        }
    }

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_home(app: &mut App, frame: &mut Frame, area: Rect) {
    let [menu_area, detail_area] = Layout::horizontal([
        Constraint::Length(30),
        Constraint::Min(0),
    ])
    .areas(area);

    let items: Vec<ListItem> = Workflow::all()
        .iter()
        .map(|w| ListItem::new(format!(" {} ", w.display_name())))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Workflows "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, menu_area, &mut app.home_state);

    let selected = app.selected_workflow();
    let detail = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            selected.display_name(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(selected.description()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" About "),
    )
    .wrap(Wrap { trim: true });

    frame.render_widget(detail, detail_area);
}

fn render_generate(view: &GenerateView, animation_frame: u8, frame: &mut Frame, area: Rect) {
    let fields = view.form.fields();
    let form_height = fields.len() as u16 * 3;

    let [form_area, notice_area, result_area] = Layout::vertical([
        Constraint::Length(form_height),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let rows = Layout::vertical(vec![Constraint::Length(3); fields.len()]).split(form_area);
    for (i, (field, row)) in fields.iter().zip(rows.iter()).enumerate() {
        render_field(field, i == view.form.focus(), frame, *row);
    }

    if let Some(notice) = &view.notice {
        let line = Paragraph::new(Span::styled(
            format!(" {notice}"),
            Style::default().fg(Color::Yellow),
        ));
        frame.render_widget(line, notice_area);
    }

    render_result(view, animation_frame, frame, result_area);
}

fn render_field(field: &Field, focused: bool, frame: &mut Frame, area: Rect) {
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let title = if field.required {
        format!(" {} * ", field.label)
    } else {
        format!(" {} ", field.label)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    match &field.input {
        FieldInput::Text(text) => {
            // Horizontal scroll keeps the cursor inside the box
            let inner_width = area.width.saturating_sub(2) as usize;
            let cursor_pos = text.cursor();
            let scroll_offset = if inner_width == 0 {
                0
            } else if cursor_pos >= inner_width {
                cursor_pos - inner_width + 1
            } else {
                0
            };
            let visible: String = text
                .value()
                .chars()
                .skip(scroll_offset)
                .take(inner_width)
                .collect();

            let input = Paragraph::new(visible)
                .style(Style::default().fg(Color::Cyan))
                .block(block);
            frame.render_widget(input, area);

            if focused {
                let cursor_x = (cursor_pos - scroll_offset) as u16;
                frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
            }
        }
        FieldInput::Choice(choice) => {
            let arrow_style = Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray });
            let line = Line::from(vec![
                Span::styled("◂ ", arrow_style),
                Span::styled(choice.value(), Style::default().fg(Color::White).bold()),
                Span::styled(" ▸", arrow_style),
            ]);
            frame.render_widget(Paragraph::new(line).block(block), area);
        }
    }
}

fn render_result(view: &GenerateView, animation_frame: u8, frame: &mut Frame, area: Rect) {
    let workflow = view.controller.workflow();
    let state = view.controller.state();
    if let RequestState::Failed(info) = state {
        render_error(info, frame, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", workflow.display_name()));

    let text = match state {
        RequestState::Idle => Text::from(Span::styled(
            "Fill in the form and press Enter.",
            Style::default().fg(Color::DarkGray),
        )),
        RequestState::Pending => {
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((animation_frame as usize) + 1);
            Text::from(Span::styled(
                format!("Working{dots}"),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))
        }
        RequestState::Cancelled => Text::from(Span::styled(
            "Request cancelled.",
            Style::default().fg(Color::DarkGray),
        )),
        RequestState::Succeeded(result) => result_text(result, view),
        RequestState::Failed(_) => Text::default(),
    };

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn result_text(result: &GenerationResult, view: &GenerateView) -> Text<'static> {
    match result {
        GenerationResult::NameList(names) => Text::from(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    Line::from(vec![
                        Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
                        Span::styled(name.clone(), Style::default().fg(Color::Yellow).bold()),
                    ])
                })
                .collect::<Vec<_>>(),
        ),
        GenerationResult::Text(text) | GenerationResult::ChatReply(text) => {
            Text::from(text.lines().map(|l| Line::from(l.to_string())).collect::<Vec<_>>())
        }
        GenerationResult::SentimentLabel(label) => {
            let color = match classify_sentiment(label) {
                SentimentBucket::Positive => Color::Green,
                SentimentBucket::Negative => Color::Red,
                SentimentBucket::Neutral => Color::Yellow,
            };
            Text::from(vec![
                Line::from(Span::styled("Sentiment", Style::default().fg(Color::DarkGray))),
                Line::from(Span::styled(
                    label.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
            ])
        }
        GenerationResult::ImageAsset(asset) => logo_summary(asset, view.logo_brand_name()),
    }
}

/// Terminals can't show the image itself, so describe it and point at the
/// export key.
fn logo_summary(asset: &ImageAsset, brand_name: &str) -> Text<'static> {
    let dimensions = match asset.png_dimensions() {
        Some((w, h)) => format!("{w}×{h}"),
        None => "unknown".to_string(),
    };
    let label = Style::default().fg(Color::DarkGray);
    Text::from(vec![
        Line::from(Span::styled(
            "Logo ready",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![Span::styled("Type       ", label), Span::raw(asset.mime_type)]),
        Line::from(vec![
            Span::styled("Size       ", label),
            Span::raw(format!("{} bytes", asset.bytes.len())),
        ]),
        Line::from(vec![Span::styled("Dimensions ", label), Span::raw(dimensions)]),
        Line::default(),
        Line::from(vec![
            Span::styled("^S", Style::default().fg(Color::Cyan).bold()),
            Span::raw(format!(" saves {}", logo_file_name(brand_name))),
        ]),
    ])
}

fn render_error(info: &ErrorInfo, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error ");

    let text = Text::from(vec![
        Line::from(Span::styled(
            info.message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(info.detail.clone(), Style::default().fg(Color::DarkGray))),
    ]);

    frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), area);
}

fn render_chat(view: &mut ChatView, animation_frame: u8, frame: &mut Frame, area: Rect) {
    let error = view.conversation.state().error().cloned();
    let status_height = if error.is_some() || view.notice.is_some() { 1 } else { 0 };

    let [chat_area, status_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(status_height),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store transcript dimensions for scroll calculations (inner size minus borders)
    view.height = chat_area.height.saturating_sub(2);
    view.width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", Workflow::Chat.display_name()));

    let mut lines: Vec<Line> = Vec::new();
    for turn in view.conversation.transcript() {
        match turn.author {
            Author::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
            }
            Author::Assistant => {
                lines.push(Line::from(Span::styled(
                    "AI:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
            }
        }
        for line in turn.content.lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::default());
    }

    if view.conversation.is_pending() {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{dots}"),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((view.scroll, 0));
    frame.render_widget(chat, chat_area);

    if let Some(notice) = &view.notice {
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {notice}"), Style::default().fg(Color::Yellow))),
            status_area,
        );
    } else if let Some(info) = error {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", info.detail),
                Style::default().fg(Color::Red),
            )),
            status_area,
        );
    }

    let input_border_color = if view.conversation.is_pending() {
        Color::DarkGray
    } else {
        Color::Yellow
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color))
        .title(" Message ");

    // Calculate visible portion of input with horizontal scrolling
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = view.input.cursor();
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };
    let visible_text: String = view
        .input
        .value()
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    // Cyan text matches the "You:" style
    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, input_area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
}
