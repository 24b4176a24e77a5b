use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen, View};
use crate::form::{FieldInput, TextField};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key)?,
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.poll().await;
            app.tick_animation();
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys that work on every screen
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    match app.screen {
        Screen::Home => handle_home(app, key),
        _ => handle_workflow(app, key)?,
    }
    Ok(())
}

fn handle_home(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.home_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.home_nav_up(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.enter_selected(),
        _ => {}
    }
}

fn handle_workflow(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('x') => {
                if app.cancel() {
                    app.status = Some("Request cancelled".to_string());
                }
            }
            KeyCode::Char('y') => {
                app.status = Some(match app.result_text() {
                    Some(text) if copy_to_clipboard(&text) => "Copied to clipboard".to_string(),
                    Some(_) => "No clipboard command available".to_string(),
                    None => "Nothing to copy yet".to_string(),
                });
            }
            KeyCode::Char('s') if app.screen == Screen::Logo => {
                app.status = Some(save_logo_status(app, std::env::current_dir()));
            }
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Esc => {
            app.go_home();
            return Ok(());
        }
        KeyCode::Enter => {
            app.submit();
            return Ok(());
        }
        _ => {}
    }

    match app.view.as_mut() {
        Some(View::Generate(view)) => match key.code {
            KeyCode::Tab => view.form.focus_next(),
            KeyCode::BackTab => view.form.focus_prev(),
            _ => {
                if let Some(field) = view.form.focused_mut() {
                    match &mut field.input {
                        FieldInput::Text(text) => edit_text(text, key),
                        FieldInput::Choice(choice) => match key.code {
                            KeyCode::Left => choice.prev(),
                            KeyCode::Right | KeyCode::Char(' ') => choice.next(),
                            _ => {}
                        },
                    }
                }
            }
        },
        Some(View::Chat(view)) => match key.code {
            KeyCode::Up => view.scroll = view.scroll.saturating_sub(1),
            KeyCode::Down => view.scroll = view.scroll.saturating_add(1),
            KeyCode::PageUp => view.scroll = view.scroll.saturating_sub(view.height / 2),
            KeyCode::PageDown => view.scroll = view.scroll.saturating_add(view.height / 2),
            _ => edit_text(&mut view.input, key),
        },
        None => {}
    }
    Ok(())
}

fn edit_text(field: &mut TextField, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        KeyCode::Char(c) => field.insert(c),
        _ => {}
    }
}

/// Status line for Ctrl-S. Export failures, including an unreadable working
/// directory, are reported on screen rather than ending the session.
fn save_logo_status(app: &App, dir: std::io::Result<PathBuf>) -> String {
    let saved = dir
        .context("Failed to read the working directory")
        .and_then(|dir| app.save_logo(&dir));
    match saved {
        Ok(Some(path)) => format!("Saved {}", path.display()),
        Ok(None) => "No logo to save yet".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "logo export failed");
            format!("Save failed: {e}")
        }
    }
}

/// Pipe `text` into the first clipboard command that accepts it.
fn copy_to_clipboard(text: &str) -> bool {
    const COMMANDS: &[(&str, &[&str])] = &[
        ("pbcopy", &[]),
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
    ];

    COMMANDS
        .iter()
        .any(|(program, args)| pipe_to(program, args, text))
}

/// Run `program`, write `text` to its stdin, and report whether the whole
/// text was written and the program exited successfully.
fn pipe_to(program: &str, args: &[&str], text: &str) -> bool {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let Ok(mut child) = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    else {
        return false;
    };

    // Dropping stdin closes the pipe so the program sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()).is_ok(),
        None => false,
    };
    match child.wait() {
        Ok(status) => written && status.success(),
        Err(e) => {
            tracing::debug!(program, error = %e, "clipboard command did not finish");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creovate_core::{CreovateClient, RequestState, Workflow};
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app() -> App {
        let client = CreovateClient::new("http://127.0.0.1:9/api").unwrap();
        App::new(client, Duration::from_secs(5))
    }

    fn generate_view(app: &App) -> &crate::app::GenerateView {
        match &app.view {
            Some(View::Generate(view)) => view,
            _ => panic!("expected generate view"),
        }
    }

    #[tokio::test]
    async fn home_enter_opens_selected_workflow() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Char('j'))).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.screen, Screen::Content);

        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.screen, Screen::Home);
        assert!(app.view.is_none());
    }

    #[tokio::test]
    async fn typing_fills_focused_field_and_arrows_cycle_options() {
        let mut app = app();
        app.enter(Workflow::Brand);
        for c in "Perfume".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        handle_key(&mut app, key(KeyCode::Right)).unwrap();

        let view = generate_view(&app);
        assert_eq!(view.form.value("Industry"), "Perfume");
        assert_eq!(view.form.value("Tone"), "Modern");
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_any_screen() {
        let mut app = app();
        app.enter(Workflow::Chat);
        handle_key(&mut app, ctrl('c')).unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn ctrl_x_cancels_pending_request() {
        let mut app = app();
        app.enter(Workflow::Sentiment);
        for c in "Lovely".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.is_pending());

        handle_key(&mut app, ctrl('x')).unwrap();
        assert_eq!(generate_view(&app).controller.state(), &RequestState::Cancelled);
        assert_eq!(app.status.as_deref(), Some("Request cancelled"));
    }

    #[tokio::test]
    async fn chat_enter_sends_and_clears_input() {
        let mut app = app();
        app.enter(Workflow::Chat);
        for c in "Hello".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        let Some(View::Chat(view)) = &app.view else {
            panic!("expected chat view");
        };
        assert_eq!(view.input.value(), "");
        assert_eq!(view.conversation.transcript().len(), 2);
        assert!(view.conversation.is_pending());
    }

    #[tokio::test]
    async fn unreadable_working_directory_is_reported_not_fatal() {
        let mut app = app();
        app.enter(Workflow::Logo);
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let status = save_logo_status(&app, Err(missing));
        assert!(status.starts_with("Save failed: Failed to read the working directory"));
    }

    #[test]
    fn clipboard_pipe_requires_successful_exit() {
        assert!(pipe_to("sh", &["-c", "cat >/dev/null"], "logo"));
        assert!(!pipe_to("sh", &["-c", "exit 1"], "logo"));
        assert!(!pipe_to("creovate-no-such-clipboard", &[], "logo"));
    }
}
