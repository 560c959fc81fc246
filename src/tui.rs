//! Terminal front end
//!
//! Draws the controller's transcript and input widgets with ratatui and
//! feeds crossterm key presses back into it. Completed exchanges are picked
//! up on every tick of the loop, so the UI never blocks on the network.

use crate::assistant::AssistantService;
use crate::runtime::{Controller, Focus, Key};
use crate::state_machine::{LineKind, Picker, PickerEntry, TranscriptLine};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);
const SPINNER: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];
const PLACEHOLDER: &str = "Send a message...";
const HELP: &str = "Press: ctrl+c to quit and Tab to switch focus.";

const ACCENT: Color = Color::Indexed(170);
const DIMMED: Color = Color::Indexed(110);
const USER_COLOR: Color = Color::Indexed(5);
const ASSISTANT_COLOR: Color = Color::Indexed(2);
const DEBUG_COLOR: Color = Color::Rgb(0xFF, 0xCC, 0x00);
const ERROR_COLOR: Color = Color::Indexed(9);

/// Run the interactive session until the user quits
pub async fn run<A>(mut controller: Controller<A>) -> io::Result<()>
where
    A: AssistantService + 'static,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut cleanup = TerminalCleanup { enabled: true };
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut spinner = 0usize;
    loop {
        controller.poll_completions();
        terminal.draw(|frame| render(frame, &mut controller, spinner))?;

        if controller.is_exited() {
            break;
        }

        // Terminal polling blocks; keep it off the runtime's worker threads
        let pending = tokio::task::spawn_blocking(next_event)
            .await
            .map_err(io::Error::other)??;

        match pending {
            Some(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                if let Some(key) = map_key(key) {
                    controller.handle_key(key);
                }
            }
            Some(_) => {}
            None => spinner = spinner.wrapping_add(1),
        }
    }

    terminal.show_cursor()?;
    drop(terminal);
    cleanup.disable();
    Ok(())
}

/// Wait one tick for a terminal event
fn next_event() -> io::Result<Option<TermEvent>> {
    if event::poll(TICK)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Restores the terminal even when the loop bails out with an error
struct TerminalCleanup {
    enabled: bool,
}

impl TerminalCleanup {
    fn disable(&mut self) {
        if !self.enabled {
            return;
        }

        self.enabled = false;
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

impl Drop for TerminalCleanup {
    fn drop(&mut self) {
        self.disable();
    }
}

/// Translate a crossterm key event; `None` for keys the client ignores
pub fn map_key(event: KeyEvent) -> Option<Key> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let key = match event.code {
        KeyCode::Char('c') if ctrl => Key::Quit,
        KeyCode::Char('u') if ctrl => Key::ClearLine,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Tab => Key::Tab,
        _ => return None,
    };
    Some(key)
}

// ============================================================================
// Rendering
// ============================================================================

fn render<A>(frame: &mut Frame<'_>, controller: &mut Controller<A>, spinner: usize)
where
    A: AssistantService + 'static,
{
    let input_height = match controller.affordance().picker() {
        // Rows plus title and borders
        Some(picker) => u16::try_from(picker.entry_count())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(frame.area().height / 2),
        None => 3,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(input_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Virtual assistant",
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        chunks[0],
    );
    render_transcript(frame, controller, chunks[1]);
    render_input(frame, controller, chunks[2]);
    render_status(frame, controller, chunks[3], spinner);
    frame.render_widget(
        Paragraph::new(Span::styled(HELP, Style::default().fg(DIMMED))),
        chunks[4],
    );
}

fn render_transcript<A>(frame: &mut Frame<'_>, controller: &mut Controller<A>, area: Rect)
where
    A: AssistantService + 'static,
{
    let focused = controller.focus() == Focus::Transcript;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        });
    let inner = block.inner(area);

    let lines: Vec<Line<'_>> = controller.transcript().iter().map(styled_line).collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Row count from the same word wrapping the paragraph renders with
    let total_rows = paragraph.line_count(inner.width);
    let max_from_bottom = total_rows.saturating_sub(usize::from(inner.height));
    let from_bottom = controller.scroll().from_bottom().min(max_from_bottom);
    let top = max_from_bottom - from_bottom;

    frame.render_widget(
        paragraph
            .block(block)
            .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0)),
        area,
    );
    controller.clamp_scroll(max_from_bottom);
}

fn styled_line(line: &TranscriptLine) -> Line<'_> {
    let label = |text: &'static str, color: Color| {
        Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    };

    match line.kind {
        LineKind::User => Line::from(vec![
            label("User:", USER_COLOR),
            Span::raw(" "),
            Span::raw(line.body.as_str()),
        ]),
        LineKind::Assistant => Line::from(vec![
            label("Astro:", ASSISTANT_COLOR),
            Span::raw(" "),
            Span::raw(line.body.as_str()),
        ]),
        LineKind::Debug => Line::from(Span::styled(
            format!("  {}", line.body),
            Style::default().fg(DEBUG_COLOR),
        )),
        LineKind::Marker => Line::from(Span::styled(
            line.to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )),
        LineKind::OptionItem | LineKind::Command => Line::from(line.to_string()),
    }
}

fn render_input<A>(frame: &mut Frame<'_>, controller: &Controller<A>, area: Rect)
where
    A: AssistantService + 'static,
{
    let focused = controller.focus() == Focus::Input;

    if let Some(picker) = controller.affordance().picker() {
        render_picker(frame, picker, controller.picker_selected(), focused, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        });
    let inner = block.inner(area);

    let input = controller.input();
    let text = if input.is_empty() {
        Line::from(Span::styled(PLACEHOLDER, Style::default().fg(DIMMED)))
    } else {
        Line::from(input.value())
    };
    frame.render_widget(Paragraph::new(text).block(block), area);

    if focused && !controller.is_busy() {
        // Display columns, so wide characters move the cursor by two
        let offset = u16::try_from(Span::raw(input.before_cursor()).width()).unwrap_or(u16::MAX);
        let x = inner
            .x
            .saturating_add(offset)
            .min(inner.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

fn render_picker(frame: &mut Frame<'_>, picker: &Picker, selected: usize, focused: bool, area: Rect) {
    let items: Vec<ListItem<'_>> = picker
        .entries()
        .enumerate()
        .map(|(i, entry)| ListItem::new(picker_row(i, entry)))
        .collect();

    let highlight = if focused { ACCENT } else { DIMMED };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(picker.title()),
        )
        .highlight_symbol("> ")
        .highlight_style(Style::default().fg(highlight));

    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// `1. Label[id]`, numbered for the 1-9 shortcuts
fn picker_row(index: usize, entry: PickerEntry<'_>) -> String {
    let number = index + 1;
    match entry {
        PickerEntry::Option(option) => match &option.id {
            Some(id) => format!("{number}. {}[{id}]", option.label),
            None => format!("{number}. {}", option.label),
        },
        PickerEntry::Escape => format!("{number}. {}", crate::state_machine::ESCAPE_LABEL),
    }
}

fn render_status<A>(frame: &mut Frame<'_>, controller: &Controller<A>, area: Rect, spinner: usize)
where
    A: AssistantService + 'static,
{
    let line = if controller.is_busy() {
        Line::from(format!("{} Loading...", SPINNER[spinner % SPINNER.len()]))
    } else if let Some(error) = controller.error() {
        Line::from(Span::styled(error, Style::default().fg(ERROR_COLOR)))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
}
