//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - `SearchClient` for the session and searches
//! - Compositor layers for rendering
//!
//! Every frame the app polls the client, so a finished search lands in the
//! transcript without the core ever calling back into the UI.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::Terminal;

use crate::compositor::{Compositor, LayerId};
use crate::display::{self, transcript_lines, DisplayLine, USER_PREFIX};
use crate::search_client::SearchClient;
use crate::theme::{self, DIM_GRAY, FADE_GRAY, NEURO_TEAL, THINKING_VIOLET, USER_GREEN};

/// Product name shown in the header
const PRODUCT_NAME: &str = "NeuroSearch";

/// Input box height (separator + text lines)
const INPUT_HEIGHT: u16 = 3;

/// Header height
const HEADER_HEIGHT: u16 = 1;

/// Lines scrolled per mouse wheel notch
const WHEEL_STEP: usize = 3;

/// Whether a key types into the draft
///
/// Control and Alt chords are commands, not text.
fn is_text_input(key: &event::KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_))
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Search Integration ===
    /// Client wrapping the embedded dispatcher
    client: SearchClient,
    /// Where searches go, for the header
    endpoint_label: String,

    // === UI Components ===
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,

    // === View State ===
    /// Scroll offset (lines from bottom, 0 = latest)
    scroll_offset: usize,
    /// Total rendered lines (for scroll bounds)
    total_lines: usize,
    /// Transcript length at the last frame
    seen_turns: usize,
    /// Turn the show-more key acts on
    focus: Option<usize>,
    /// Typing indicator animation frame
    typing_frame: usize,
    /// When the typing frame last advanced
    last_typing_tick: Instant,
    /// Terminal size
    size: (u16, u16),
}

/// Layer IDs for UI regions
struct AppLayers {
    header: LayerId,
    conversation: LayerId,
    input: LayerId,
    status: LayerId,
}

/// Screen regions for a terminal size
fn layout(width: u16, height: u16) -> [Rect; 4] {
    let bottom = INPUT_HEIGHT + 1;
    let conversation_height = height.saturating_sub(HEADER_HEIGHT + bottom);
    [
        Rect::new(0, 0, width, HEADER_HEIGHT),
        Rect::new(0, HEADER_HEIGHT, width, conversation_height),
        Rect::new(0, height.saturating_sub(bottom), width, INPUT_HEIGHT),
        Rect::new(0, height.saturating_sub(1), width, 1),
    ]
}

impl App {
    /// Create a new App around a ready search client
    pub fn new(client: SearchClient, endpoint_label: impl Into<String>) -> anyhow::Result<Self> {
        let size = crossterm::terminal::size()?;
        let mut compositor = Compositor::new(Rect::new(0, 0, size.0, size.1));

        let [header, conversation, input, status] = layout(size.0, size.1);
        let layers = AppLayers {
            header: compositor.create_layer(header, 10),
            conversation: compositor.create_layer(conversation, 0),
            input: compositor.create_layer(input, 10),
            status: compositor.create_layer(status, 10),
        };

        Ok(Self {
            running: true,
            client,
            endpoint_label: endpoint_label.into(),
            compositor,
            layers,
            scroll_offset: 0,
            total_lines: 0,
            seen_turns: 0,
            focus: None,
            typing_frame: 0,
            last_typing_tick: Instant::now(),
            size,
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // ~20 FPS is plenty for text and a typing indicator
        let frame_duration = Duration::from_millis(50);
        let mut event_stream = EventStream::new();

        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(Event::Mouse(mouse))) => self.handle_mouse(mouse),
                        Some(Ok(Event::Resize(w, h))) => self.handle_resize(w, h),
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                        _ => {}
                    }
                }

                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            self.client.poll();
            self.update();
            self.render(terminal)?;

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: event::KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if ctrl => self.running = false,

            // Submit
            KeyCode::Enter => {
                let outcome = self.client.submit();
                tracing::debug!(?outcome, "Enter pressed");
            }

            // Progressive disclosure
            KeyCode::Tab => {
                self.focus = self.client.show_more(self.focus);
            }
            KeyCode::Up if ctrl => {
                self.focus = display::step_focus(self.client.session(), self.focus, true);
            }
            KeyCode::Down if ctrl => {
                self.focus = display::step_focus(self.client.session(), self.focus, false);
            }

            // Typing (dropped while a search is pending)
            KeyCode::Char(c) if is_text_input(&key) => {
                self.client.type_char(c);
            }
            KeyCode::Backspace => {
                self.client.backspace();
            }

            // Conversation scrolling
            KeyCode::PageUp => {
                let page = self.page_size();
                self.scroll_offset =
                    (self.scroll_offset + page).min(self.total_lines.saturating_sub(1));
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(self.page_size());
            }
            KeyCode::Home if ctrl => {
                self.scroll_offset = self.total_lines.saturating_sub(1);
            }
            KeyCode::End if ctrl => {
                self.scroll_offset = 0;
            }

            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                if self.scroll_offset < self.total_lines.saturating_sub(1) {
                    self.scroll_offset += WHEEL_STEP;
                }
            }
            MouseEventKind::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(WHEEL_STEP);
            }
            _ => {}
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.compositor.resize(Rect::new(0, 0, width, height));

        let [header, conversation, input, status] = layout(width, height);
        self.compositor.set_bounds(self.layers.header, header);
        self.compositor
            .set_bounds(self.layers.conversation, conversation);
        self.compositor.set_bounds(self.layers.input, input);
        self.compositor.set_bounds(self.layers.status, status);
    }

    /// Half the conversation height
    fn page_size(&self) -> usize {
        (layout(self.size.0, self.size.1)[1].height / 2) as usize
    }

    /// Per-frame view bookkeeping
    fn update(&mut self) {
        // New turns pull the view back to the latest entry
        let turns = self.client.session().len();
        if turns != self.seen_turns {
            self.seen_turns = turns;
            self.scroll_offset = 0;
        }

        if self.client.input_disabled() {
            if self.last_typing_tick.elapsed() >= Duration::from_millis(400) {
                self.typing_frame = self.typing_frame.wrapping_add(1);
                self.last_typing_tick = Instant::now();
            }
        } else {
            self.typing_frame = 0;
        }

        self.focus = display::resolve_focus(self.client.session(), self.focus);
    }

    /// Render the UI
    fn render(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        self.render_header();
        self.render_conversation();
        self.render_input();
        self.render_status();

        terminal.draw(|frame| {
            let output = self.compositor.composite();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    if let (Some(src), Some(dst)) = (output.cell((x, y)), buf.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    /// Render header layer
    fn render_header(&mut self) {
        let label = format!(" {PRODUCT_NAME}  ·  {}", self.endpoint_label);
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.header) {
            buf.reset();
            let area = buf.area;
            buf.set_string(
                area.x,
                area.y,
                &label,
                Style::default().fg(NEURO_TEAL).add_modifier(Modifier::BOLD),
            );
        }
    }

    /// Render conversation layer
    fn render_conversation(&mut self) {
        let width = self.size.0.saturating_sub(2) as usize;
        let height = layout(self.size.0, self.size.1)[1].height as usize;

        if width < 10 || height < 3 {
            return;
        }

        let all_lines: Vec<DisplayLine> =
            transcript_lines(self.client.session(), width, self.focus, self.typing_frame);
        self.total_lines = all_lines.len();

        // Clamp scroll offset
        let max_scroll = self.total_lines.saturating_sub(height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let visible_end = self.total_lines.saturating_sub(self.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);

        let has_content_above = visible_start > 0;
        let has_content_below = self.scroll_offset > 0;

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.conversation) {
            buf.reset();
            let area = buf.area;

            for (i, line) in all_lines[visible_start..visible_end].iter().enumerate() {
                let y = i as u16;
                if y >= area.height {
                    break;
                }

                // Fade the edge row when there is more to scroll to
                let faded = (has_content_above && i == 0)
                    || (has_content_below && i + 1 == height);
                let style = if faded {
                    Style::default().fg(FADE_GRAY)
                } else {
                    theme::line_style(line.kind)
                };

                buf.set_string(area.x + 1, y, &line.text, style);
            }
        }
    }

    /// Render input layer
    fn render_input(&mut self) {
        let disabled = self.client.input_disabled();
        let draft = self.client.session().draft().to_string();

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.input) {
            buf.reset();
            let area = buf.area;

            let separator = "─".repeat(area.width as usize);
            buf.set_string(area.x, area.y, &separator, Style::default().fg(DIM_GRAY));

            let text_height = area.height.saturating_sub(1) as usize;
            let text_width = area.width.saturating_sub(1) as usize;
            if text_width < 5 || text_height < 1 {
                return;
            }

            let (full_input, style) = if disabled {
                (
                    format!("{USER_PREFIX}{draft}"),
                    Style::default().fg(DIM_GRAY),
                )
            } else {
                (
                    format!("{USER_PREFIX}{draft}_"),
                    Style::default().fg(USER_GREEN),
                )
            };

            let wrapped: Vec<String> = textwrap::wrap(&full_input, text_width)
                .into_iter()
                .map(|s| s.into_owned())
                .collect();
            let skip = wrapped.len().saturating_sub(text_height);

            for (i, line) in wrapped.iter().skip(skip).enumerate() {
                let y = area.y + 1 + i as u16;
                if y < area.y + area.height {
                    buf.set_string(area.x, y, line, style);
                }
            }
        }
    }

    /// Render status bar
    fn render_status(&mut self) {
        let pending = self.client.input_disabled();
        let scroll_offset = self.scroll_offset;
        let expandable = self.client.session().expandable_turns().count();

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) {
            buf.reset();
            let area = buf.area;

            let (state, state_style) = if pending {
                ("Searching", Style::default().fg(THINKING_VIOLET))
            } else {
                ("Ready", Style::default().fg(DIM_GRAY))
            };

            let more_hint = if expandable > 1 {
                " | Ctrl+Up/Down pick results"
            } else {
                ""
            };
            let scroll_info = if scroll_offset > 0 {
                format!(" [^{scroll_offset} lines - PgDn to scroll]")
            } else {
                String::new()
            };

            let status = format!(
                " {state} | Enter search | Tab show more{more_hint} | Esc quit{scroll_info}"
            );
            buf.set_string(area.x, area.y, &status, state_style);
        }
    }
}
