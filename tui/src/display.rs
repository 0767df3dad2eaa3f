//! Display Lines
//!
//! Turns a read-only [`Session`] into the wrapped, styled lines the
//! conversation layer paints. Nothing here touches the terminal, so the
//! transcript layout is tested without one.
//!
//! # Layout
//!
//! ```text
//! You: cats
//!
//! Here's what I found:
//!   1. Cat Facts
//!      Type: article
//!      https://x
//!   [Tab] Show more (7 hidden)
//!
//! Searching...
//! ```

use neurosearch_core::{Document, Role, Session, Turn};
use unicode_width::UnicodeWidthStr;

/// Prefix for user turns
pub const USER_PREFIX: &str = "You: ";

/// Indent of a document's first line
const DOC_INDENT: &str = "  ";

/// Indent of a document's detail lines
const DOC_DETAIL_INDENT: &str = "     ";

/// What a line shows; drives its style
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// User turn text
    User,
    /// System turn text
    System,
    /// Document title
    DocTitle,
    /// `Type: ...` line
    DocMeta,
    /// Document link
    DocUrl,
    /// Show-more affordance
    ShowMore {
        /// Whether Tab would act on this turn
        focused: bool,
    },
    /// Typing indicator while a search is pending
    Typing,
    /// Spacer between turns
    Blank,
}

/// One rendered line of the conversation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayLine {
    /// Text, already wrapped to the target width
    pub text: String,
    /// Kind, for styling
    pub kind: LineKind,
}

impl DisplayLine {
    fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), LineKind::Blank)
    }
}

/// Typing indicator text for an animation frame
#[must_use]
pub fn typing_indicator(frame: usize) -> String {
    format!("Searching{}", ".".repeat(frame % 3 + 1))
}

/// Build the conversation lines for a session
///
/// `focus` is the turn the show-more key acts on; `frame` animates the
/// typing indicator.
#[must_use]
pub fn transcript_lines(
    session: &Session,
    width: usize,
    focus: Option<usize>,
    frame: usize,
) -> Vec<DisplayLine> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for (index, turn) in session.transcript().iter().enumerate() {
        push_turn(&mut lines, session, index, turn, width, focus);
        lines.push(DisplayLine::blank());
    }

    if session.is_pending() {
        lines.push(DisplayLine::new(typing_indicator(frame), LineKind::Typing));
    }

    lines
}

fn push_turn(
    lines: &mut Vec<DisplayLine>,
    session: &Session,
    index: usize,
    turn: &Turn,
    width: usize,
    focus: Option<usize>,
) {
    match turn.role {
        Role::User => {
            let text = format!("{USER_PREFIX}{}", turn.content);
            push_wrapped(lines, &text, width, "", "", LineKind::User);
        }
        Role::System => {
            push_wrapped(lines, &turn.content, width, "", "", LineKind::System);
        }
    }

    for (n, doc) in session.visible_documents(index).iter().enumerate() {
        push_document(lines, n + 1, doc, width);
    }

    let hidden = session.hidden_documents(index);
    if hidden > 0 {
        let text = format!("{DOC_INDENT}[Tab] Show more ({hidden} hidden)");
        lines.push(DisplayLine::new(
            clip(&text, width),
            LineKind::ShowMore {
                focused: focus == Some(index),
            },
        ));
    }
}

fn push_document(lines: &mut Vec<DisplayLine>, number: usize, doc: &Document, width: usize) {
    let title = format!("{number}. {}", doc.title);
    push_wrapped(lines, &title, width, DOC_INDENT, DOC_DETAIL_INDENT, LineKind::DocTitle);

    let meta = format!("{DOC_DETAIL_INDENT}Type: {}", doc.kind);
    lines.push(DisplayLine::new(clip(&meta, width), LineKind::DocMeta));

    // URLs are clipped rather than wrapped so they stay copyable as one line
    let url = format!("{DOC_DETAIL_INDENT}{}", doc.url);
    lines.push(DisplayLine::new(clip(&url, width), LineKind::DocUrl));
}

fn push_wrapped(
    lines: &mut Vec<DisplayLine>,
    text: &str,
    width: usize,
    initial_indent: &str,
    subsequent_indent: &str,
    kind: LineKind,
) {
    let options = textwrap::Options::new(width)
        .initial_indent(initial_indent)
        .subsequent_indent(subsequent_indent);

    for line in textwrap::wrap(text, options) {
        lines.push(DisplayLine::new(line.into_owned(), kind));
    }
}

/// Truncate to a display width
fn clip(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// Resolve which turn the show-more key acts on
///
/// Keeps `current` while it still has hidden documents, otherwise falls back
/// to the latest expandable turn.
#[must_use]
pub fn resolve_focus(session: &Session, current: Option<usize>) -> Option<usize> {
    match current {
        Some(index) if session.has_more(index) => Some(index),
        _ => session.expandable_turns().last(),
    }
}

/// Move focus to the previous (`up`) or next expandable turn
///
/// Stays put at either end.
#[must_use]
pub fn step_focus(session: &Session, current: Option<usize>, up: bool) -> Option<usize> {
    let expandable: Vec<usize> = session.expandable_turns().collect();
    let current = resolve_focus(session, current)?;
    let pos = expandable.iter().position(|&i| i == current)?;

    let next = if up {
        pos.saturating_sub(1)
    } else {
        (pos + 1).min(expandable.len() - 1)
    };
    Some(expandable[next])
}
