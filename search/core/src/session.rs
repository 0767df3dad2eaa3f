//! Session State
//!
//! The mutable aggregate behind one search conversation: the transcript, the
//! in-flight flag, the disclosure cursor and the draft query.
//!
//! # Design Philosophy
//!
//! A session lives exactly as long as the surface that created it. It is never
//! persisted. The methods here are the only way to change it, and each one
//! keeps two invariants:
//!
//! - The transcript is append-only. Turns are never edited or removed, and
//!   their order is the order in which they were appended.
//! - The disclosure count never decreases.
//!
//! Whether a request may be started (at most one outstanding) is decided by
//! [`crate::transition`] before [`Session::set_pending`] is called.

use crate::disclosure::{DisclosureCursor, DisclosurePolicy};
use crate::turn::{Document, Turn};

/// A search conversation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    /// Conversation history, oldest first
    transcript: Vec<Turn>,
    /// Whether a search request is outstanding
    pending: bool,
    /// How many documents each turn reveals
    disclosure: DisclosureCursor,
    /// Text typed but not yet submitted
    draft: String,
}

impl Session {
    /// Create an empty session with the default (shared) disclosure policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with a specific disclosure policy
    #[must_use]
    pub fn with_policy(policy: DisclosurePolicy) -> Self {
        Self {
            disclosure: DisclosureCursor::new(policy),
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append a turn to the end of the transcript
    pub fn append_turn(&mut self, turn: Turn) {
        tracing::trace!(
            role = %turn.role,
            documents = turn.document_count(),
            index = self.transcript.len(),
            "Appending turn"
        );
        self.transcript.push(turn);
    }

    /// Set the in-flight flag
    pub fn set_pending(&mut self, value: bool) {
        if self.pending == value {
            tracing::debug!(pending = value, "Pending flag already set");
        }
        self.pending = value;
    }

    /// Reveal one more step of documents (session-wide)
    ///
    /// Has no visible effect under [`DisclosurePolicy::PerTurn`].
    pub fn reveal_more(&mut self) {
        self.disclosure.reveal_more();
    }

    /// Reveal one more step of documents for a specific turn
    ///
    /// Only differs from [`reveal_more`](Self::reveal_more) under
    /// [`DisclosurePolicy::PerTurn`].
    pub fn reveal_more_for(&mut self, turn_index: usize) {
        self.disclosure.reveal_more_for(turn_index);
    }

    /// Reset the draft to empty
    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// Replace the draft
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Append a character to the draft
    pub fn push_draft(&mut self, c: char) {
        self.draft.push(c);
    }

    /// Remove the last character of the draft
    pub fn pop_draft(&mut self) -> Option<char> {
        self.draft.pop()
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// All turns, oldest first
    #[must_use]
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// A single turn by index
    #[must_use]
    pub fn turn(&self, index: usize) -> Option<&Turn> {
        self.transcript.get(index)
    }

    /// Number of turns
    #[must_use]
    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    /// Whether the transcript is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    /// Whether a search request is outstanding
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The session-wide disclosure count
    #[must_use]
    pub fn disclosure_count(&self) -> usize {
        self.disclosure.count()
    }

    /// The disclosure count that applies to one turn
    #[must_use]
    pub fn disclosure_for(&self, turn_index: usize) -> usize {
        self.disclosure.count_for(turn_index)
    }

    /// The disclosure policy in effect
    #[must_use]
    pub fn disclosure_policy(&self) -> DisclosurePolicy {
        self.disclosure.policy()
    }

    /// The unsubmitted input text
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Documents of a turn that are currently revealed
    ///
    /// Empty for turns without documents and for out-of-range indices.
    #[must_use]
    pub fn visible_documents(&self, turn_index: usize) -> &[Document] {
        match self.turn(turn_index).and_then(|t| t.documents.as_deref()) {
            Some(docs) => self.disclosure.visible(turn_index, docs),
            None => &[],
        }
    }

    /// Number of documents of a turn that are still hidden
    #[must_use]
    pub fn hidden_documents(&self, turn_index: usize) -> usize {
        self.turn(turn_index).map_or(0, |t| {
            self.disclosure.hidden(turn_index, t.document_count())
        })
    }

    /// Whether a turn still has a "show more" affordance
    #[must_use]
    pub fn has_more(&self, turn_index: usize) -> bool {
        self.hidden_documents(turn_index) > 0
    }

    /// Indices of turns that currently have hidden documents, oldest first
    pub fn expandable_turns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.transcript.len()).filter(|&i| self.has_more(i))
    }
}
