//! Search Client
//!
//! Thin wrapper around the core [`Dispatcher`] for TUI integration.
//!
//! The TUI holds no search logic of its own. Its job is:
//! 1. Convert key presses into draft edits, submits and show-more requests
//! 2. Poll the dispatcher every frame
//! 3. Render whatever the session says
//!
//! Input is disabled while a search is pending: typing and Enter are
//! dropped here before they reach the session.

use neurosearch_core::{
    DisclosurePolicy, Dispatcher, HttpSearchEndpoint, SearchConfig, SearchEndpoint, Session,
    SubmitOutcome,
};

use crate::display::resolve_focus;

/// Client for the embedded dispatcher
pub struct SearchClient<E: SearchEndpoint + 'static = HttpSearchEndpoint> {
    dispatcher: Dispatcher<E>,
}

impl SearchClient<HttpSearchEndpoint> {
    /// Create a client for the HTTP backend described by `config`
    pub fn from_config(config: &SearchConfig) -> anyhow::Result<Self> {
        let dispatcher = Dispatcher::from_config(config)?;
        tracing::info!(
            url = %dispatcher.endpoint().search_url(),
            policy = %config.disclosure_policy,
            "Search client ready"
        );
        Ok(Self { dispatcher })
    }
}

impl<E: SearchEndpoint + 'static> SearchClient<E> {
    /// Create a client around any endpoint
    pub fn with_endpoint(endpoint: E, policy: DisclosurePolicy) -> Self {
        Self {
            dispatcher: Dispatcher::new(endpoint, policy),
        }
    }

    /// Read-only session view for rendering
    pub fn session(&self) -> &Session {
        self.dispatcher.session()
    }

    /// Whether input is currently disabled
    pub fn input_disabled(&self) -> bool {
        self.dispatcher.is_pending()
    }

    /// Type a character into the draft
    ///
    /// Returns false if input is disabled.
    pub fn type_char(&mut self, c: char) -> bool {
        if self.input_disabled() {
            return false;
        }
        self.dispatcher.push_draft(c);
        true
    }

    /// Delete the last draft character
    pub fn backspace(&mut self) -> bool {
        if self.input_disabled() {
            return false;
        }
        self.dispatcher.pop_draft().is_some()
    }

    /// Submit the draft (Enter)
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.input_disabled() {
            return SubmitOutcome::IgnoredBusy;
        }
        self.dispatcher.submit_draft()
    }

    /// Reveal more documents (Tab)
    ///
    /// With a shared cursor every turn grows together. With a per-turn cursor
    /// only the focused turn grows, or the latest expandable one if nothing
    /// is focused. Returns the turn acted on, if any.
    pub fn show_more(&mut self, focus: Option<usize>) -> Option<usize> {
        let target = resolve_focus(self.session(), focus)?;
        match self.session().disclosure_policy() {
            DisclosurePolicy::Shared => self.dispatcher.reveal_more(),
            DisclosurePolicy::PerTurn => self.dispatcher.reveal_more_for(target),
        }
        Some(target)
    }

    /// Fold a finished search, if any (must be called every frame)
    pub fn poll(&mut self) -> bool {
        self.dispatcher.poll()
    }

    /// Wait for the outstanding search to finish
    pub async fn settle(&mut self) -> bool {
        self.dispatcher.settle().await
    }
}
