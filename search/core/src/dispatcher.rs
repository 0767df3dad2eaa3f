//! Query Dispatcher
//!
//! Turns a submitted query into exactly one round trip against the search
//! endpoint and folds the outcome back into the session.
//!
//! # Lifecycle
//!
//! ```text
//!   submit("cats")                         poll() / settle()
//!        │                                        │
//!        ▼                                        ▼
//!  ┌───────────┐  user turn, draft cleared  ┌───────────┐  system turn
//!  │   idle    │ ─────────────────────────▶ │  pending  │ ─────────────▶ idle
//!  └───────────┘  spawn search task         └───────────┘  pending=false
//! ```
//!
//! Phase 1 runs synchronously inside [`Dispatcher::submit`]. Phase 2 runs on a
//! spawned tokio task that reports back over a oneshot channel; the surface
//! picks the result up with [`Dispatcher::poll`] each frame, or a headless
//! caller awaits it with [`Dispatcher::settle`].
//!
//! The pending flag is the only gate: a submit while pending is ignored, so at
//! most one request is ever outstanding. Every path out of `pending` appends a
//! system turn, including a search task that dies without reporting.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::oneshot;

use crate::config::SearchConfig;
use crate::disclosure::DisclosurePolicy;
use crate::endpoint::{
    EndpointError, HttpSearchEndpoint, SearchEndpoint, SearchRequest, SearchResponse,
};
use crate::events::SessionEvent;
use crate::session::Session;
use crate::transition::{apply, Effect, TransitionError};

type SearchOutcome = Result<SearchResponse, EndpointError>;

/// What a call to [`Dispatcher::submit`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A user turn was appended and the search was started
    Dispatched,
    /// The query was blank; nothing changed
    IgnoredBlank,
    /// A search was already in flight; nothing changed
    IgnoredBusy,
}

impl SubmitOutcome {
    /// Whether a search was started
    #[must_use]
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched)
    }
}

/// A search that has been sent but not yet folded
struct InFlight {
    rx: oneshot::Receiver<SearchOutcome>,
    started: Instant,
}

/// Owns a session and drives searches against an endpoint
pub struct Dispatcher<E: SearchEndpoint> {
    /// Search backend
    endpoint: Arc<E>,
    /// The session; only this struct mutates it
    session: Session,
    /// The outstanding search, if any
    in_flight: Option<InFlight>,
}

impl<E: SearchEndpoint + 'static> Dispatcher<E> {
    /// Create a dispatcher with a fresh session
    pub fn new(endpoint: E, policy: DisclosurePolicy) -> Self {
        Self::with_shared_endpoint(Arc::new(endpoint), policy)
    }

    /// Create a dispatcher around an endpoint that is shared elsewhere
    pub fn with_shared_endpoint(endpoint: Arc<E>, policy: DisclosurePolicy) -> Self {
        tracing::debug!(endpoint = endpoint.name(), policy = %policy, "Creating dispatcher");
        Self {
            endpoint,
            session: Session::with_policy(policy),
            in_flight: None,
        }
    }

    /// Read-only view of the session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a search is outstanding
    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    /// The endpoint searches are sent to
    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Submit a query
    ///
    /// Blank queries and submissions while a search is outstanding are
    /// ignored. Otherwise the user turn is appended, the draft is cleared and
    /// the search is spawned before this returns.
    ///
    /// The search runs on the current tokio runtime. Called outside one, the
    /// search cannot start and is folded straight away as a failed search.
    pub fn submit(&mut self, query: &str) -> SubmitOutcome {
        match apply(&mut self.session, SessionEvent::submitted(query)) {
            Ok(effects) => {
                for effect in effects {
                    self.run_effect(effect);
                }
                SubmitOutcome::Dispatched
            }
            Err(TransitionError::BlankQuery) => {
                tracing::trace!("Ignoring blank query");
                SubmitOutcome::IgnoredBlank
            }
            Err(TransitionError::Busy | TransitionError::NotPending) => {
                tracing::debug!("Ignoring submit while a search is in flight");
                SubmitOutcome::IgnoredBusy
            }
        }
    }

    /// Submit whatever is in the draft
    pub fn submit_draft(&mut self) -> SubmitOutcome {
        let query = self.session.draft().to_string();
        self.submit(&query)
    }

    /// Submit a query and wait for its outcome to be folded
    pub async fn submit_and_settle(&mut self, query: &str) -> SubmitOutcome {
        let outcome = self.submit(query);
        if outcome.is_dispatched() {
            self.settle().await;
        }
        outcome
    }

    /// Fold a finished search into the session, if one has finished
    ///
    /// Never blocks. Returns true if the session changed.
    pub fn poll(&mut self) -> bool {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return false;
        };

        let outcome = match in_flight.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => None,
        };

        if let Some(in_flight) = self.in_flight.take() {
            self.fold(outcome, in_flight.started);
        }
        true
    }

    /// Wait for the outstanding search (if any) and fold it
    ///
    /// Returns true if a search was folded.
    pub async fn settle(&mut self) -> bool {
        let Some(in_flight) = self.in_flight.take() else {
            return false;
        };
        let outcome = in_flight.rx.await.ok();
        self.fold(outcome, in_flight.started);
        true
    }

    /// Reveal one more step of documents (session-wide)
    ///
    /// Only the [`DisclosurePolicy::Shared`] cursor moves. Under
    /// [`DisclosurePolicy::PerTurn`] nothing becomes visible; use
    /// [`Dispatcher::reveal_more_for`] there.
    pub fn reveal_more(&mut self) {
        self.session.reveal_more();
        tracing::debug!(count = self.session.disclosure_count(), "Revealed more documents");
    }

    /// Reveal one more step of documents for a turn
    pub fn reveal_more_for(&mut self, turn_index: usize) {
        self.session.reveal_more_for(turn_index);
        tracing::debug!(
            turn = turn_index,
            count = self.session.disclosure_for(turn_index),
            "Revealed more documents"
        );
    }

    /// Replace the draft
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.session.set_draft(text);
    }

    /// Append a character to the draft
    pub fn push_draft(&mut self, c: char) {
        self.session.push_draft(c);
    }

    /// Remove the last character of the draft
    pub fn pop_draft(&mut self) -> Option<char> {
        self.session.pop_draft()
    }

    /// Execute a transition effect
    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::DispatchSearch { query } => {
                let started = Instant::now();
                let runtime = match tokio::runtime::Handle::try_current() {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        let error = EndpointError::Runtime(e.to_string());
                        self.fold(Some(Err(error)), started);
                        return;
                    }
                };

                let endpoint = Arc::clone(&self.endpoint);
                let (tx, rx) = oneshot::channel();

                tracing::info!(
                    endpoint = endpoint.name(),
                    query_len = query.len(),
                    "Dispatching search"
                );

                runtime.spawn(async move {
                    let request = SearchRequest::new(query);
                    let outcome = endpoint.search(&request).await;
                    // Receiver gone means the dispatcher was dropped
                    let _ = tx.send(outcome);
                });

                self.in_flight = Some(InFlight { rx, started });
            }
        }
    }

    /// Turn a settled search into the closing event and apply it
    ///
    /// `None` means the search task ended without reporting.
    fn fold(&mut self, outcome: Option<SearchOutcome>, started: Instant) {
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let event = match outcome {
            Some(Ok(response)) => {
                let results = response.into_results();
                tracing::info!(results = results.len(), elapsed_ms, "Search completed");
                SessionEvent::EndpointSucceeded { results }
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, elapsed_ms, "Search failed");
                SessionEvent::EndpointFailed {
                    reason: e.to_string(),
                }
            }
            None => {
                tracing::warn!(elapsed_ms, "Search task ended without a result");
                SessionEvent::EndpointFailed {
                    reason: "search task ended without a result".to_string(),
                }
            }
        };

        if let Err(e) = apply(&mut self.session, event) {
            tracing::error!(error = %e, "Could not fold search outcome");
        }
    }
}

impl Dispatcher<HttpSearchEndpoint> {
    /// Create a dispatcher for the HTTP backend described by a loaded config
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::Config`] if the configured base URL is unusable.
    pub fn from_config(config: &SearchConfig) -> Result<Self, EndpointError> {
        let endpoint = HttpSearchEndpoint::from_settings(&config.endpoint)?;
        Ok(Self::new(endpoint, config.disclosure_policy))
    }
}
