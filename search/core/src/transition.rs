//! Pure state transition function
//!
//! A search exchange is a two-phase commit against one session:
//!
//! 1. `Submitted`: append the user turn, clear the draft, raise `pending`,
//!    and ask the caller to dispatch exactly one search.
//! 2. `EndpointSucceeded` / `EndpointFailed`: append exactly one system turn
//!    and lower `pending`.
//!
//! [`transition`] and [`apply`] perform no I/O. The caller executes the
//! returned [`Effect`]s and feeds the outcome back in as the next event.
//! [`apply`] edits the session in place, so an owner of a long transcript
//! does not copy it on every event.

use thiserror::Error;

use crate::events::SessionEvent;
use crate::session::Session;
use crate::turn::Turn;

/// Side effects requested by a transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Issue one request to the search endpoint
    DispatchSearch {
        /// Query payload, untrimmed
        query: String,
    },
}

/// Result of a successful transition
#[derive(Debug)]
pub struct TransitionResult {
    /// The session after the event was applied
    pub session: Session,
    /// Work the caller must perform
    pub effects: Vec<Effect>,
}

/// Events that cannot be applied in the current state
///
/// A rejected event leaves the session untouched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The query is empty after trimming whitespace
    #[error("Query is blank")]
    BlankQuery,
    /// A search is already outstanding
    #[error("A search is already in progress")]
    Busy,
    /// An endpoint outcome arrived with no search outstanding
    #[error("No search is in progress")]
    NotPending,
}

/// Apply an event to a copy of a session
///
/// The input is left untouched; the next session comes back in the result.
///
/// # Errors
///
/// Returns [`TransitionError`] when the event is not valid in the current
/// state. See the variants for the cases.
pub fn transition(
    session: &Session,
    event: SessionEvent,
) -> Result<TransitionResult, TransitionError> {
    // Reject before cloning
    check(session, &event)?;
    let mut next = session.clone();
    let effects = apply(&mut next, event)?;
    Ok(TransitionResult {
        session: next,
        effects,
    })
}

/// Apply an event to a session in place
///
/// Same rules as [`transition`]. The event is checked before anything is
/// written, so a rejected event leaves `session` as it was.
///
/// # Errors
///
/// Returns [`TransitionError`] when the event is not valid in the current
/// state.
pub fn apply(session: &mut Session, event: SessionEvent) -> Result<Vec<Effect>, TransitionError> {
    check(session, &event)?;

    match event {
        SessionEvent::Submitted { query } => {
            session.append_turn(Turn::user(query.clone()));
            session.clear_draft();
            session.set_pending(true);
            Ok(vec![Effect::DispatchSearch { query }])
        }

        SessionEvent::EndpointSucceeded { results } => {
            settle(session, Turn::search_results(results));
            Ok(Vec::new())
        }

        SessionEvent::EndpointFailed { reason } => {
            tracing::debug!(reason = %reason, "Folding endpoint failure");
            settle(session, Turn::search_failed());
            Ok(Vec::new())
        }
    }
}

/// Whether an event is valid in the session's current state
fn check(session: &Session, event: &SessionEvent) -> Result<(), TransitionError> {
    match event {
        SessionEvent::Submitted { query } => {
            if query.trim().is_empty() {
                return Err(TransitionError::BlankQuery);
            }
            if session.is_pending() {
                return Err(TransitionError::Busy);
            }
        }
        SessionEvent::EndpointSucceeded { .. } | SessionEvent::EndpointFailed { .. } => {
            if !session.is_pending() {
                return Err(TransitionError::NotPending);
            }
        }
    }
    Ok(())
}

/// Append the outcome turn and lower the pending flag
fn settle(session: &mut Session, outcome: Turn) {
    session.append_turn(outcome);
    session.set_pending(false);
}
