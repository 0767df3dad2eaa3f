//! Session Events
//!
//! Everything that can move a [`Session`](crate::Session) from one state to
//! the next. Surfaces produce `Submitted`; the dispatcher produces the two
//! endpoint outcomes once a request settles.

use crate::turn::Document;

/// Input to [`transition`](crate::transition::transition)
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// The user submitted a query (raw, untrimmed)
    Submitted {
        /// The query exactly as typed
        query: String,
    },

    /// The search endpoint answered with a result list (possibly empty)
    EndpointSucceeded {
        /// Results in the order the endpoint returned them
        results: Vec<Document>,
    },

    /// The search endpoint call failed for any reason
    EndpointFailed {
        /// Diagnostic detail. Logged, never shown in the transcript.
        reason: String,
    },
}

impl SessionEvent {
    /// Convenience constructor for a submission
    pub fn submitted(query: impl Into<String>) -> Self {
        Self::Submitted {
            query: query.into(),
        }
    }

    /// Short name for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "submitted",
            Self::EndpointSucceeded { .. } => "endpoint_succeeded",
            Self::EndpointFailed { .. } => "endpoint_failed",
        }
    }
}
