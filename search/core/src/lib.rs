//! NeuroSearch Core - Headless Conversational Search Session
//!
//! This crate holds everything a NeuroSearch client needs except the screen:
//! the transcript, the pending gate, progressive disclosure of results and the
//! dispatcher that talks to the search backend. A terminal UI, a test harness
//! or any other surface drives it the same way.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                            │
//! │   ┌──────────┐        ┌──────────────────────────────────┐    │
//! │   │   TUI    │        │   Headless / integration tests   │    │
//! │   │(ratatui) │        │                                  │    │
//! │   └────┬─────┘        └────────────────┬─────────────────┘    │
//! │        └──────────────┬────────────────┘                      │
//! │              submit / poll / reveal_more                      │
//! └───────────────────────┼───────────────────────────────────────┘
//!                         │
//! ┌───────────────────────┼───────────────────────────────────────┐
//! │                  NEUROSEARCH CORE                              │
//! │  ┌────────────────────┴───────────────────────────────────┐   │
//! │  │                    Dispatcher                           │   │
//! │  │  ┌───────────┐  ┌────────────┐  ┌───────────────────┐  │   │
//! │  │  │  Session  │  │ transition │  │  SearchEndpoint   │  │   │
//! │  │  │ (state)   │  │  (pure)    │  │  (HTTP / mock)    │  │   │
//! │  │  └───────────┘  └────────────┘  └───────────────────┘  │   │
//! │  └────────────────────────────────────────────────────────┘   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Dispatcher`]: owns the session and runs searches against an endpoint
//! - [`Session`]: transcript, pending flag, disclosure cursor and draft
//! - [`Turn`] / [`Document`]: transcript entries and search hits
//! - [`transition()`] / [`apply()`]: the state machine behind every session change
//! - [`SearchEndpoint`]: the backend contract; [`HttpSearchEndpoint`] is the real one
//!
//! # Quick Start
//!
//! ```ignore
//! use neurosearch_core::{load_config, Dispatcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let mut dispatcher = Dispatcher::from_config(&config)?;
//!
//!     dispatcher.submit_and_settle("how do owls see at night").await;
//!
//!     for turn in dispatcher.session().transcript() {
//!         println!("{}: {}", turn.role, turn.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! An interactive surface calls [`Dispatcher::submit`] on Enter and
//! [`Dispatcher::poll`] once per frame instead of awaiting.
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod disclosure;
pub mod dispatcher;
pub mod endpoint;
pub mod events;
pub mod session;
pub mod transition;
pub mod turn;

// Re-exports for convenience
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env, ConfigError,
    ConfigOverrides, ConfigSource, EndpointSettings, SearchConfig, SearchToml,
};
pub use disclosure::{DisclosureCursor, DisclosurePolicy, DISCLOSURE_STEP, INITIAL_DISCLOSURE};
pub use dispatcher::{Dispatcher, SubmitOutcome};
pub use endpoint::{
    EndpointError, HttpSearchEndpoint, SearchEndpoint, SearchRequest, SearchResponse,
};
pub use events::SessionEvent;
pub use session::Session;
pub use transition::{apply, transition, Effect, TransitionError, TransitionResult};
pub use turn::{Document, Role, Turn, FAILURE_CONTENT, FOUND_CONTENT, NO_RESULTS_CONTENT};
