//! NeuroSearch TUI - Terminal interface for NeuroSearch
//!
//! A full-screen conversational search client. The session, the pending gate
//! and the dispatcher live in `neurosearch-core`; this crate only renders.
//!
//! # Architecture
//!
//! - **Compositor**: Layered rendering (header, conversation, input, status)
//! - **Display**: Pure transcript-to-lines layout
//! - **SearchClient**: Thin wrapper around the core dispatcher
//! - **Theme**: Colors and line styles

pub mod app;
pub mod compositor;
pub mod display;
pub mod search_client;
pub mod theme;

pub use app::App;
pub use search_client::SearchClient;
