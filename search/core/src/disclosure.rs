//! Disclosure Cursor
//!
//! Controls how many documents of a turn are revealed. Every turn starts
//! showing [`INITIAL_DISCLOSURE`] documents and each "show more" request adds
//! [`DISCLOSURE_STEP`].
//!
//! Two policies are supported:
//!
//! - [`DisclosurePolicy::Shared`]: one counter for the whole session. Revealing
//!   more on one turn also enlarges every other turn, including turns that
//!   arrive later. This is the long-standing behavior and the default.
//! - [`DisclosurePolicy::PerTurn`]: each turn keeps its own counter, keyed by
//!   transcript index.
//!
//! The shared counter is monotonic; there is no upper bound. Once a count
//! reaches a turn's document total, that turn simply has nothing hidden.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Documents revealed before any "show more"
pub const INITIAL_DISCLOSURE: usize = 5;

/// Documents added per "show more"
pub const DISCLOSURE_STEP: usize = 5;

/// How the disclosure count is scoped
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisclosurePolicy {
    /// One counter shared by every turn
    #[default]
    Shared,
    /// An independent counter per turn
    PerTurn,
}

impl DisclosurePolicy {
    /// Config/CLI spelling of this policy
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::PerTurn => "per-turn",
        }
    }
}

impl std::fmt::Display for DisclosurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisclosurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "per-turn" | "per_turn" | "perturn" => Ok(Self::PerTurn),
            other => Err(format!(
                "unknown disclosure policy '{other}' (expected 'shared' or 'per-turn')"
            )),
        }
    }
}

/// Disclosure state for a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisclosureCursor {
    policy: DisclosurePolicy,
    /// Session-wide count, advanced by every reveal under `Shared`
    shared: usize,
    /// Per-turn overrides, only populated under `PerTurn`
    per_turn: HashMap<usize, usize>,
}

impl Default for DisclosureCursor {
    fn default() -> Self {
        Self::new(DisclosurePolicy::default())
    }
}

impl DisclosureCursor {
    /// Create a cursor at the initial count
    #[must_use]
    pub fn new(policy: DisclosurePolicy) -> Self {
        Self {
            policy,
            shared: INITIAL_DISCLOSURE,
            per_turn: HashMap::new(),
        }
    }

    /// The active policy
    #[must_use]
    pub fn policy(&self) -> DisclosurePolicy {
        self.policy
    }

    /// The session-wide count
    #[must_use]
    pub fn count(&self) -> usize {
        self.shared
    }

    /// The count that applies to a given turn
    #[must_use]
    pub fn count_for(&self, turn_index: usize) -> usize {
        match self.policy {
            DisclosurePolicy::Shared => self.shared,
            DisclosurePolicy::PerTurn => self
                .per_turn
                .get(&turn_index)
                .copied()
                .unwrap_or(INITIAL_DISCLOSURE),
        }
    }

    /// Advance the session-wide count by one step
    pub fn reveal_more(&mut self) {
        self.shared = self.shared.saturating_add(DISCLOSURE_STEP);
    }

    /// Advance the count for one turn
    ///
    /// Under `Shared` this is the same as [`reveal_more`](Self::reveal_more).
    pub fn reveal_more_for(&mut self, turn_index: usize) {
        match self.policy {
            DisclosurePolicy::Shared => self.reveal_more(),
            DisclosurePolicy::PerTurn => {
                let count = self
                    .per_turn
                    .entry(turn_index)
                    .or_insert(INITIAL_DISCLOSURE);
                *count = count.saturating_add(DISCLOSURE_STEP);
            }
        }
    }

    /// The revealed prefix of a document list
    #[must_use]
    pub fn visible<'a, T>(&self, turn_index: usize, items: &'a [T]) -> &'a [T] {
        let count = self.count_for(turn_index).min(items.len());
        &items[..count]
    }

    /// How many of `total` documents remain hidden for a turn
    #[must_use]
    pub fn hidden(&self, turn_index: usize, total: usize) -> usize {
        total.saturating_sub(self.count_for(turn_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_count() {
        let cursor = DisclosureCursor::default();
        assert_eq!(cursor.policy(), DisclosurePolicy::Shared);
        assert_eq!(cursor.count(), 5);
        assert_eq!(cursor.count_for(42), 5);
    }

    #[test]
    fn test_shared_reveal_applies_everywhere() {
        let mut cursor = DisclosureCursor::new(DisclosurePolicy::Shared);
        cursor.reveal_more_for(1);
        assert_eq!(cursor.count(), 10);
        assert_eq!(cursor.count_for(1), 10);
        assert_eq!(cursor.count_for(7), 10);
    }

    #[test]
    fn test_per_turn_reveal_is_isolated() {
        let mut cursor = DisclosureCursor::new(DisclosurePolicy::PerTurn);
        cursor.reveal_more_for(1);
        cursor.reveal_more_for(1);
        assert_eq!(cursor.count_for(1), 15);
        assert_eq!(cursor.count_for(3), 5);
        // The session-wide count only moves on an explicit reveal_more()
        assert_eq!(cursor.count(), 5);
    }

    #[test]
    fn test_visible_and_hidden() {
        let items: Vec<u32> = (0..12).collect();
        let mut cursor = DisclosureCursor::default();

        assert_eq!(cursor.visible(0, &items).len(), 5);
        assert_eq!(cursor.hidden(0, items.len()), 7);

        cursor.reveal_more();
        assert_eq!(cursor.visible(0, &items).len(), 10);

        cursor.reveal_more();
        assert_eq!(cursor.visible(0, &items), &items[..]);
        assert_eq!(cursor.hidden(0, items.len()), 0);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("shared".parse(), Ok(DisclosurePolicy::Shared));
        assert_eq!("Per-Turn".parse(), Ok(DisclosurePolicy::PerTurn));
        assert_eq!("per_turn".parse(), Ok(DisclosurePolicy::PerTurn));
        assert!("sideways".parse::<DisclosurePolicy>().is_err());
    }
}
