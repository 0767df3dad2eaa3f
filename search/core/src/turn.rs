//! Transcript Records
//!
//! The two record types that make up a conversation transcript: [`Turn`] and
//! the [`Document`] results a system turn may carry.
//!
//! A turn is never edited after it is appended. Everything here is plain data;
//! the rules for when turns are created live in [`crate::transition`].

use serde::{Deserialize, Deserializer, Serialize};

/// Content of a system turn that carries at least one document
pub const FOUND_CONTENT: &str = "Here's what I found:";

/// Content of a system turn for a search that matched nothing
pub const NO_RESULTS_CONTENT: &str = "No relevant documents found.";

/// Content of a system turn for a failed search
pub const FAILURE_CONTENT: &str = "Something went wrong. Please try again.";

/// Who authored a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing queries
    User,
    /// The search client reporting an outcome
    System,
}

impl Role {
    /// Lowercase label, as used on the wire and in logs
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One search result attached to a system turn
///
/// Documents have no identity beyond their position in the parent turn and
/// are never deduplicated. `id` and `score` are passed through from the
/// backend when it sends them.
///
/// The backend reads these from nullable columns, so a `null` or missing
/// `title`, `type` or `url` decodes as an empty string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Human-readable title
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Classification tag (e.g. "article", "pdf")
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
    /// Link target
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    /// Backend identifier, if provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Relevance score, if provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Document {
    /// Create a document with the three required fields
    pub fn new(title: impl Into<String>, kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: kind.into(),
            url: url.into(),
            id: None,
            score: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry in the transcript
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored this turn
    pub role: Role,
    /// Display text: the raw query for user turns, a status line for system turns
    pub content: String,
    /// Result documents.
    ///
    /// `Some` only on a system turn that followed a search with at least one
    /// result. Never `Some(vec![])`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Document>>,
    /// When the turn was created (Unix timestamp ms)
    pub created_at: u64,
}

impl Turn {
    /// A user turn holding the query exactly as typed
    pub fn user(query: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: query.into(),
            documents: None,
            created_at: now_ms(),
        }
    }

    /// The system turn for a successful search
    ///
    /// An empty result list yields the "no results" turn with no documents
    /// field at all.
    #[must_use]
    pub fn search_results(results: Vec<Document>) -> Self {
        if results.is_empty() {
            return Self::system(NO_RESULTS_CONTENT, None);
        }
        Self::system(FOUND_CONTENT, Some(results))
    }

    /// The system turn for a failed search
    #[must_use]
    pub fn search_failed() -> Self {
        Self::system(FAILURE_CONTENT, None)
    }

    fn system(content: &str, documents: Option<Vec<Document>>) -> Self {
        Self {
            role: Role::System,
            content: content.to_string(),
            documents,
            created_at: now_ms(),
        }
    }

    /// Whether this turn carries documents
    #[must_use]
    pub fn has_documents(&self) -> bool {
        self.documents.is_some()
    }

    /// Number of documents carried (0 when absent)
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.as_ref().map_or(0, Vec::len)
    }
}

/// Current time in milliseconds since the Unix epoch
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_turn_has_no_documents() {
        let turn = Turn::user("  cats  ");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "  cats  ");
        assert!(turn.documents.is_none());
    }

    #[test]
    fn test_empty_results_omit_documents() {
        let turn = Turn::search_results(Vec::new());
        assert_eq!(turn.role, Role::System);
        assert_eq!(turn.content, NO_RESULTS_CONTENT);
        assert!(!turn.has_documents());
    }

    #[test]
    fn test_results_preserve_order() {
        let docs = vec![
            Document::new("B", "pdf", "https://b"),
            Document::new("A", "article", "https://a"),
        ];
        let turn = Turn::search_results(docs.clone());
        assert_eq!(turn.content, FOUND_CONTENT);
        assert_eq!(turn.documents, Some(docs));
        assert_eq!(turn.document_count(), 2);
    }

    #[test]
    fn test_document_wire_format() {
        let doc: Document = serde_json::from_str(
            r#"{"title":"Cat Facts","type":"article","url":"https://x"}"#,
        )
        .unwrap();
        assert_eq!(doc, Document::new("Cat Facts", "article", "https://x"));

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "article");
        assert!(json.get("score").is_none());
    }

    #[test]
    fn test_turn_serialization_skips_absent_documents() {
        let json = serde_json::to_value(Turn::search_failed()).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], FAILURE_CONTENT);
        assert!(json.get("documents").is_none());
    }
}
