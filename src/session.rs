use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;

const SESSION_ID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

fn session_id_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(SESSION_ID_PATTERN).ok())
        .as_ref()
}

/// Returns true when `candidate` is a hyphenated 8-4-4-4-12 hex identifier.
pub fn is_valid_session_id(candidate: &str) -> bool {
    session_id_regex().is_some_and(|regex| regex.is_match(candidate))
}

/// Opaque server-side handle naming one ingested repository index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the client came to hold a session identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOrigin {
    /// Minted by the server for a repository this client submitted.
    Ingested { repo_url: String },
    /// Typed or routed in by the user; existence is unverified.
    Asserted,
}

/// Immutable once created; discarded on reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    origin: SessionOrigin,
}

impl Session {
    /// Wraps a server-minted identifier. Server ids are opaque, so only
    /// blank values are refused.
    pub fn from_ingestion(
        server_session_id: &str,
        repo_url: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let id = server_session_id.trim();
        if id.is_empty() {
            return Err(ValidationError::MalformedSessionId);
        }

        Ok(Self {
            id: SessionId(id.to_string()),
            origin: SessionOrigin::Ingested {
                repo_url: repo_url.into(),
            },
        })
    }

    /// Accepts a user-asserted identifier after a format check only.
    pub fn from_user_input(candidate: &str) -> Result<Self, ValidationError> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        if !is_valid_session_id(candidate) {
            return Err(ValidationError::MalformedSessionId);
        }

        Ok(Self {
            id: SessionId(candidate.to_string()),
            origin: SessionOrigin::Asserted,
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn origin(&self) -> &SessionOrigin {
        &self.origin
    }

    pub fn repo_url(&self) -> Option<&str> {
        match &self.origin {
            SessionOrigin::Ingested { repo_url } => Some(repo_url),
            SessionOrigin::Asserted => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "11111111-1111-1111-1111-111111111111";

    #[test]
    fn user_input_accepts_mixed_case_hex_uuid_and_trims() {
        let session = Session::from_user_input("  0aB1c2D3-4e5F-6789-abcd-EF0123456789 \n")
            .expect("well-formed id");

        assert_eq!(session.id().as_str(), "0aB1c2D3-4e5F-6789-abcd-EF0123456789");
        assert_eq!(session.origin(), &SessionOrigin::Asserted);
        assert_eq!(session.repo_url(), None);
    }

    #[test]
    fn user_input_rejects_malformed_candidates() {
        for candidate in [
            "not-a-uuid",
            "11111111111111111111111111111111",
            "11111111-1111-1111-1111-11111111111",
            "11111111-1111-1111-1111-1111111111111",
            "g1111111-1111-1111-1111-111111111111",
            "{11111111-1111-1111-1111-111111111111}",
            "11111111-1111-1111-1111-111111111111 extra",
        ] {
            assert_eq!(
                Session::from_user_input(candidate),
                Err(ValidationError::MalformedSessionId),
                "{candidate} must be rejected"
            );
        }
    }

    #[test]
    fn empty_user_input_is_reported_separately() {
        assert_eq!(Session::from_user_input("   "), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn ingestion_accepts_opaque_ids_but_not_blank_ones() {
        let session = Session::from_ingestion("abc123", "https://github.com/acme/widgets")
            .expect("opaque id is fine");
        assert_eq!(session.id().to_string(), "abc123");
        assert_eq!(session.repo_url(), Some("https://github.com/acme/widgets"));

        assert_eq!(
            Session::from_ingestion(" ", "https://github.com/acme/widgets"),
            Err(ValidationError::MalformedSessionId)
        );
    }

    #[test]
    fn pattern_helper_matches_canonical_form() {
        assert!(is_valid_session_id(VALID));
        assert!(!is_valid_session_id(""));
    }
}
