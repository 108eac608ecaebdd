use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::progress::ProgressState;
use crate::session::Session;

/// The one screen currently shown. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Repository URL entry or session join.
    Submission,
    /// Ingestion running or finished and awaiting confirmation.
    Loading {
        session: Option<Session>,
        progress: ProgressState,
    },
    Chat {
        session: Session,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::Loading { .. } => "loading",
            Self::Chat { .. } => "chat",
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Submission => None,
            Self::Loading { session, .. } => session.as_ref(),
            Self::Chat { session } => Some(session),
        }
    }

    pub fn progress(&self) -> Option<&ProgressState> {
        match self {
            Self::Loading { progress, .. } => Some(progress),
            _ => None,
        }
    }

    /// Location matching this screen. Loading lives under the root route.
    pub fn route(&self) -> Route {
        match self {
            Self::Chat { session } => Route::Chat(session.id().to_string()),
            _ => Route::Root,
        }
    }
}

/// Addressable locations: `/` and `/chat/<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Chat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route '{0}' (expected '/' or '/chat/<session-id>')")]
pub struct RouteParseError(String);

impl FromStr for Route {
    type Err = RouteParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Ok(Self::Root);
        }

        match trimmed.strip_prefix("/chat/") {
            Some(id) if !id.is_empty() && !id.contains('/') => Ok(Self::Chat(id.to_string())),
            _ => Err(RouteParseError(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("/"),
            Self::Chat(id) => write!(f, "/chat/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_parse_and_format() {
        assert_eq!("/".parse::<Route>(), Ok(Route::Root));
        assert_eq!("".parse::<Route>(), Ok(Route::Root));
        assert_eq!(
            "/chat/abc".parse::<Route>(),
            Ok(Route::Chat("abc".to_string()))
        );
        assert_eq!(Route::Chat("abc".to_string()).to_string(), "/chat/abc");
        assert_eq!(Route::Root.to_string(), "/");
    }

    #[test]
    fn unknown_routes_are_rejected() {
        for value in ["/chat/", "/chat/a/b", "/settings", "chat/abc"] {
            assert!(value.parse::<Route>().is_err(), "{value} must not parse");
        }
    }

    #[test]
    fn loading_maps_to_root_route() {
        let screen = Screen::Loading {
            session: None,
            progress: ProgressState::default(),
        };
        assert_eq!(screen.route(), Route::Root);
        assert_eq!(screen.name(), "loading");
        assert!(screen.session().is_none());
    }
}
