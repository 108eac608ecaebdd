use rag_backend::BackendError;
use thiserror::Error;

/// Input rejected locally before any request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("input is empty")]
    EmptyInput,
    #[error("Please enter a valid session id")]
    MalformedSessionId,
}

/// Recoverable failure surfaced to the user. None of these end the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// `detail` is set when the server answered with an explanation.
    #[error("Server not reachable! ({message})")]
    Transport {
        message: String,
        detail: Option<String>,
    },
    #[error("Please try again or contact with the maintainer | Error : {detail}")]
    Application { detail: String },
}

impl ClientError {
    /// Text shown in the blocking alert for this failure.
    pub fn alert_text(&self) -> String {
        match self {
            Self::Validation(error) => error.to_string(),
            Self::Transport {
                detail: Some(detail),
                ..
            } => maintainer_alert(detail),
            Self::Transport { detail: None, .. } => "Server not reachable!".to_string(),
            Self::Application { detail } => maintainer_alert(detail),
        }
    }
}

impl From<BackendError> for ClientError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Transport { message } => Self::Transport {
                message,
                detail: None,
            },
            BackendError::Status { code, detail } => Self::Transport {
                message: format!("HTTP {code}: {detail}"),
                detail: Some(detail),
            },
            BackendError::Rejected { status, detail } => Self::Application {
                detail: detail.unwrap_or(status),
            },
            BackendError::Malformed(message) => Self::Application { detail: message },
        }
    }
}

fn maintainer_alert(detail: &str) -> String {
    format!("Please try again or contact with the maintainer | Error : {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_use_the_fixed_unreachable_alert() {
        let error = ClientError::from(BackendError::transport("connection refused"));

        assert_eq!(error.alert_text(), "Server not reachable!");
        assert_eq!(
            error.to_string(),
            "Server not reachable! (connection refused)"
        );
    }

    #[test]
    fn error_status_with_detail_alerts_the_detail_not_unreachable() {
        let error = ClientError::from(BackendError::Status {
            code: 500,
            detail: "Repository not found".to_string(),
        });

        assert_eq!(
            error,
            ClientError::Transport {
                message: "HTTP 500: Repository not found".to_string(),
                detail: Some("Repository not found".to_string()),
            }
        );
        assert_eq!(
            error.alert_text(),
            "Please try again or contact with the maintainer | Error : Repository not found"
        );
    }

    #[test]
    fn rejected_responses_alert_with_server_detail() {
        let error = ClientError::from(BackendError::Rejected {
            status: "error".to_string(),
            detail: Some("Repository not found".to_string()),
        });

        assert_eq!(
            error.alert_text(),
            "Please try again or contact with the maintainer | Error : Repository not found"
        );
    }

    #[test]
    fn rejected_without_detail_falls_back_to_status() {
        let error = ClientError::from(BackendError::Rejected {
            status: "failed".to_string(),
            detail: None,
        });

        assert_eq!(
            error,
            ClientError::Application {
                detail: "failed".to_string()
            }
        );
    }

    #[test]
    fn validation_alert_is_the_inline_warning() {
        let error = ClientError::from(ValidationError::MalformedSessionId);
        assert_eq!(error.alert_text(), "Please enter a valid session id");
    }
}
