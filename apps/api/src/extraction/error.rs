use thiserror::Error;

use crate::llm_client::LlmError;

/// Errors surfaced by every extractor operation.
///
/// Nothing is retried or swallowed: transport failures pass through as
/// `Transport`, malformed replies become `Parse`.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Transport(LlmError),

    #[error("Failed to parse LLM reply: {message}")]
    Parse {
        message: String,
        raw_response: String,
    },
}

impl ExtractError {
    pub fn parse(message: impl Into<String>, raw_response: impl Into<String>) -> Self {
        ExtractError::Parse {
            message: message.into(),
            raw_response: raw_response.into(),
        }
    }
}

impl From<LlmError> for ExtractError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::InvalidRequest(msg) => ExtractError::InvalidParameter(msg),
            other => ExtractError::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_maps_to_invalid_parameter() {
        let err: ExtractError = LlmError::InvalidRequest("temperature".into()).into();
        assert!(matches!(err, ExtractError::InvalidParameter(_)));
    }

    #[test]
    fn test_api_error_passes_through_unchanged() {
        let err: ExtractError = LlmError::Api {
            status: 401,
            message: "bad key".into(),
        }
        .into();
        assert_eq!(err.to_string(), "API error (status 401): bad key");
    }
}
