use std::fmt;

use thiserror::Error;

/// Machine-readable error codes for scripts and log filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    TransportFailed,
    HttpStatus,
    DecodeFailed,
    QueryRejected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::TransportFailed => "E4001",
            Self::HttpStatus => "E4002",
            Self::DecodeFailed => "E4003",
            Self::QueryRejected => "E4004",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::TransportFailed => "Could not reach the GraphQL endpoint",
            Self::HttpStatus => "GraphQL endpoint returned an error status",
            Self::DecodeFailed => "Unexpected GraphQL response shape",
            Self::QueryRejected => "GraphQL query returned errors",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in rumors/config.toml and retry."),
            Self::TransportFailed => {
                Some("Check the endpoint URL (--endpoint or RUMORS_API_URL) and network access.")
            }
            Self::HttpStatus => Some("Check that the endpoint accepts this app id."),
            Self::DecodeFailed | Self::QueryRejected => {
                Some("The server schema may have changed; retry with --verbose for details.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A failed list or stats fetch.
///
/// Held by the list orchestrator for display, so it is `Clone` and carries
/// only rendered strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server responded with status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("GraphQL error: {}", .0.join("; "))]
    Graphql(Vec<String>),
}

impl FetchError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Transport(_) => ErrorCode::TransportFailed,
            Self::Status { .. } => ErrorCode::HttpStatus,
            Self::Decode(_) => ErrorCode::DecodeFailed,
            Self::Graphql(_) => ErrorCode::QueryRejected,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
