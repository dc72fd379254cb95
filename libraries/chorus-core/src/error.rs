/// Core error types for Chorus
use crate::types::{LinkType, ServiceType};
use thiserror::Error;

/// Result type alias using `ChorusError`
pub type Result<T> = std::result::Result<T, ChorusError>;

/// Core error type for Chorus
#[derive(Error, Debug)]
pub enum ChorusError {
    /// The owning service cannot classify or fetch this link
    #[error("{service} links of this kind are not supported: {link}")]
    UnsupportedLinkKind { service: ServiceType, link: String },

    /// The service can classify the link but has no operation for its type
    #[error("{service} cannot fetch {kind} links: {link}")]
    UnsupportedOperation {
        service: ServiceType,
        kind: LinkType,
        link: String,
    },

    /// Network or parse failure reported by a service adapter
    #[error("Failed to resolve {link}: {reason}")]
    ResolutionFailed { link: String, reason: String },

    /// No adapter is registered for a service
    #[error("No adapter registered for {0}")]
    ServiceNotRegistered(ServiceType),

    /// Input could not be understood as a link
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl ChorusError {
    /// Create an unsupported link kind error
    pub fn unsupported(service: ServiceType, link: impl Into<String>) -> Self {
        Self::UnsupportedLinkKind {
            service,
            link: link.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported_operation(
        service: ServiceType,
        kind: LinkType,
        link: impl Into<String>,
    ) -> Self {
        Self::UnsupportedOperation {
            service,
            kind,
            link: link.into(),
        }
    }

    /// Create a resolution failure
    pub fn resolution_failed(link: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResolutionFailed {
            link: link.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error means "this link kind cannot be handled here"
    /// rather than "the lookup went wrong".
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLinkKind { .. }
                | Self::UnsupportedOperation { .. }
                | Self::ServiceNotRegistered(_)
        )
    }

    /// Whether the adapter gave up on a lookup (network or parse failure)
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::ResolutionFailed { .. } | Self::Network(_) | Self::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_errors_are_classified() {
        assert!(ChorusError::unsupported(ServiceType::YouTube, "x").is_unsupported());
        assert!(ChorusError::ServiceNotRegistered(ServiceType::Bandcamp).is_unsupported());
        assert!(!ChorusError::resolution_failed("x", "timeout").is_unsupported());
        assert!(ChorusError::resolution_failed("x", "timeout").is_resolution_failure());
        assert!(!ChorusError::invalid_input("x").is_resolution_failure());
    }

    #[test]
    fn messages_name_the_service() {
        let err = ChorusError::unsupported_operation(
            ServiceType::SoundCloud,
            LinkType::Show,
            "https://soundcloud.com/a",
        );
        assert_eq!(
            err.to_string(),
            "SoundCloud cannot fetch show links: https://soundcloud.com/a"
        );
    }
}
