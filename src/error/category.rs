//! Error category classification.
//!
//! Categories drive how the viewer reacts to a failure: whether to retry,
//! and whether the message is shown to the user or only logged.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Feed connection problems. Transient, the client reconnects.
    Network,

    /// Bad data from upstream (malformed frames, unknown ids).
    Upstream,

    /// User input that cannot be applied (e.g. a malformed predicate).
    User,

    /// External tooling the viewer depends on is missing or misbehaving.
    Dependency,

    /// OS/terminal/filesystem errors.
    System,

    /// Invalid command line or environment.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network)
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Upstream => "upstream",
            ErrorCategory::User => "user",
            ErrorCategory::Dependency => "dependency",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the sniffer is running and the feed URL is correct.",
            ErrorCategory::Upstream => "The sniffer sent data the viewer could not use.",
            ErrorCategory::User => "Edit the filter and press Enter again.",
            ErrorCategory::Dependency => "Install jq or point SNIFFER_JQ at it.",
            ErrorCategory::System => "Check terminal and file permissions.",
            ErrorCategory::Configuration => "Run with --help to see the accepted options.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_network_is_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        for category in [
            ErrorCategory::Upstream,
            ErrorCategory::User,
            ErrorCategory::Dependency,
            ErrorCategory::System,
            ErrorCategory::Configuration,
        ] {
            assert!(!category.is_retryable(), "{} should not retry", category);
        }
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(ErrorCategory::User.to_string(), "user");
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }

    #[test]
    fn test_recovery_hints_are_non_empty() {
        assert!(!ErrorCategory::Dependency.recovery_hint().is_empty());
        assert!(!ErrorCategory::Network.recovery_hint().is_empty());
    }
}
