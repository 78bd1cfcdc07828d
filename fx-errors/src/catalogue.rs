//! Flat catalogue of machine-readable error codes.
//!
//! Codes are deliberately opaque short strings (matching the upstream
//! system's own catalogue) rather than descriptive slugs, so operators
//! can grep logs for an exact code without worrying about message text
//! drifting.

use serde::Serialize;

/// A stable, machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    /// No valid config file could be located.
    NoConfigFile,
    /// Every enabled provider failed to answer a request.
    AllProvidersFailed,
    /// Round-robin strategy exhausted every provider.
    RoundRobinAllFailed,
    /// Upstream response omitted a requested quote symbol.
    QuoteMissing,
    /// Upstream responded with a non-200 status.
    UpstreamNon200,
}

impl ErrorCode {
    /// The literal code string, as used on the wire and in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NoConfigFile => "eNcF01",
            ErrorCode::AllProvidersFailed => "eGaPf1",
            ErrorCode::RoundRobinAllFailed => "eCRP68",
            ErrorCode::QuoteMissing => "ePrRnf",
            ErrorCode::UpstreamNon200 => "eAGn2c",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_catalogue() {
        assert_eq!(ErrorCode::NoConfigFile.as_str(), "eNcF01");
        assert_eq!(ErrorCode::AllProvidersFailed.as_str(), "eGaPf1");
        assert_eq!(ErrorCode::RoundRobinAllFailed.as_str(), "eCRP68");
        assert_eq!(ErrorCode::QuoteMissing.as_str(), "ePrRnf");
        assert_eq!(ErrorCode::UpstreamNon200.as_str(), "eAGn2c");
    }
}
