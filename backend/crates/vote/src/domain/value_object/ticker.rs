//! Ticker Value Object
//!
//! Short uppercase symbol identifying a poll (`varchar(5)`).

use derive_more::Display;

use crate::error::{VoteError, VoteResult};

/// Maximum ticker length
pub const TICKER_MAX_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct Ticker(String);

impl Ticker {
    /// 1 to 5 ASCII letters or digits, normalized to uppercase
    pub fn new(ticker: impl AsRef<str>) -> VoteResult<Self> {
        let ticker = ticker.as_ref().trim().to_ascii_uppercase();

        if ticker.is_empty() || ticker.len() > TICKER_MAX_LENGTH {
            return Err(VoteError::InvalidPoll(format!(
                "ticker must be 1 to {} characters",
                TICKER_MAX_LENGTH
            )));
        }
        if !ticker.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(VoteError::InvalidPoll(
                "ticker may only contain letters and digits".to_string(),
            ));
        }

        Ok(Self(ticker))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(ticker: impl Into<String>) -> Self {
        Self(ticker.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_normalized() {
        assert_eq!(Ticker::new(" btc ").unwrap().as_str(), "BTC");
        assert_eq!(Ticker::new("A1").unwrap().as_str(), "A1");
    }

    #[test]
    fn test_ticker_invalid() {
        assert!(Ticker::new("").is_err());
        assert!(Ticker::new("TOOLONG").is_err());
        assert!(Ticker::new("A-B").is_err());
    }
}
