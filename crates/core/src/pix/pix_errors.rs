use thiserror::Error;

/// How a caller should react to a [`PixError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Network trouble or a gateway hiccup; asking again may succeed.
    Transient,
    /// Bad input, credentials or configuration; retrying will not help.
    Permanent,
}

/// Errors raised while talking to the PIX gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PixError {
    /// Charge amount is zero or negative. Caught before any gateway call.
    #[error("Invalid PIX amount: {0}")]
    InvalidAmount(String),

    /// The gateway client is missing its URL or credentials.
    #[error("PIX gateway is not configured: {0}")]
    NotConfigured(String),

    /// The gateway refused our credentials (HTTP 401/403).
    #[error("PIX gateway rejected the credentials")]
    Unauthorized,

    /// The gateway refused the charge itself (HTTP 400/422).
    #[error("PIX charge rejected by gateway: {0}")]
    Rejected(String),

    /// The gateway does not know the transaction.
    #[error("PIX transaction not found: {0}")]
    NotFound(String),

    #[error("PIX gateway timed out")]
    Timeout,

    /// Connection failure or non-2xx status without a terminal meaning.
    #[error("PIX gateway unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed PIX gateway response: {0}")]
    MalformedResponse(String),
}

impl PixError {
    /// Returns the retry classification for this error.
    ///
    /// `NotFound` counts as transient: a gateway may answer a status query
    /// before it has indexed a transaction it just created.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::InvalidAmount(_)
            | Self::NotConfigured(_)
            | Self::Unauthorized
            | Self::Rejected(_) => RetryClass::Permanent,

            Self::NotFound(_)
            | Self::Timeout
            | Self::Unavailable(_)
            | Self::MalformedResponse(_) => RetryClass::Transient,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.retry_class() == RetryClass::Transient
    }

    /// Message shown to the investor when a QR code cannot be generated.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "Enter an amount greater than zero to generate the PIX code.",
            Self::Rejected(_) => "The payment provider refused this deposit. Check the amount and try again.",
            Self::NotConfigured(_) | Self::Unauthorized => {
                "PIX deposits are unavailable due to a configuration problem. Please contact support."
            }
            Self::NotFound(_) | Self::Timeout | Self::Unavailable(_) | Self::MalformedResponse(_) => {
                "The payment service is temporarily unavailable. Please try again in a few moments."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_permanent() {
        assert_eq!(
            PixError::NotConfigured("missing api key".to_string()).retry_class(),
            RetryClass::Permanent
        );
        assert_eq!(PixError::Unauthorized.retry_class(), RetryClass::Permanent);
        assert_eq!(
            PixError::Rejected("amount too low".to_string()).retry_class(),
            RetryClass::Permanent
        );
    }

    #[test]
    fn test_network_errors_are_transient() {
        assert!(PixError::Timeout.is_transient());
        assert!(PixError::Unavailable("HTTP 502".to_string()).is_transient());
        assert!(PixError::MalformedResponse("eof".to_string()).is_transient());
        assert!(PixError::NotFound("tx-1".to_string()).is_transient());
    }

    #[test]
    fn test_user_messages_distinguish_retry_from_support() {
        let transient = PixError::Timeout.user_message();
        let permanent = PixError::Unauthorized.user_message();
        assert_ne!(transient, permanent);
        assert!(transient.contains("try again"));
        assert!(permanent.contains("contact support"));
    }
}
