//! Error types for webhook delivery and configuration loading.

use thiserror::Error;

/// Boxed error carried by delivery faults, so transports other than reqwest can report them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Faults raised while delivering a payload to the webhook.
///
/// These never escape `Notifier::notify`; they are stored on the notifier and
/// read back through `Notifier::last_response_error`.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The outbound request could not be built (bad URL, bad header)
    #[error("failed to build webhook request: {0}")]
    Request(#[source] BoxError),

    /// Connect, TLS, timeout or any other transport failure before a response arrived
    #[error("failed to send webhook request: {0}")]
    Transport(#[source] BoxError),

    /// A response arrived but its body could not be read
    #[error("failed to read webhook response body: {0}")]
    Body(#[source] BoxError),
}

impl DeliveryError {
    /// Short name of the delivery stage that failed, used as a log field.
    pub fn stage(&self) -> &'static str {
        match self {
            DeliveryError::Request(_) => "request",
            DeliveryError::Transport(_) => "transport",
            DeliveryError::Body(_) => "body",
        }
    }
}

/// Errors raised while loading notifier options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown payload format '{0}', expected 'blocks' or 'text'")]
    UnknownFormat(String),
}
