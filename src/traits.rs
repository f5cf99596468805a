use crate::error::DeliveryError;

#[cfg(test)]
use mockall::automock;

/// What came back from the webhook. The status is known as soon as headers
/// arrive; reading the body can still fail afterwards.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: Result<Vec<u8>, DeliveryError>,
}

/// Trait for posting a serialized JSON payload to a webhook
#[cfg_attr(test, automock)]
pub trait WebhookTransport: Send + Sync {
    /// POST `body` to `url` with JSON accept/content-type headers
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, DeliveryError>;
}
