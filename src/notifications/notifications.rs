use crate::configuration::{Options, PayloadFormat};
use crate::error::DeliveryError;
use crate::message::{MessageParts, render};
use crate::severity::Severity;
use crate::traits::{RawResponse, WebhookTransport};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use std::fmt;
use tracing::{debug, error};

/// Blocking reqwest implementation of WebhookTransport
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl WebhookTransport for HttpTransport {
    // Webhook URLs carry their token in the path, keep them out of spans and errors
    #[tracing::instrument(name = "post_json", skip(self, url, body), fields(bytes = body.len()))]
    fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, DeliveryError> {
        let request = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
            .map_err(|e| DeliveryError::Request(Box::new(e.without_url())))?;

        let response = self
            .client
            .execute(request)
            .map_err(|e| DeliveryError::Transport(Box::new(e.without_url())))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|e| DeliveryError::Body(Box::new(e.without_url())));

        Ok(RawResponse { status, body })
    }
}

/// Serializes a payload for the wire. A failure here is logged and dropped,
/// it never reaches `last_response_error`.
///
/// `Payload` only holds strings and cannot fail to serialize; the branch is
/// kept for payload types that can.
pub fn encode_payload<P: Serialize + ?Sized>(payload: &P) -> Option<Vec<u8>> {
    match serde_json::to_vec(payload) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(stage = "serialize", "Failed to serialize notification payload: {}", e);
            None
        }
    }
}

/// Builds a notifier over the default HTTP transport.
pub fn configure(options: &Options) -> Notifier {
    Notifier::configure(options)
}

/// Reports errors to a Slack webhook.
///
/// Set the error, optionally a severity and an attachment, then call
/// [`Notifier::notify`]. Delivery never fails from the caller's point of
/// view: the outcome is left on the notifier and read back with
/// [`Notifier::last_response_status`], [`Notifier::last_response_body`] and
/// [`Notifier::last_response_error`]. HTTP error statuses are not treated as
/// failures.
pub struct Notifier {
    webhook: String,
    channel: String,
    user: String,
    label: String,
    format: PayloadFormat,
    error: Option<anyhow::Error>,
    severity: Severity,
    attachment: Option<String>,
    response_body: Vec<u8>,
    response_status: u16,
    response_error: Option<DeliveryError>,
    transport: Box<dyn WebhookTransport>,
}

impl Notifier {
    pub fn configure(options: &Options) -> Self {
        Self::with_transport(options, Box::new(HttpTransport::new()))
    }

    pub fn with_transport(options: &Options, transport: Box<dyn WebhookTransport>) -> Self {
        Self {
            webhook: options.webhook.clone(),
            channel: options.channel.clone(),
            user: options.user.clone(),
            label: options.label.clone(),
            format: options.format,
            error: None,
            severity: Severity::None,
            attachment: None,
            response_body: Vec::new(),
            response_status: 0,
            response_error: None,
            transport,
        }
    }

    /// Stores the error to report and clears the severity.
    pub fn set_error(&mut self, err: impl Into<anyhow::Error>) -> &mut Self {
        self.error = Some(err.into());
        self.severity = Severity::None;
        self
    }

    /// Like `set_error`, with the error built from plain text.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.set_error(anyhow::Error::msg(message.into()))
    }

    pub fn severity(&mut self, severity: impl Into<Severity>) -> &mut Self {
        self.severity = severity.into();
        self
    }

    /// Extra text appended to the next notification only.
    pub fn set_attachment(&mut self, attachment: impl Into<String>) {
        self.attachment = Some(attachment.into());
    }

    /// Renders the current error wrapped in `wrap_message` and posts it.
    #[tracing::instrument(
        name = "notify",
        skip(self),
        fields(label = %self.label, severity = %self.severity, format = %self.format)
    )]
    pub fn notify(&mut self, wrap_message: &str) {
        let attachment = self.attachment.take();
        let parts = MessageParts {
            label: &self.label,
            severity: &self.severity,
            wrap: wrap_message,
            error: self.error.as_ref(),
            attachment: attachment.as_deref(),
            channel: &self.channel,
            user: &self.user,
        };
        let payload = render(self.format, &parts);

        self.deliver(&payload);
    }

    /// `notify` with a formatted wrap message; see the [`notifyf!`](crate::notifyf) macro.
    pub fn notifyf(&mut self, args: fmt::Arguments<'_>) {
        let wrap_message = fmt::format(args);
        self.notify(&wrap_message);
    }

    fn deliver<P: Serialize + ?Sized>(&mut self, payload: &P) {
        self.reset_response();

        let Some(body) = encode_payload(payload) else {
            return;
        };

        match self.transport.post_json(&self.webhook, body) {
            Ok(RawResponse { status, body }) => {
                self.response_status = status;
                match body {
                    Ok(bytes) => {
                        debug!(status, bytes = bytes.len(), "Notification delivered");
                        self.response_body = bytes;
                    }
                    Err(e) => self.record_failure(e),
                }
            }
            Err(e) => self.record_failure(e),
        }
    }

    fn reset_response(&mut self) {
        self.response_body = Vec::new();
        self.response_status = 0;
        self.response_error = None;
    }

    fn record_failure(&mut self, e: DeliveryError) {
        error!(stage = e.stage(), "Failed to deliver notification: {}", e);
        self.response_error = Some(e);
    }

    pub fn last_response_body(&self) -> &[u8] {
        &self.response_body
    }

    /// HTTP status of the last attempt, 0 when no response was received.
    pub fn last_response_status(&self) -> u16 {
        self.response_status
    }

    pub fn last_response_error(&self) -> Option<&DeliveryError> {
        self.response_error.as_ref()
    }

    pub fn error(&self) -> Option<&anyhow::Error> {
        self.error.as_ref()
    }

    pub fn current_severity(&self) -> &Severity {
        &self.severity
    }

    pub fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn webhook(&self) -> &str {
        &self.webhook
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("webhook", &self.webhook)
            .field("channel", &self.channel)
            .field("user", &self.user)
            .field("label", &self.label)
            .field("format", &self.format)
            .field("error", &self.error)
            .field("severity", &self.severity)
            .field("attachment", &self.attachment)
            .field("response_status", &self.response_status)
            .field("response_error", &self.response_error)
            .finish_non_exhaustive()
    }
}

/// Formats the wrap message and notifies:
/// `notifyf!(notifier, "failed to load {}", path)`.
#[macro_export]
macro_rules! notifyf {
    ($notifier:expr, $($arg:tt)+) => {
        $notifier.notifyf(::std::format_args!($($arg)+))
    };
}
