use crate::error::ConfigError;
use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

pub const ENV_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
pub const ENV_CHANNEL: &str = "SLACK_CHANNEL";
pub const ENV_USER: &str = "SLACK_USER";
pub const ENV_LABEL: &str = "SLACK_LABEL";
pub const ENV_PAYLOAD_FORMAT: &str = "SLACK_PAYLOAD_FORMAT";

/// Shape of the JSON body posted to the webhook.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PayloadFormat {
    /// Block Kit sections: Location, Severity, Message, Data, Additional Data
    #[default]
    Blocks,
    /// A single `text` field addressed to the configured channel and user
    Text,
}

impl FromStr for PayloadFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocks" | "block" => Ok(PayloadFormat::Blocks),
            "text" | "flat" => Ok(PayloadFormat::Text),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

// YAML and environment values go through the same parser
impl TryFrom<String> for PayloadFormat {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadFormat::Blocks => f.write_str("blocks"),
            PayloadFormat::Text => f.write_str("text"),
        }
    }
}

/// Delivery settings for a notifier. Nothing here is validated; an empty
/// webhook only shows up later as a request build failure.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Options {
    pub webhook: String,
    pub channel: String,
    pub user: String,
    pub label: String,
    pub format: PayloadFormat,
}

impl Options {
    pub fn new(webhook: impl Into<String>) -> Self {
        Self {
            webhook: webhook.into(),
            ..Self::default()
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_format(mut self, format: PayloadFormat) -> Self {
        self.format = format;
        self
    }

    /// Reads options from `SLACK_*` environment variables. Unset variables
    /// leave the corresponding field empty.
    pub fn from_env() -> Result<Self, Error> {
        let var = |name: &str| env::var(name).unwrap_or_default();

        let format = match env::var(ENV_PAYLOAD_FORMAT) {
            Ok(value) if !value.trim().is_empty() => value
                .parse::<PayloadFormat>()
                .with_context(|| format!("Failed to parse {}", ENV_PAYLOAD_FORMAT))?,
            _ => PayloadFormat::default(),
        };

        let options = Self {
            webhook: var(ENV_WEBHOOK_URL),
            channel: var(ENV_CHANNEL),
            user: var(ENV_USER),
            label: var(ENV_LABEL),
            format,
        };

        if options.webhook.is_empty() {
            warn!("{} is not set, notifications will fail to send", ENV_WEBHOOK_URL);
        }

        Ok(options)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, Error> {
        serde_yaml::from_str(content).context("Failed to parse notifier options from YAML")
    }

    #[tracing::instrument(name = "load_options", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = fs::read_to_string(path.as_ref()).context("Failed to read notifier options file")?;
        let options = Self::from_yaml_str(&content)?;

        info!("Loaded notifier options for label: {}", &options.label);
        Ok(options)
    }
}
