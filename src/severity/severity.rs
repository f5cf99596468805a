use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Alert level attached to a notification. It only controls the prefix glyph
/// shown in Slack.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    #[default]
    None,
    Notification,
    Info,
    Warning,
    Error,
    Critical,
    /// Any name outside the known set. Renders without a prefix.
    Unknown(String),
}

impl Severity {
    /// Display prefix for this severity: glyph plus two spaces, or empty.
    pub fn prefix(&self) -> &'static str {
        match self {
            Severity::Notification => "\u{1F449}  ",
            Severity::Info => "\u{2139}\u{FE0F}  ",
            Severity::Warning => "\u{26A0}\u{FE0F}  ",
            Severity::Error => "\u{1F534}  ",
            Severity::Critical => "\u{274C}  ",
            Severity::None | Severity::Unknown(_) => "",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::None => "none",
            Severity::Notification => "notification",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
            Severity::Unknown(name) => name,
        }
    }
}

impl From<&str> for Severity {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Severity::None,
            "notification" => Severity::Notification,
            "info" => Severity::Info,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            "critical" => Severity::Critical,
            _ => Severity::Unknown(name.to_string()),
        }
    }
}

impl From<String> for Severity {
    fn from(name: String) -> Self {
        Severity::from(name.as_str())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl FromStr for Severity {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Severity::from(s))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
