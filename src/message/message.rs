use crate::configuration::PayloadFormat;
use crate::severity::Severity;
use serde::Serialize;

/// Block Kit body: `{"blocks": [...]}`.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct BlockMessage {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<BlockText>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BlockText {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl Block {
    /// A mrkdwn section rendered as a bold title line followed by the value.
    pub fn section(title: &str, value: &str) -> Self {
        Self {
            kind: "section".to_string(),
            text: Some(BlockText {
                kind: "mrkdwn".to_string(),
                text: format!("*{}*\n{}\n\n", title, value),
            }),
        }
    }

    pub fn divider() -> Self {
        Self {
            kind: "divider".to_string(),
            text: None,
        }
    }
}

/// Flat body: `{"type": "message", "channel", "user", "text"}`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TextMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub channel: String,
    pub user: String,
    pub text: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Payload {
    Blocks(BlockMessage),
    Text(TextMessage),
}

/// Everything a rendering needs, borrowed from the notifier for one call.
#[derive(Debug, Clone, Copy)]
pub struct MessageParts<'a> {
    pub label: &'a str,
    pub severity: &'a Severity,
    pub wrap: &'a str,
    pub error: Option<&'a anyhow::Error>,
    pub attachment: Option<&'a str>,
    pub channel: &'a str,
    pub user: &'a str,
}

impl MessageParts<'_> {
    fn attachment(&self) -> Option<&str> {
        self.attachment.filter(|a| !a.is_empty())
    }
}

pub fn label_prefix(label: &str) -> String {
    if label.is_empty() {
        String::new()
    } else {
        format!("*[{}]* ", label)
    }
}

/// Renders the error with its whole cause chain, or nothing when no error was set.
pub fn error_text(error: Option<&anyhow::Error>) -> String {
    error.map(|e| format!("{:#}", e)).unwrap_or_default()
}

/// `wrap: error`, collapsing to whichever side is non-empty.
pub fn wrapped_text(wrap: &str, error: Option<&anyhow::Error>) -> String {
    let error = error_text(error);
    match (wrap.is_empty(), error.is_empty()) {
        (false, false) => format!("{}: {}", wrap, error),
        (false, true) => wrap.to_string(),
        (true, _) => error,
    }
}

pub fn render_blocks(parts: &MessageParts<'_>) -> BlockMessage {
    let mut blocks = vec![
        Block::section("Location", &label_prefix(parts.label)),
        Block::divider(),
        Block::section("Severity", parts.severity.prefix()),
        Block::divider(),
        Block::section("Message", parts.wrap),
        Block::divider(),
        Block::section("Data", &error_text(parts.error)),
    ];

    if let Some(attachment) = parts.attachment() {
        blocks.push(Block::divider());
        blocks.push(Block::section("Additional Data", attachment));
    }

    BlockMessage {
        text: String::new(),
        blocks,
    }
}

pub fn render_text(parts: &MessageParts<'_>) -> TextMessage {
    let mut text = format!(
        "{}{}{}",
        label_prefix(parts.label),
        parts.severity.prefix(),
        wrapped_text(parts.wrap, parts.error)
    );

    if let Some(attachment) = parts.attachment() {
        text.push_str("\n\n");
        text.push_str(attachment);
    }

    TextMessage {
        kind: "message".to_string(),
        channel: parts.channel.to_string(),
        user: parts.user.to_string(),
        text,
    }
}

pub fn render(format: PayloadFormat, parts: &MessageParts<'_>) -> Payload {
    match format {
        PayloadFormat::Blocks => Payload::Blocks(render_blocks(parts)),
        PayloadFormat::Text => Payload::Text(render_text(parts)),
    }
}
