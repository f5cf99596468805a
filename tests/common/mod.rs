/// Shared test fixtures and utilities for test modules
#[allow(dead_code)]
pub mod fixtures {
    use slack_notifier::configuration::{Options, PayloadFormat};

    /// Options pointing at `{base}/hook` with every routing field filled in
    pub fn options_for(base: &str) -> Options {
        Options::new(format!("{}/hook", base))
            .with_channel("C1")
            .with_user("U1")
            .with_label("svc-a")
    }

    /// Same as `options_for`, rendering the flat text payload
    pub fn text_options_for(base: &str) -> Options {
        options_for(base).with_format(PayloadFormat::Text)
    }

    /// An address nothing listens on, so connecting is refused
    pub fn unreachable_webhook() -> &'static str {
        "http://127.0.0.1:1/hook"
    }

    /// Complete YAML options document
    pub fn options_yaml() -> &'static str {
        r##"
webhook: https://hooks.slack.test/services/T000/B000/XXXX
channel: "#alerts"
user: deploy-bot
label: billing-api
format: text
"##
    }
}
