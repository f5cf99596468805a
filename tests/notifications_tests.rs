mod common;

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{options_for, text_options_for, unreachable_webhook};
    use anyhow::anyhow;
    use assert_matches::assert_matches;
    use mockito::Matcher;
    use serde_json::json;
    use slack_notifier::configuration::Options;
    use slack_notifier::error::DeliveryError;
    use slack_notifier::notifications::Notifier;
    use slack_notifier::notifyf;
    use slack_notifier::severity::Severity;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_notify_end_to_end_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(body_string_contains("writing checkpoint"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let options = options_for(&mock_server.uri());

        // reqwest::blocking must stay off the async worker threads
        let (status, body, failed) = tokio::task::spawn_blocking(move || {
            let mut notifier = Notifier::configure(&options);
            notifier.set_error(anyhow!("disk full")).severity(Severity::Critical);
            notifier.notify("writing checkpoint");
            (
                notifier.last_response_status(),
                notifier.last_response_body().to_vec(),
                notifier.last_response_error().is_some(),
            )
        })
        .await
        .unwrap();

        assert_eq!(status, 200);
        assert_eq!(body, br#"{"ok":true}"#);
        assert!(!failed);

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);

        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let rendered = sent.to_string();
        assert!(rendered.contains("❌  "));
        assert!(rendered.contains("writing checkpoint"));
        assert_eq!(sent["blocks"][0]["text"]["text"], "*Location*\n*[svc-a]* \n\n");
        assert_eq!(sent["blocks"][6]["text"]["text"], "*Data*\ndisk full\n\n");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_notify_error_status_is_recorded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_payload"))
            .mount(&mock_server)
            .await;

        let options = options_for(&mock_server.uri());
        let (status, body, failed) = tokio::task::spawn_blocking(move || {
            let mut notifier = Notifier::configure(&options);
            notifier.set_message("x");
            notifier.notify("y");
            (
                notifier.last_response_status(),
                notifier.last_response_body().to_vec(),
                notifier.last_response_error().is_some(),
            )
        })
        .await
        .unwrap();

        assert_eq!(status, 400);
        assert_eq!(body, b"invalid_payload");
        assert!(!failed);
    }

    #[test]
    fn test_notify_unreachable_webhook() {
        let mut notifier = Notifier::configure(&Options::new(unreachable_webhook()));
        notifier.set_message("x");
        notifier.notify("y");

        assert_eq!(notifier.last_response_status(), 0);
        assert!(notifier.last_response_body().is_empty());
        assert_matches!(notifier.last_response_error(), Some(DeliveryError::Transport(_)));
    }

    #[test]
    fn test_notify_empty_webhook_fails_to_build_request() {
        let mut notifier = Notifier::configure(&Options::default());
        notifier.set_message("x");
        notifier.notify("y");

        assert_eq!(notifier.last_response_status(), 0);
        assert!(notifier.last_response_body().is_empty());
        assert_matches!(notifier.last_response_error(), Some(DeliveryError::Request(_)));
    }

    #[test]
    fn test_text_payload_shape() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/hook")
            .match_header("accept", "application/json")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "type": "message",
                "channel": "C1",
                "user": "U1",
                "text": "*[svc-a]* ℹ️  nightly export: 42 rows skipped"
            })))
            .with_status(200)
            .with_body("ok")
            .create();

        let mut notifier = Notifier::configure(&text_options_for(&server.url()));
        notifier.set_message("42 rows skipped").severity(Severity::Info);
        notifier.notify("nightly export");

        mock.assert();
        assert_eq!(notifier.last_response_status(), 200);
        assert_eq!(notifier.last_response_body(), b"ok");
    }

    #[test]
    fn test_text_payload_without_label() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/hook")
            .match_body(Matcher::PartialJson(json!({
                "text": "cache warmup: timed out"
            })))
            .with_status(200)
            .create();

        let options = text_options_for(&server.url()).with_label("");
        let mut notifier = Notifier::configure(&options);
        notifier.set_message("timed out");
        notifier.notify("cache warmup");

        mock.assert();
    }

    #[test]
    fn test_notifyf_formats_wrap_message() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/hook")
            .match_body(Matcher::PartialJson(json!({
                "text": "*[svc-a]* ⚠️  failed to load config.yaml: no such file"
            })))
            .with_status(200)
            .expect(2)
            .create();

        let mut notifier = Notifier::configure(&text_options_for(&server.url()));
        notifier.set_message("no such file").severity(Severity::Warning);
        notifyf!(notifier, "failed to load {}", "config.yaml");
        notifier.notify("failed to load config.yaml");

        mock.assert();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_attachment_only_in_first_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&mock_server)
            .await;

        let options = options_for(&mock_server.uri());
        tokio::task::spawn_blocking(move || {
            let mut notifier = Notifier::configure(&options);
            notifier.set_message("upload failed");
            notifier.set_attachment("request id: 7f3a");
            notifier.notify("s3 sync");
            notifier.notify("s3 sync");
        })
        .await
        .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let first = String::from_utf8_lossy(&requests[0].body).to_string();
        let second = String::from_utf8_lossy(&requests[1].body).to_string();

        assert!(first.contains("*Additional Data*\\nrequest id: 7f3a"));
        assert!(!second.contains("Additional Data"));
        assert!(!second.contains("request id: 7f3a"));
    }
}
