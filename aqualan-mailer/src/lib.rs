//! Notifier implementations for order and offer emails.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, info};

use aqualan_core::mail::EmailMessage;
use aqualan_core::ports::{Notifier, PortError};

/// Sender used when none is configured.
pub const DEFAULT_FROM: &str = "pedidos@aqualan.es";

/// JSON body accepted by transactional email APIs such as Resend.
#[derive(Debug, Serialize)]
struct SendEmailBody<'msg> {
    from: &'msg str,
    to: &'msg [String],
    subject: &'msg str,
    html: &'msg str,
    text: &'msg str,
}

/// Sends email through an HTTP API with a bearer token.
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    /// Mailer posting to `endpoint`.
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            from: DEFAULT_FROM.to_owned(),
        }
    }

    /// Use `from` as the sender address.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    fn build_request(&self, message: &EmailMessage) -> RequestBuilder {
        let body = SendEmailBody {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };
        let req = self.client.post(&self.endpoint).json(&body);
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), PortError> {
        let resp = self.build_request(message).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(PortError::Notifier(format!(
                "email API answered {status}: {detail}"
            )));
        }
        debug!(to = ?message.to, subject = %message.subject, "email sent");
        Ok(())
    }
}

/// Writes emails to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Notifier for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), PortError> {
        info!(to = ?message.to, subject = %message.subject, "email not configured, logging only");
        debug!(body = %message.text, "email body");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: vec!["ane@example.com".to_owned()],
            subject: "Aqualan - Pedido #3f2b8c1e recibido".to_owned(),
            html: "<p>Gracias</p>".to_owned(),
            text: "Gracias".to_owned(),
        }
    }

    #[test]
    fn request_carries_token_and_payload() {
        let mailer = HttpMailer::new(
            Client::new(),
            "https://api.resend.com/emails",
            Some("re_test".to_owned()),
        )
        .with_from("Aqualan <pedidos@aqualan.es>");

        let request = mailer.build_request(&message()).build().expect("request");
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://api.resend.com/emails");
        assert_eq!(
            request.headers().get("authorization").and_then(|value| value.to_str().ok()),
            Some("Bearer re_test")
        );

        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .expect("buffered body");
        let payload: Value = serde_json::from_slice(body).expect("json");
        assert_eq!(
            payload,
            json!({
                "from": "Aqualan <pedidos@aqualan.es>",
                "to": ["ane@example.com"],
                "subject": "Aqualan - Pedido #3f2b8c1e recibido",
                "html": "<p>Gracias</p>",
                "text": "Gracias",
            })
        );
    }

    #[test]
    fn request_without_key_has_no_auth_header() {
        let mailer = HttpMailer::new(Client::new(), "http://localhost:9/send", None);
        let request = mailer.build_request(&message()).build().expect("request");
        assert!(request.headers().get("authorization").is_none());
        assert!(request.body().and_then(reqwest::Body::as_bytes).is_some_and(|body| {
            serde_json::from_slice::<Value>(body)
                .is_ok_and(|payload| payload["from"] == DEFAULT_FROM)
        }));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        assert!(LogMailer.send(&message()).await.is_ok());
    }
}
