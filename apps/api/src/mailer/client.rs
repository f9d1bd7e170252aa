/// Mail gateway client — the single point of entry for outbound email.
///
/// Wraps the SendGrid v3 send endpoint. Exactly one attempt per call:
/// delivery failures are the caller's to record and re-issue, which keeps
/// the at-least-once decision out of the transport layer.
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

const SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Transport failure. Absorbed by the dispatcher into the email log,
/// never escalated past the send it belongs to.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway returned status {status}: {message}")]
    Gateway { status: u16, message: String },
}

#[derive(Clone)]
pub struct MailClient {
    client: Client,
    api_key: String,
    sender: String,
}

impl MailClient {
    pub fn new(api_key: String, sender: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            sender,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Sends one HTML email. The gateway answers 202 on acceptance.
    pub async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.sender },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html_body }]
        });

        let response = self
            .client
            .post(SENDGRID_API_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Mail gateway accepted message to {to}");
        Ok(())
    }
}
