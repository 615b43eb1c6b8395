use async_trait::async_trait;
use awc::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::settings::MailSettings;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay credentials are not configured")]
    NotConfigured,

    #[error("mail relay request failed: {0}")]
    Transport(String),

    #[error("mail relay rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A message ready to hand to the relay.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait(?Send)]
pub trait Mailer: Send + Sync {
    /// The account messages are sent from, if one is configured.
    fn sender(&self) -> Option<&str>;

    /// Where contact submissions are delivered.
    fn recipient(&self) -> Option<&str>;

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Delivers mail by POSTing JSON to an HTTP relay with basic auth.
#[derive(Clone, Debug)]
pub struct RelayMailer {
    settings: MailSettings,
}

impl RelayMailer {
    pub fn new(settings: MailSettings) -> Self {
        install_crypto_provider();
        RelayMailer { settings }
    }
}

/// awc's rustls connector needs a process-level provider before the first
/// client is built. Later calls are no-ops.
pub fn install_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}

#[async_trait(?Send)]
impl Mailer for RelayMailer {
    fn sender(&self) -> Option<&str> {
        self.settings.user.as_deref()
    }

    fn recipient(&self) -> Option<&str> {
        self.settings.recipient.as_deref()
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let (Some(user), Some(pass)) = (&self.settings.user, &self.settings.pass) else {
            return Err(MailError::NotConfigured);
        };

        let client = Client::builder().timeout(self.settings.timeout).finish();
        let mut response = client
            .post(&self.settings.relay_url)
            .basic_auth(user, pass)
            .send_json(mail)
            .await
            .map_err(|error| MailError::Transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Mail relay accepted message");
            return Ok(());
        }

        let body = match response.body().await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(error) => format!("<unreadable body: {}>", error),
        };
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
