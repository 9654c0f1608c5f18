//! Twilio sender - `DeliverySender` over the Twilio Messages API.
//!
//! Messages go out on the WhatsApp channel: both `To` and `From` carry the
//! configured channel prefix (`whatsapp:` by default) in front of the bare
//! E.164 number.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;

use crate::domain::messaging::Destination;
use crate::ports::{DeliveryError, DeliveryReceipt, DeliverySender};

pub const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com";
pub const DEFAULT_CHANNEL_PREFIX: &str = "whatsapp:";

/// Twilio account settings.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    auth_token: SecretString,
    /// The relay's own number; used as `From`.
    pub from: Destination,
    pub base_url: String,
    pub channel_prefix: String,
    pub timeout: Duration,
}

impl TwilioConfig {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from: Destination,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: SecretString::new(auth_token.into()),
            from,
            base_url: DEFAULT_TWILIO_BASE_URL.to_string(),
            channel_prefix: DEFAULT_CHANNEL_PREFIX.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_channel_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.channel_prefix = prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Delivers replies through Twilio.
pub struct TwilioSender {
    config: TwilioConfig,
    http_client: Client,
}

impl TwilioSender {
    pub fn new(config: TwilioConfig) -> Result<Self, DeliveryError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DeliveryError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url, self.config.account_sid
        )
    }

    fn form(&self, destination: &Destination, body: &str) -> [(&'static str, String); 3] {
        let prefix = &self.config.channel_prefix;
        [
            ("To", destination.with_channel(prefix)),
            ("From", self.config.from.with_channel(prefix)),
            ("Body", body.to_string()),
        ]
    }
}

#[async_trait]
impl DeliverySender for TwilioSender {
    async fn send(
        &self,
        destination: &Destination,
        body: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let response = self
            .http_client
            .post(self.messages_url())
            .basic_auth(
                &self.config.account_sid,
                Some(self.config.auth_token.expose_secret()),
            )
            .form(&self.form(destination, body))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    DeliveryError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                recipient = %destination,
                "Twilio rejected outbound message"
            );
            return Err(status_error(status, &text));
        }

        // A 2xx with an unreadable body was still accepted by Twilio.
        let receipt = match response.json::<MessageResource>().await {
            Ok(resource) => DeliveryReceipt::with_id(resource.sid),
            Err(_) => DeliveryReceipt::default(),
        };
        Ok(receipt)
    }
}

fn status_error(status: StatusCode, body: &str) -> DeliveryError {
    match status.as_u16() {
        401 | 403 => DeliveryError::AuthenticationFailed,
        429 => DeliveryError::RateLimited,
        500..=599 => DeliveryError::Unavailable(format!("Server error {}", status)),
        code => {
            let message = serde_json::from_str::<TwilioErrorBody>(body)
                .map(|e| match e.code {
                    Some(c) => format!("{} (code {})", e.message, c),
                    None => e.message,
                })
                .unwrap_or_else(|_| body.to_string());
            DeliveryError::Rejected {
                status: code,
                message,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<u32>,
    #[serde(default)]
    message: String,
}
