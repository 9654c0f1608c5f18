//! Twilio messaging configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::messaging::Destination;

/// Twilio account and WhatsApp channel settings
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioAccountConfig {
    /// Account SID (starts with `AC`)
    #[serde(default)]
    pub account_sid: String,

    /// Auth token
    #[serde(default)]
    pub auth_token: String,

    /// The relay's own WhatsApp number
    #[serde(default)]
    pub whatsapp_number: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Address prefix for the channel
    #[serde(default = "default_channel_prefix")]
    pub channel_prefix: String,
}

impl TwilioAccountConfig {
    /// The relay's number as a destination
    pub fn relay_number(&self) -> Result<Destination, ValidationError> {
        Destination::parse(&self.whatsapp_number)
            .map_err(|e| ValidationError::InvalidWhatsappNumber(e.to_string()))
    }

    /// Validate Twilio configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.account_sid.is_empty() {
            return Err(ValidationError::MissingRequired("TWILIO__ACCOUNT_SID"));
        }
        if self.auth_token.is_empty() {
            return Err(ValidationError::MissingRequired("TWILIO__AUTH_TOKEN"));
        }
        if self.whatsapp_number.is_empty() {
            return Err(ValidationError::MissingRequired("TWILIO__WHATSAPP_NUMBER"));
        }
        if !self.account_sid.starts_with("AC") {
            return Err(ValidationError::InvalidAccountSid);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl("twilio"));
        }
        self.relay_number()?;
        Ok(())
    }
}

impl Default for TwilioAccountConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            whatsapp_number: String::new(),
            base_url: default_base_url(),
            channel_prefix: default_channel_prefix(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_channel_prefix() -> String {
    "whatsapp:".to_string()
}
