//! Delivery adapters for the Twilio WhatsApp channel.

mod mock_sender;
mod twilio_sender;

pub use mock_sender::{MockDeliverySender, SentMessage};
pub use twilio_sender::{
    TwilioConfig, TwilioSender, DEFAULT_CHANNEL_PREFIX, DEFAULT_TWILIO_BASE_URL,
};
