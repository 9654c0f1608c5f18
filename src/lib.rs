//! Chat Relay - WhatsApp webhook relay with per-user message batching
//!
//! Inbound messages are collected per user until the user goes quiet for the
//! debounce window, then answered with a single generated reply delivered
//! back over the same channel.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
