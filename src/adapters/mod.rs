//! Adapters - implementations of the ports plus the HTTP surface.
//!
//! - `ai` - reply generation (OpenAI Responses API, mock)
//! - `twilio` - WhatsApp delivery (Twilio, mock)
//! - `postgres` - durable message and user storage
//! - `memory` - in-process storage for tests and database-less runs
//! - `http` - axum routes

pub mod ai;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod twilio;
