//! Transport-facing boundary for the Ragout document-chat bot.
//!
//! The chat transport delivers three event kinds (a document upload, a
//! question, and a reset request) and forwards whatever reply string it
//! gets back. This crate turns those events into pipeline calls: extracted
//! document text is ingested under the user's namespace, questions are
//! answered from the user's stored chunks, and every pipeline error is
//! translated into user-facing text instead of crashing the serving loop.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragout_service::{BotEvent, Settings, telemetry};
//!
//! telemetry::init();
//! let service = Settings::from_env()?.build_service()?;
//!
//! let reply = service
//!     .handle(BotEvent::QuestionAsked {
//!         namespace: user_id,
//!         text: message_text,
//!     })
//!     .await;
//! ```

pub mod event;
pub mod extract;
pub mod service;
pub mod settings;
pub mod telemetry;

pub use event::BotEvent;
pub use extract::{PlainTextExtractor, TextExtractor};
pub use service::{BotService, HELP_REPLY, WELCOME_REPLY};
pub use settings::Settings;
