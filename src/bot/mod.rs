//! Telegram wiring via `teloxide`.
//!
//! Translates incoming commands and callback queries into handler
//! calls and renders handler replies back into Telegram messages.

mod dispatch;

pub use dispatch::{BotHandlers, Command, ConversationState, schema};
