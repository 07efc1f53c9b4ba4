//! Command handling module.
//!
//! One handler per chat command. Handlers are framework-independent:
//! they take parsed input plus injected collaborators, call the API
//! clients, and return plain reply values that the bot layer renders
//! into Telegram messages.

mod cat_facts;
mod github;
mod star_trek;
mod types;

pub use cat_facts::CatFactsHandler;
pub use github::GithubHandler;
pub use star_trek::{CALLBACK_NAMESPACE, StarTrekHandler};
pub use types::{Button, CallbackAction, CallbackParseError, Reply};
