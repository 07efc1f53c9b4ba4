//! Dispatcher schema and endpoint functions.

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId};
use teloxide::utils::command::BotCommands;
use tracing::{debug, warn};

use crate::commands::{
    Button, CALLBACK_NAMESPACE, CallbackAction, CallbackParseError, CatFactsHandler,
    GithubHandler, Reply, StarTrekHandler,
};

/// All feature handlers, shared across dispatcher endpoints.
pub struct BotHandlers {
    pub cat_facts: CatFactsHandler,
    pub github: GithubHandler,
    pub star_trek: StarTrekHandler,
}

/// Chat commands exposed by the bot.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "show this help message")]
    Help,
    #[command(description = "start talking to the bot")]
    Start,
    #[command(description = "get 1-10 random cat facts: /catfacts [n]")]
    Catfacts(String),
    #[command(description = "latest commit of the tracked repository")]
    Github,
    #[command(description = "alias for /github")]
    Gh,
    #[command(description = "search Star Trek movies")]
    Startrek,
    #[command(description = "alias for /startrek")]
    Stmovies,
}

/// Per-chat conversation state used for free-text follow-ups.
#[derive(Debug, Clone, Default)]
pub enum ConversationState {
    /// No follow-up input expected.
    #[default]
    Idle,

    /// The next text message is a movie title for the info action.
    AwaitingMovieTitle,
}

type BotDialogue = Dialogue<ConversationState, InMemStorage<ConversationState>>;
type HandlerResult = anyhow::Result<()>;

/// Builds the dispatcher schema: commands, callback queries and the
/// movie-title follow-up.
#[must_use]
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let message_handler = Update::filter_message()
        .branch(teloxide::filter_command::<Command, _>().endpoint(handle_command))
        .branch(
            dptree::case![ConversationState::AwaitingMovieTitle].endpoint(receive_movie_title),
        );

    dialogue::enter::<Update, InMemStorage<ConversationState>, ConversationState, _>()
        .branch(message_handler)
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    handlers: Arc<BotHandlers>,
) -> HandlerResult {
    match cmd {
        Command::Help | Command::Start => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Catfacts(arg) => {
            let arg = arg.trim();
            let text = handlers
                .cat_facts
                .handle(if arg.is_empty() { None } else { Some(arg) })
                .await;
            bot.send_message(msg.chat.id, text).await?;
        }
        Command::Github | Command::Gh => {
            let text = handlers.github.handle().await;
            bot.send_message(msg.chat.id, text).await?;
        }
        Command::Startrek | Command::Stmovies => {
            send_reply(&bot, msg.chat.id, handlers.star_trek.menu()).await?;
        }
    }

    Ok(())
}

async fn handle_callback(
    bot: Bot,
    query: CallbackQuery,
    dialogue: BotDialogue,
    handlers: Arc<BotHandlers>,
) -> HandlerResult {
    let Some(message) = query.message.clone() else {
        bot.answer_callback_query(query.id).await?;
        return Ok(());
    };
    let chat_id = message.chat.id;

    let action = match query
        .data
        .as_deref()
        .map(|data| CallbackAction::parse(CALLBACK_NAMESPACE, data))
    {
        Some(Ok(action)) => action,
        Some(Err(CallbackParseError::ForeignNamespace)) | None => {
            debug!("Ignoring callback from another namespace");
            bot.answer_callback_query(query.id).await?;
            return Ok(());
        }
        Some(Err(e)) => {
            warn!("Rejected malformed callback data: {}", e);
            bot.answer_callback_query(query.id)
                .text(e.to_string())
                .await?;
            return Ok(());
        }
    };

    match action {
        CallbackAction::List => {
            let reply = handlers.star_trek.list(chat_id.0).await;
            send_reply(&bot, chat_id, reply).await?;
            bot.answer_callback_query(query.id).await?;
        }
        CallbackAction::Info => {
            bot.send_message(chat_id, StarTrekHandler::INFO_PROMPT)
                .await?;
            dialogue
                .update(ConversationState::AwaitingMovieTitle)
                .await?;
            bot.answer_callback_query(query.id).await?;
        }
        CallbackAction::Page(page) => {
            match handlers.star_trek.change_page(chat_id.0, page).await {
                Some(reply) => {
                    edit_reply(&bot, chat_id, message.id, reply).await?;
                    bot.answer_callback_query(query.id).await?;
                }
                None => {
                    bot.answer_callback_query(query.id)
                        .text(StarTrekHandler::STALE_SESSION)
                        .await?;
                }
            }
        }
    }

    Ok(())
}

async fn receive_movie_title(
    bot: Bot,
    msg: Message,
    dialogue: BotDialogue,
    handlers: Arc<BotHandlers>,
) -> HandlerResult {
    let Some(title) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send the movie title as plain text.")
            .await?;
        return Ok(());
    };

    let info = handlers.star_trek.movie_info(title).await;
    bot.send_message(msg.chat.id, info).await?;
    dialogue.exit().await?;

    Ok(())
}

/// Sends a handler reply as a new message.
async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> HandlerResult {
    let request = bot.send_message(chat_id, reply.text);
    match reply.keyboard {
        Some(keyboard) => request.reply_markup(keyboard_markup(&keyboard)).await?,
        None => request.await?,
    };

    Ok(())
}

/// Applies a handler reply to an existing message in place.
async fn edit_reply(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    reply: Reply,
) -> HandlerResult {
    let request = bot.edit_message_text(chat_id, message_id, reply.text);
    match reply.keyboard {
        Some(keyboard) => request.reply_markup(keyboard_markup(&keyboard)).await?,
        None => request.await?,
    };

    Ok(())
}

/// Converts a handler keyboard into Telegram inline markup.
fn keyboard_markup(rows: &[Vec<Button>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.data.clone()))
            .collect::<Vec<_>>()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_keyboard_markup_preserves_layout() {
        let rows = vec![vec![
            Button::new("Back", CALLBACK_NAMESPACE, &CallbackAction::Page(0)),
            Button::new("Next", CALLBACK_NAMESPACE, &CallbackAction::Page(2)),
        ]];

        let markup = keyboard_markup(&rows);
        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "Back");
        assert_eq!(
            markup.inline_keyboard[0][1].kind,
            InlineKeyboardButtonKind::CallbackData("startrek:page_2".to_owned())
        );
    }

    #[test]
    fn test_command_descriptions_render() {
        let descriptions = Command::descriptions().to_string();
        assert!(descriptions.contains("/catfacts"));
        assert!(descriptions.contains("/startrek"));
    }
}
