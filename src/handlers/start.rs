use super::BotHandler;
use crate::{
    domain::events::{GENERATE_LINK_LABEL, SHARE_CONTACT_LABEL},
    telegram::types::{KeyboardButton, ReplyKeyboardMarkup},
};

pub(crate) const WELCOME_TEXT: &str = "Welcome! Choose an action:";

pub(crate) fn main_menu() -> ReplyKeyboardMarkup {
    ReplyKeyboardMarkup::single_row(vec![
        KeyboardButton::contact(SHARE_CONTACT_LABEL),
        KeyboardButton::text(GENERATE_LINK_LABEL),
    ])
}

pub(crate) async fn handle_start(bot: &BotHandler, chat_id: i64, referral_code: Option<&str>) {
    if let Some(code) = referral_code {
        announce_inviter(bot, chat_id, code).await;
    }

    bot.reply(chat_id, WELCOME_TEXT, Some(main_menu())).await;
}

/// Attribution is best effort: unknown codes and lookup failures fall
/// through to the plain welcome.
async fn announce_inviter(bot: &BotHandler, chat_id: i64, code: &str) {
    match bot.ledger.resolve_code(code).await {
        Ok(Some(inviter)) => {
            tracing::info!(chat_id, inviter_id = inviter.user_id, "referral resolved");
            let notice = format!("Invited by {}", inviter.display_name());
            bot.reply(chat_id, &notice, None).await;
        }
        Ok(None) => tracing::debug!(chat_id, code, "unknown referral code"),
        Err(e) => tracing::error!(chat_id, "resolving referral code failed >>> {}", e),
    }
}
