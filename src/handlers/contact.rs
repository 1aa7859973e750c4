use super::BotHandler;
use crate::{
    domain::{events::SHARE_CONTACT_LABEL, fields::PhoneNumber},
    telegram::types::{KeyboardButton, ReplyKeyboardMarkup},
};

pub(crate) const CONTACT_PROMPT_TEXT: &str =
    "Please share your contact by pressing the button below.";
pub(crate) const CONTACT_SAVED_TEXT: &str = "Contact saved successfully!";

pub(crate) async fn request_contact(bot: &BotHandler, chat_id: i64) {
    let keyboard =
        ReplyKeyboardMarkup::single_row(vec![KeyboardButton::contact(SHARE_CONTACT_LABEL)]);
    bot.reply(chat_id, CONTACT_PROMPT_TEXT, Some(keyboard)).await;
}

pub(crate) async fn save_contact(
    bot: &BotHandler,
    chat_id: i64,
    user_id: i64,
    phone_number: &PhoneNumber,
) {
    match bot.registry.attach_phone(user_id, phone_number).await {
        Ok(_) => bot.reply(chat_id, CONTACT_SAVED_TEXT, None).await,
        Err(e) => tracing::error!(user_id, "saving contact failed >>> {}", e),
    }
}
