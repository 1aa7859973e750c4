use super::BotHandler;

pub(crate) async fn generate_link(bot: &BotHandler, chat_id: i64, user_id: i64) {
    let code = match bot.ledger.create_code(user_id).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(user_id, "generating referral link failed >>> {}", e);
            return;
        }
    };

    let link = format!("https://t.me/{}?start={}", bot.bot_username, code);
    bot.reply(chat_id, &format!("Your referral link: {}", link), None)
        .await;
}
