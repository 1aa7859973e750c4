use std::sync::Arc;

use crate::{
    domain::events::{BotEvent, InboundEvent},
    services::{ReferralLedger, UserRegistry},
    telegram::{types::ReplyKeyboardMarkup, Messenger},
};

pub mod contact;
pub mod referral;
pub mod start;

/// Routes classified events to their handler. Every failure is contained
/// within the event that caused it.
pub struct BotHandler {
    registry: UserRegistry,
    ledger: ReferralLedger,
    messenger: Arc<dyn Messenger>,
    bot_username: String,
}

impl BotHandler {
    pub fn new(
        registry: UserRegistry,
        ledger: ReferralLedger,
        messenger: Arc<dyn Messenger>,
        bot_username: String,
    ) -> Self {
        Self {
            registry,
            ledger,
            messenger,
            bot_username,
        }
    }

    pub async fn handle(&self, event: InboundEvent) {
        let InboundEvent {
            chat_id,
            sender,
            event,
        } = event;

        // Any interaction counts as first contact.
        self.registry.register(&sender).await;

        match event {
            BotEvent::Start { referral_code } => {
                start::handle_start(self, chat_id, referral_code.as_deref()).await
            }
            BotEvent::RequestContact => contact::request_contact(self, chat_id).await,
            BotEvent::ContactShared { phone_number } => {
                contact::save_contact(self, chat_id, sender.user_id, &phone_number).await
            }
            BotEvent::GenerateLink => referral::generate_link(self, chat_id, sender.user_id).await,
        }
    }

    pub(crate) async fn reply(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<ReplyKeyboardMarkup>,
    ) {
        if let Err(e) = self.messenger.send(chat_id, text, keyboard).await {
            tracing::warn!(chat_id, error = %e, "failed to send reply");
        }
    }
}
