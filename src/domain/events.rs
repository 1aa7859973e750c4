use super::fields::{NewUser, PhoneNumber, Username};
use crate::telegram::types::Message;

pub const SHARE_CONTACT_LABEL: &str = "share contact";
pub const GENERATE_LINK_LABEL: &str = "generate link";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BotEvent {
    Start { referral_code: Option<String> },
    RequestContact,
    GenerateLink,
    ContactShared { phone_number: PhoneNumber },
}

/// A classified inbound message together with who sent it and where to reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: i64,
    pub sender: NewUser,
    pub event: BotEvent,
}

impl InboundEvent {
    /// Returns `None` for messages the bot does not react to: no sender,
    /// unknown commands and free text other than the menu buttons.
    pub fn from_message(message: &Message) -> Option<Self> {
        let from = message.from.as_ref()?;
        let event = classify(message)?;

        Some(Self {
            chat_id: message.chat.id,
            sender: NewUser {
                user_id: from.id,
                username: from
                    .username
                    .clone()
                    .filter(|u| !u.is_empty())
                    .map(Username::from),
                first_name: Some(from.first_name.clone()).filter(|n| !n.is_empty()),
                last_name: from.last_name.clone().filter(|n| !n.is_empty()),
            },
            event,
        })
    }
}

fn classify(message: &Message) -> Option<BotEvent> {
    if let Some((command, args)) = message.text.as_deref().and_then(parse_command) {
        return match command {
            "start" => Some(BotEvent::Start {
                referral_code: (!args.is_empty()).then(|| args.to_owned()),
            }),
            _ => None,
        };
    }

    if let Some(contact) = &message.contact {
        return Some(BotEvent::ContactShared {
            phone_number: contact.phone_number.clone().into(),
        });
    }

    match message.text.as_deref()? {
        SHARE_CONTACT_LABEL => Some(BotEvent::RequestContact),
        GENERATE_LINK_LABEL => Some(BotEvent::GenerateLink),
        _ => None,
    }
}

/// Splits `/name@bot args` into `("name", "args")`.
fn parse_command(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let command = head.split('@').next().unwrap_or(head);
    if command.is_empty() {
        return None;
    }
    Some((command, args.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn message(body: serde_json::Value) -> Message {
        serde_json::from_value(body).expect("valid message json")
    }

    fn text_message(text: &str) -> Message {
        message(json!({
            "message_id": 1,
            "from": { "id": 42, "is_bot": false, "first_name": "Ann", "username": "ann" },
            "chat": { "id": 4200 },
            "text": text
        }))
    }

    #[rstest]
    #[case("/start", BotEvent::Start { referral_code: None })]
    #[case("/start aZ3kP9qL", BotEvent::Start { referral_code: Some("aZ3kP9qL".into()) })]
    #[case("/start@ReferralBot aZ3kP9qL", BotEvent::Start { referral_code: Some("aZ3kP9qL".into()) })]
    #[case("/start   ", BotEvent::Start { referral_code: None })]
    #[case("share contact", BotEvent::RequestContact)]
    #[case("generate link", BotEvent::GenerateLink)]
    fn classifies_commands_and_buttons(#[case] text: &str, #[case] expected: BotEvent) {
        let event = InboundEvent::from_message(&text_message(text)).expect("handled");

        assert_eq!(event.event, expected);
        assert_eq!(event.chat_id, 4200);
        assert_eq!(event.sender.user_id, 42);
        assert_eq!(event.sender.username, Some(Username::from("ann".to_string())));
        assert_eq!(event.sender.first_name.as_deref(), Some("Ann"));
        assert_eq!(event.sender.last_name, None);
    }

    #[rstest]
    #[case("/help")]
    #[case("/")]
    #[case("hello there")]
    #[case("Generate Link")]
    fn ignores_unknown_input(#[case] text: &str) {
        assert_eq!(InboundEvent::from_message(&text_message(text)), None);
    }

    #[test]
    fn contact_share_carries_phone_number() {
        let msg = message(json!({
            "message_id": 2,
            "from": { "id": 42, "is_bot": false, "first_name": "Ann" },
            "chat": { "id": 4200 },
            "contact": { "phone_number": "+15550100", "first_name": "Ann", "user_id": 42 }
        }));

        let event = InboundEvent::from_message(&msg).expect("handled");

        assert_eq!(
            event.event,
            BotEvent::ContactShared {
                phone_number: "+15550100".to_string().into()
            }
        );
        assert_eq!(event.sender.username, None);
    }

    #[test]
    fn empty_names_are_stored_as_missing() {
        let msg = message(json!({
            "message_id": 4,
            "from": { "id": 42, "is_bot": false, "first_name": "", "last_name": "" },
            "chat": { "id": 4200 },
            "text": "/start"
        }));

        let event = InboundEvent::from_message(&msg).expect("handled");

        assert_eq!(event.sender.first_name, None);
        assert_eq!(event.sender.last_name, None);
    }

    #[test]
    fn messages_without_sender_are_ignored() {
        let msg = message(json!({
            "message_id": 3,
            "chat": { "id": -100 },
            "text": "/start"
        }));

        assert_eq!(InboundEvent::from_message(&msg), None);
    }
}
