//! The subset of the Bot API object model this bot reads and writes.

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Message {
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub contact: Option<Contact>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Chat {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Contact {
    pub phone_number: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub request_contact: bool,
}

impl KeyboardButton {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            request_contact: false,
        }
    }

    pub fn contact(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            request_contact: true,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
}

impl ReplyKeyboardMarkup {
    pub fn single_row(buttons: Vec<KeyboardButton>) -> Self {
        Self {
            keyboard: vec![buttons],
        }
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Serialize, Debug)]
pub(crate) struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a ReplyKeyboardMarkup>,
}
