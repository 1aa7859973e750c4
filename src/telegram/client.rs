use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Serialize};

use super::{
    types::{
        ApiResponse, GetUpdatesRequest, ReplyKeyboardMarkup, SendMessageRequest, Update, User,
    },
    Messenger,
};
use crate::{config::TelegramConfig, domain::errors::TransportError};

const API_BASE: &str = "https://api.telegram.org";

/// Headroom on top of the long-poll timeout before the HTTP request itself
/// is abandoned.
const REQUEST_GRACE: Duration = Duration::from_secs(10);

/// Thin JSON client for the Telegram Bot API.
#[derive(Clone)]
pub struct BotClient {
    client: Client,
    token: Secret<String>,
    api_base: String,
}

impl BotClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout) + REQUEST_GRACE)
            .build()
            .map_err(|e| TransportError::Http(e.without_url()))?;

        Ok(Self {
            client,
            token: config.bot_token.clone(),
            api_base: API_BASE.to_string(),
        })
    }

    /// Confirms the token is valid and returns the bot's own account.
    pub async fn get_me(&self) -> Result<User, TransportError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &request).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            reply_markup: keyboard,
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn call<Req, Res>(&self, method: &'static str, body: &Req) -> Result<Res, TransportError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        // The token is part of the path, so reqwest errors must drop the URL
        // before they can reach a log line.
        let url = format!(
            "{}/bot{}/{}",
            self.api_base,
            self.token.expose_secret(),
            method
        );

        let response: ApiResponse<Res> = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.without_url()))?
            .json()
            .await
            .map_err(|e| TransportError::Http(e.without_url()))?;

        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TransportError::Api {
                method,
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}

#[async_trait]
impl Messenger for BotClient {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<ReplyKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        self.send_message(chat_id, text, keyboard.as_ref()).await
    }
}
