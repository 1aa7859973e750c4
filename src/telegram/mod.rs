use async_trait::async_trait;

use crate::domain::errors::TransportError;
use types::ReplyKeyboardMarkup;

pub mod client;
pub mod types;

/// Outbound half of the messaging transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<ReplyKeyboardMarkup>,
    ) -> Result<(), TransportError>;
}
