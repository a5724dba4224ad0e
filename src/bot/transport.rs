/// Chat transport abstraction
///
/// The engine produces views; the transport turns them into Bot API calls.
/// The trait seam keeps dispatch testable and the notification fan-out
/// independent of the webhook surface.
use crate::{
    bot::view::View,
    error::{AppError, AppResult},
};
use reqwest::Client as HttpClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Delivers a view as a fresh message
    async fn send(&self, chat_id: i64, view: &View) -> AppResult<()>;

    /// Replaces an existing message in place. Implementations fall back to
    /// a fresh send when the target no longer supports editing (e.g. a
    /// photo message being replaced by text); that fallback is never
    /// surfaced as an error.
    async fn edit(&self, chat_id: i64, message_id: i64, view: &View) -> AppResult<()>;

    /// Short inline acknowledgement of a button press
    async fn toast(&self, callback_id: &str, text: &str) -> AppResult<()>;
}

/// Telegram Bot API transport
#[derive(Clone)]
pub struct TelegramTransport {
    http_client: HttpClient,
    token: String,
    api_url: String,
}

impl TelegramTransport {
    pub fn new(http_client: HttpClient, token: String, api_url: String) -> Self {
        Self {
            http_client,
            token,
            api_url,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "Bot API {} returned status {}: {}",
                method, status, text
            )));
        }

        Ok(())
    }

    async fn try_edit(&self, chat_id: i64, message_id: i64, view: &View) -> AppResult<()> {
        match &view.photo_url {
            Some(photo) => {
                self.call(
                    "editMessageMedia",
                    serde_json::json!({
                        "chat_id": chat_id,
                        "message_id": message_id,
                        "media": { "type": "photo", "media": photo, "caption": view.text },
                        "reply_markup": view.reply_markup(),
                    }),
                )
                .await
            }
            None => {
                self.call(
                    "editMessageText",
                    serde_json::json!({
                        "chat_id": chat_id,
                        "message_id": message_id,
                        "text": view.text,
                        "reply_markup": view.reply_markup(),
                    }),
                )
                .await
            }
        }
    }
}

#[async_trait::async_trait]
impl ChatTransport for TelegramTransport {
    async fn send(&self, chat_id: i64, view: &View) -> AppResult<()> {
        match &view.photo_url {
            Some(photo) => {
                self.call(
                    "sendPhoto",
                    serde_json::json!({
                        "chat_id": chat_id,
                        "photo": photo,
                        "caption": view.text,
                        "reply_markup": view.reply_markup(),
                    }),
                )
                .await
            }
            None => {
                self.call(
                    "sendMessage",
                    serde_json::json!({
                        "chat_id": chat_id,
                        "text": view.text,
                        "reply_markup": view.reply_markup(),
                    }),
                )
                .await
            }
        }
    }

    async fn edit(&self, chat_id: i64, message_id: i64, view: &View) -> AppResult<()> {
        if let Err(e) = self.try_edit(chat_id, message_id, view).await {
            // A message can stop being editable (text vs media, too old,
            // already replaced). Degrade to a fresh send.
            tracing::debug!(chat_id, message_id, error = %e, "Edit failed, sending fresh message");
            return self.send(chat_id, view).await;
        }
        Ok(())
    }

    async fn toast(&self, callback_id: &str, text: &str) -> AppResult<()> {
        self.call(
            "answerCallbackQuery",
            serde_json::json!({
                "callback_query_id": callback_id,
                "text": text,
            }),
        )
        .await
    }
}
