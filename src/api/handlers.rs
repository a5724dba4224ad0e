/// Webhook entry point
///
/// Telegram retries any non-2xx delivery, so the webhook acknowledges
/// every authenticated update with 200 regardless of what happened while
/// handling it. Failures are logged and answered to the user in-band.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::bot::{dispatch, handlers, handlers::CommandReply, payload::Action, view};

use super::AppState;

// Incoming update wire types; only the fields the bot reads

#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub message_id: i64,
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: TelegramUser,
    pub message: Option<IncomingMessage>,
    pub data: Option<String>,
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn webhook(
    State(state): State<AppState>,
    Path(secret): Path<String>,
    Json(update): Json<TelegramUpdate>,
) -> StatusCode {
    if secret != *state.webhook_secret {
        tracing::warn!(update_id = update.update_id, "Webhook secret mismatch");
        return StatusCode::FORBIDDEN;
    }

    if let Some(callback) = update.callback_query {
        handle_callback(&state, callback).await;
    } else if let Some(message) = update.message {
        handle_message(&state, message).await;
    }

    StatusCode::OK
}

async fn handle_message(state: &AppState, message: IncomingMessage) {
    let Some(text) = message.text else {
        return;
    };
    let chat_id = message.chat.id;
    let user_id = message.from.as_ref().map(|u| u.id).unwrap_or(chat_id);
    let first_name = message
        .from
        .as_ref()
        .map(|u| u.first_name.as_str())
        .unwrap_or("there");

    if !state.limiter.allow(user_id).await {
        tracing::debug!(user_id, "Message dropped by rate limiter");
        return;
    }

    tracing::info!(user_id, text = %text, "Command received");

    let reply = match handlers::handle_command(&text, first_name) {
        Some(CommandReply::Show(view)) => Some(view),
        Some(CommandReply::Act(action)) => match dispatch(&state.deps, user_id, action).await {
            Ok(outcome) => outcome.view,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Command dispatch failed");
                Some(view::error_view())
            }
        },
        // Free text and unknown commands get the menu
        None => Some(view::main_menu()),
    };

    if let Some(view) = reply {
        if let Err(e) = state.transport.send(chat_id, &view).await {
            tracing::error!(user_id, error = %e, "Failed to send reply");
        }
    }
}

async fn handle_callback(state: &AppState, callback: CallbackQuery) {
    let user_id = callback.from.id;
    let chat_id = callback
        .message
        .as_ref()
        .map(|m| m.chat.id)
        .unwrap_or(user_id);
    let message_id = callback.message.as_ref().map(|m| m.message_id);

    if !state.limiter.allow(user_id).await {
        answer(state, &callback.id, "Slow down! Try again in a moment.").await;
        return;
    }

    let action = match callback.data.as_deref().map(Action::parse) {
        Some(Ok(action)) => action,
        Some(Err(e)) => {
            tracing::warn!(user_id, data = ?callback.data, error = %e, "Bad callback payload");
            answer(state, &callback.id, "Unsupported action").await;
            return;
        }
        None => {
            answer(state, &callback.id, "").await;
            return;
        }
    };

    tracing::debug!(user_id, action = ?action, "Callback received");

    match dispatch(&state.deps, user_id, action).await {
        Ok(outcome) => {
            // Every callback must be answered or the client keeps spinning
            answer(state, &callback.id, outcome.toast.as_deref().unwrap_or("")).await;
            if let Some(view) = outcome.view {
                let delivery = match message_id {
                    Some(message_id) => state.transport.edit(chat_id, message_id, &view).await,
                    None => state.transport.send(chat_id, &view).await,
                };
                if let Err(e) = delivery {
                    tracing::error!(user_id, error = %e, "Failed to update message");
                }
            }
        }
        Err(e) => {
            tracing::error!(user_id, error = %e, "Callback dispatch failed");
            answer(state, &callback.id, "Something went wrong. Please try again.").await;
        }
    }
}

async fn answer(state: &AppState, callback_id: &str, text: &str) {
    if let Err(e) = state.transport.toast(callback_id, text).await {
        tracing::warn!(error = %e, "Failed to answer callback");
    }
}
