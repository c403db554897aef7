use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bot::{BotCommand, CommandOption, Embed, Reply};

use super::AppState;

pub const PING: u8 = 1;
pub const APPLICATION_COMMAND: u8 = 2;
pub const PONG: u8 = 1;
pub const CHANNEL_MESSAGE: u8 = 4;
pub const EPHEMERAL: u64 = 1 << 6;

#[derive(Debug, Deserialize)]
pub struct InteractionUser {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct Member {
    pub user: InteractionUser,
}

#[derive(Debug, Deserialize)]
pub struct InteractionData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

/// Interaction as relayed from the chat platform. Guild interactions carry
/// the user under `member`, direct messages under `user`.
#[derive(Debug, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub data: Option<InteractionData>,
    #[serde(default)]
    pub member: Option<Member>,
    #[serde(default)]
    pub user: Option<InteractionUser>,
}

impl Interaction {
    pub fn user_id(&self) -> Option<&str> {
        self.member
            .as_ref()
            .map(|m| &m.user)
            .or(self.user.as_ref())
            .map(|u| u.id.as_str())
            .filter(|id| !id.trim().is_empty())
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ResponseData {
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: PONG,
            data: None,
        }
    }
}

impl From<Reply> for InteractionResponse {
    fn from(reply: Reply) -> Self {
        Self {
            kind: CHANNEL_MESSAGE,
            data: Some(ResponseData {
                embeds: reply.embeds,
                flags: reply.ephemeral.then_some(EPHEMERAL),
            }),
        }
    }
}

#[derive(Debug)]
pub enum InteractionError {
    Unauthorized,
    BadRequest(String),
}

impl IntoResponse for InteractionError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            InteractionError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "invalid relay token".to_owned())
            }
            InteractionError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
        };

        (status, Json(json!({ "error": error }))).into_response()
    }
}

fn authorize(expected: Option<&str>, headers: &HeaderMap) -> Result<(), InteractionError> {
    let Some(expected) = expected.filter(|t| !t.is_empty()) else {
        return Ok(());
    };

    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match provided {
        Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => Err(InteractionError::Unauthorized),
    }
}

/// Compares every byte so the time taken does not reveal the matching prefix.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// POST /interactions
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionResponse>, InteractionError> {
    authorize(state.config.bot.relay_token.as_deref(), &headers)?;

    let interaction: Interaction = serde_json::from_slice(&body)
        .map_err(|e| InteractionError::BadRequest(format!("malformed interaction: {e}")))?;

    match interaction.kind {
        PING => Ok(Json(InteractionResponse::pong())),
        APPLICATION_COMMAND => {
            let user_id = interaction
                .user_id()
                .ok_or_else(|| InteractionError::BadRequest("missing user".to_owned()))?;
            let data = interaction
                .data
                .as_ref()
                .ok_or_else(|| InteractionError::BadRequest("missing command data".to_owned()))?;

            let command = BotCommand::parse(&data.name, &data.options)
                .map_err(|e| InteractionError::BadRequest(e.to_string()))?;

            tracing::info!(command = command.name(), user_id, "interaction received");

            let reply = state.bot.handle(user_id, command).await;

            Ok(Json(reply.into()))
        }
        other => Err(InteractionError::BadRequest(format!(
            "unsupported interaction type {other}"
        ))),
    }
}
