//! HTTP endpoint receiving Discord interactions

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::application::errors::{BotError, ConfigError};
use crate::application::messaging::{CommandDispatcher, Invocation, Reply};
use crate::domain::entities::User;

const SIGNATURE_HEADER: &str = "x-signature-ed25519";
const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

const PING: u8 = 1;
const APPLICATION_COMMAND: u8 = 2;

const PONG: u8 = 1;
const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
const EPHEMERAL: u64 = 1 << 6;

/// Checks request signatures against the application's public key
#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    key: VerifyingKey,
}

impl InteractionVerifier {
    pub fn from_hex(public_key: &str) -> Result<Self, ConfigError> {
        let bytes: [u8; 32] = hex::decode(public_key.trim())
            .ok()
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| ConfigError::InvalidValue("public key must be 32 hex-encoded bytes".to_string()))?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| ConfigError::InvalidValue(format!("public key: {}", e)))?;
        Ok(Self { key })
    }

    pub fn from_key(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// The signed message is the timestamp header followed by the raw body.
    pub fn verify(&self, signature_hex: &str, timestamp: &str, body: &[u8]) -> bool {
        let Some(bytes) = hex::decode(signature_hex)
            .ok()
            .and_then(|b| <[u8; 64]>::try_from(b).ok())
        else {
            return false;
        };
        let signature = Signature::from_bytes(&bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);
        self.key.verify(&message, &signature).is_ok()
    }
}

#[derive(Debug, Deserialize)]
struct Interaction {
    #[serde(rename = "type")]
    kind: u8,
    data: Option<CommandData>,
    member: Option<Member>,
    user: Option<DiscordUser>,
}

#[derive(Debug, Deserialize)]
struct CommandData {
    name: String,
    #[serde(default)]
    options: Vec<CommandDataOption>,
}

#[derive(Debug, Deserialize)]
struct CommandDataOption {
    name: String,
    value: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Member {
    user: Option<DiscordUser>,
}

#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
    username: Option<String>,
}

impl Interaction {
    /// Guild interactions carry the caller under `member`, DMs under `user`
    fn caller(&self) -> Option<User> {
        let user = self
            .member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())?;
        let caller = User::new(user.id.clone());
        Some(match &user.username {
            Some(name) => caller.with_username(name.clone()),
            None => caller,
        })
    }
}

/// Shared state behind the interactions route
pub struct InteractionServer {
    verifier: InteractionVerifier,
    dispatcher: CommandDispatcher,
}

impl InteractionServer {
    pub fn new(verifier: InteractionVerifier, dispatcher: CommandDispatcher) -> Self {
        Self {
            verifier,
            dispatcher,
        }
    }

    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/interactions", post(interactions))
            .with_state(self)
    }

    pub async fn serve(self: Arc<Self>, addr: SocketAddr) -> Result<(), BotError> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| BotError::Network(format!("Failed to bind {}: {}", addr, e)))?;
        tracing::info!("Listening for interactions on http://{}/interactions", addr);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| BotError::Network(e.to_string()))
    }

    /// Verify, decode and answer one interaction request
    pub async fn handle(&self, headers: &HeaderMap, body: &[u8]) -> (StatusCode, Value) {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        let (Some(signature), Some(timestamp)) = (header(SIGNATURE_HEADER), header(TIMESTAMP_HEADER)) else {
            return (StatusCode::UNAUTHORIZED, json!({ "error": "missing signature" }));
        };
        if !self.verifier.verify(signature, timestamp, body) {
            tracing::warn!("Rejected interaction with invalid signature");
            return (StatusCode::UNAUTHORIZED, json!({ "error": "invalid request signature" }));
        }

        let interaction: Interaction = match serde_json::from_slice(body) {
            Ok(interaction) => interaction,
            Err(e) => {
                tracing::warn!("Malformed interaction: {}", e);
                return (StatusCode::BAD_REQUEST, json!({ "error": "malformed interaction" }));
            }
        };

        match interaction.kind {
            PING => (StatusCode::OK, json!({ "type": PONG })),
            APPLICATION_COMMAND => {
                let (Some(data), Some(caller)) = (interaction.data.as_ref(), interaction.caller()) else {
                    return (StatusCode::BAD_REQUEST, json!({ "error": "command without data or caller" }));
                };
                let entry = data
                    .options
                    .iter()
                    .find(|o| o.name == "entry")
                    .and_then(|o| o.value.as_ref())
                    .and_then(Value::as_str);

                let mut invocation = Invocation::new(data.name.clone(), caller);
                if let Some(entry) = entry {
                    invocation = invocation.with_entry(entry);
                }
                tracing::debug!("/{} from {}", invocation.name, invocation.caller);

                let reply = self.dispatcher.dispatch(&invocation).await;
                (StatusCode::OK, reply_body(&reply))
            }
            other => {
                tracing::debug!("Ignoring interaction type {}", other);
                (StatusCode::BAD_REQUEST, json!({ "error": "unsupported interaction type" }))
            }
        }
    }
}

/// Replies are only visible to the caller
fn reply_body(reply: &Reply) -> Value {
    let data = match reply {
        Reply::Text(content) => json!({ "content": content, "flags": EPHEMERAL }),
        Reply::Embed(payload) => json!({ "embeds": [payload], "flags": EPHEMERAL }),
    };
    json!({ "type": CHANNEL_MESSAGE_WITH_SOURCE, "data": data })
}

async fn interactions(
    State(server): State<Arc<InteractionServer>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let (status, body) = server.handle(&headers, &body).await;
    (status, Json(body))
}
