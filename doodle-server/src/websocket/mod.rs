use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::session_manager::SessionManager;
use doodle_types::{ClientMessage, GameError, ProfileId, ServerMessage};

pub mod handlers;
pub mod rate_limiter;


use handlers::MessageHandler;
use rate_limiter::RateLimiter;

/// Serve one player: a fresh session lives exactly as long as the socket
pub async fn handle_connection(
    websocket: WebSocket,
    session_manager: Arc<SessionManager>,
    profile_id: Option<ProfileId>,
) {
    let ticket = session_manager.create_session(profile_id).await;
    let session_id = ticket.session_id;
    info!("New WebSocket connection for session {}", session_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();
    let message_handler = MessageHandler::new(session_id, session_manager.clone());

    if let Err(e) = message_handler
        .send_message(ServerMessage::SessionStarted {
            session_id,
            profile: ticket.profile,
        })
        .await
    {
        error!("Failed to greet session {}: {}", session_id, e);
    }

    // Handle incoming messages
    let incoming_handler = {
        let message_handler = message_handler.clone();
        let mut rate_limiter = RateLimiter::new();

        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) if msg.is_close() => break,
                    Ok(msg) => {
                        if let Err(e) = handle_message(msg, &mut rate_limiter, &message_handler).await
                        {
                            error!("Error handling message for {}: {}", session_id, e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", session_id, e);
                        break;
                    }
                }
            }
        }
    };

    // Handle outgoing messages
    let outgoing_handler = {
        async move {
            let mut receiver = ticket.messages;

            while let Some(message) = receiver.recv().await {
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize message: {:?}", e);
                        continue;
                    }
                };

                if let Err(e) = ws_sender.send(Message::text(json)).await {
                    warn!("Failed to send message to {}: {:?}", session_id, e);
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    info!("Session {} disconnected", session_id);
    message_handler.handle_disconnect().await;
}

async fn handle_message(
    msg: Message,
    rate_limiter: &mut RateLimiter,
    message_handler: &MessageHandler,
) -> Result<(), String> {
    // Only handle text messages
    if !msg.is_text() {
        return Ok(());
    }

    if !rate_limiter.check_rate_limit() {
        warn!(
            "Rate limit exceeded for session {}",
            message_handler.session_id()
        );
        return message_handler.reject(GameError::RateLimitExceeded).await;
    }

    let text = msg.to_str().map_err(|_| "Invalid text message")?;

    let client_message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            return message_handler
                .reject(GameError::InvalidMessage {
                    reason: format!("Invalid JSON message: {}", e),
                })
                .await;
        }
    };

    message_handler.handle_message(client_message).await
}
