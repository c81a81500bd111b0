use std::sync::Arc;
use tracing::{info, warn};

use crate::session_manager::SessionManager;
use doodle_types::{ClientMessage, GameError, ServerMessage, SessionId};

const MAX_STROKE_POINTS: usize = 2048;
const MAX_BRUSH_SIZE: u32 = 64;

#[derive(Clone)]
pub struct MessageHandler {
    session_id: SessionId,
    session_manager: Arc<SessionManager>,
}

impl MessageHandler {
    pub fn new(session_id: SessionId, session_manager: Arc<SessionManager>) -> Self {
        Self {
            session_id,
            session_manager,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        if let Err(reason) = validate_message(&message) {
            warn!("Rejecting message from session {}: {}", self.session_id, reason);
            return self.reject(GameError::InvalidMessage { reason }).await;
        }

        self.session_manager
            .send_command(&self.session_id, message)
            .await
    }

    /// Report a problem to this client without involving the engine
    pub async fn reject(&self, error: GameError) -> Result<(), String> {
        self.send_message(ServerMessage::Error { error }).await
    }

    pub async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.session_manager.notify(&self.session_id, message).await
    }

    pub async fn handle_disconnect(&self) {
        info!("Handling disconnect for session {}", self.session_id);
        self.session_manager.remove_session(&self.session_id).await;
    }
}

pub fn validate_message(message: &ClientMessage) -> Result<(), String> {
    match message {
        ClientMessage::AddStroke { points, size, .. } => {
            if points.is_empty() {
                return Err("Stroke has no points".to_string());
            }
            if points.len() > MAX_STROKE_POINTS {
                return Err(format!(
                    "Stroke has {} points, the limit is {}",
                    points.len(),
                    MAX_STROKE_POINTS
                ));
            }
            if *size == 0 || *size > MAX_BRUSH_SIZE {
                return Err(format!("Brush size must be 1-{}", MAX_BRUSH_SIZE));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doodle_types::StrokePoint;

    fn stroke(count: usize, size: u32) -> ClientMessage {
        ClientMessage::AddStroke {
            points: vec![StrokePoint { x: 1.0, y: 2.0 }; count],
            color: "#000000".to_string(),
            size,
        }
    }

    #[test]
    fn test_stroke_validation() {
        assert!(validate_message(&stroke(3, 4)).is_ok());
        assert!(validate_message(&stroke(0, 4)).is_err());
        assert!(validate_message(&stroke(3, 0)).is_err());
        assert!(validate_message(&stroke(3, MAX_BRUSH_SIZE + 1)).is_err());
        assert!(validate_message(&stroke(MAX_STROKE_POINTS + 1, 4)).is_err());
    }

    #[test]
    fn test_other_messages_pass_through() {
        assert!(validate_message(&ClientMessage::Undo).is_ok());
        assert!(validate_message(&ClientMessage::Heartbeat).is_ok());
    }
}
