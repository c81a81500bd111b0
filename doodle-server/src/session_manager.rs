use doodle_core::{
    EngineConfig, EngineResult, GameSession, SessionEvent, SessionEventHandler, TimerHandle,
    WordCatalog,
};
use doodle_types::{ClientMessage, PlayerProfile, ProfileId, RoundState, ServerMessage, SessionId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::profiles::{ProfileRegistry, SharedProfileStore};

/// Everything a session actor reacts to
#[derive(Debug)]
pub enum SessionCommand {
    Client(ClientMessage),
    TimerFired(TimerHandle),
    Shutdown,
}

struct SessionHandle {
    profile_id: ProfileId,
    commands: mpsc::UnboundedSender<SessionCommand>,
    outgoing: mpsc::UnboundedSender<ServerMessage>,
    state: watch::Receiver<RoundState>,
    last_activity: Instant,
}

/// What a new connection needs to talk to its session
pub struct SessionTicket {
    pub session_id: SessionId,
    pub profile: PlayerProfile,
    pub messages: mpsc::UnboundedReceiver<ServerMessage>,
}

/// Owns every live session. Each session runs as its own task and is only
/// touched through its command channel.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    profiles: Arc<ProfileRegistry>,
    catalog: WordCatalog,
    config: EngineConfig,
}

impl SessionManager {
    pub fn new(config: EngineConfig, catalog: WordCatalog, profiles: Arc<ProfileRegistry>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            profiles,
            catalog,
            config,
        }
    }

    pub fn profiles(&self) -> &Arc<ProfileRegistry> {
        &self.profiles
    }

    pub async fn create_session(&self, profile_id: Option<ProfileId>) -> SessionTicket {
        let session_id = Uuid::new_v4();
        let profile = self.profiles.get_or_create(profile_id);

        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let mut session = GameSession::new(self.config.clone(), self.catalog.clone())
            .with_profile(Box::new(SharedProfileStore::new(
                self.profiles.clone(),
                profile.id,
            )));
        session.subscribe(Box::new(OutboundForwarder {
            outgoing: outgoing_tx.clone(),
        }));
        let (state_tx, state_rx) = watch::channel(session.state().clone());

        tokio::spawn(run_session(
            session_id,
            session,
            command_rx,
            command_tx.clone(),
            outgoing_tx.clone(),
            state_tx,
        ));

        {
            let mut sessions = self.sessions.write().await;
            sessions.insert(
                session_id,
                SessionHandle {
                    profile_id: profile.id,
                    commands: command_tx,
                    outgoing: outgoing_tx,
                    state: state_rx,
                    last_activity: Instant::now(),
                },
            );
        }

        info!("Created session {} for profile {}", session_id, profile.id);
        SessionTicket {
            session_id,
            profile,
            messages: outgoing_rx,
        }
    }

    /// Queue a client command for the session and mark it active
    pub async fn send_command(
        &self,
        session_id: &SessionId,
        message: ClientMessage,
    ) -> Result<(), String> {
        let mut sessions = self.sessions.write().await;
        let handle = sessions
            .get_mut(session_id)
            .ok_or_else(|| format!("Session {} not found", session_id))?;

        handle.last_activity = Instant::now();
        handle
            .commands
            .send(SessionCommand::Client(message))
            .map_err(|_| format!("Session {} has stopped", session_id))
    }

    /// Send a message straight to the session's client, bypassing the engine
    pub async fn notify(&self, session_id: &SessionId, message: ServerMessage) -> Result<(), String> {
        let sessions = self.sessions.read().await;
        let handle = sessions
            .get(session_id)
            .ok_or_else(|| format!("Session {} not found", session_id))?;
        handle
            .outgoing
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }

    pub async fn get_state(&self, session_id: &SessionId) -> Option<RoundState> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|handle| handle.state.borrow().clone())
    }

    pub async fn profile_for(&self, session_id: &SessionId) -> Option<ProfileId> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).map(|handle| handle.profile_id)
    }

    /// Stop a session. Its profile goes too if no game was ever finished on
    /// it and no other session still uses it.
    pub async fn remove_session(&self, session_id: &SessionId) -> bool {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(session_id).map(|handle| {
                let shared = sessions
                    .values()
                    .any(|other| other.profile_id == handle.profile_id);
                (handle, shared)
            })
        };

        match removed {
            Some((handle, shared)) => {
                let _ = handle.commands.send(SessionCommand::Shutdown);
                if !shared {
                    self.profiles.evict_if_unplayed(&handle.profile_id);
                }
                info!("Removed session {}", session_id);
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Stop sessions that have not heard from their client within `timeout`
    pub async fn cleanup_inactive_sessions(&self, timeout: Duration) -> usize {
        let expired: Vec<SessionId> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .filter(|(_, handle)| handle.last_activity.elapsed() > timeout)
                .map(|(id, _)| *id)
                .collect()
        };

        for session_id in &expired {
            info!("Cleaning up inactive session {}", session_id);
            self.remove_session(session_id).await;
        }
        expired.len()
    }
}

/// Turns engine events into wire messages for one client
struct OutboundForwarder {
    outgoing: mpsc::UnboundedSender<ServerMessage>,
}

impl SessionEventHandler for OutboundForwarder {
    fn handle_event(&mut self, event: &SessionEvent) {
        for message in server_messages(event) {
            if self.outgoing.send(message).is_err() {
                debug!("Client gone, dropping session update");
                break;
            }
        }
    }
}

pub fn server_messages(event: &SessionEvent) -> Vec<ServerMessage> {
    match event {
        SessionEvent::StateChanged { state } => vec![ServerMessage::StateUpdate {
            state: state.clone(),
        }],
        SessionEvent::GuessProcessed { guess } => vec![ServerMessage::GuessProcessed {
            guess: guess.clone(),
        }],
        SessionEvent::RoundScored { outcome, state } => vec![ServerMessage::RoundResult {
            outcome: outcome.clone(),
            state: state.clone(),
        }],
        SessionEvent::DrawingChanged { drawing } => vec![ServerMessage::DrawingUpdate {
            drawing: drawing.clone(),
        }],
        SessionEvent::GameCompleted {
            summary,
            completion,
        } => {
            let mut messages = vec![ServerMessage::GameOver {
                total_score: summary.total_score,
                rounds_played: summary.rounds_played,
                is_new_high_score: completion
                    .as_ref()
                    .is_some_and(|c| c.is_new_high_score),
            }];
            if let Some(completion) = completion {
                messages.push(ServerMessage::ProfileUpdate {
                    profile: completion.profile.clone(),
                });
            }
            messages
        }
        SessionEvent::Notice { message } => vec![ServerMessage::Notice {
            message: message.clone(),
        }],
    }
}

async fn run_session(
    session_id: SessionId,
    mut session: GameSession,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    timers: mpsc::UnboundedSender<SessionCommand>,
    outgoing: mpsc::UnboundedSender<ServerMessage>,
    state: watch::Sender<RoundState>,
) {
    debug!("Session {} actor started", session_id);

    while let Some(command) = commands.recv().await {
        match command {
            SessionCommand::Client(message) => match apply_client_message(&mut session, message) {
                Ok(Some(reply)) => {
                    let _ = outgoing.send(reply);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!("Session {} rejected command: {}", session_id, e);
                    let _ = outgoing.send(ServerMessage::Error {
                        error: e.to_game_error(),
                    });
                }
            },
            SessionCommand::TimerFired(handle) => {
                if let Err(e) = session.fire(handle) {
                    debug!("Session {} timer failed: {}", session_id, e);
                }
            }
            SessionCommand::Shutdown => break,
        }

        for timer in session.take_scheduled() {
            let timers = timers.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timer.delay).await;
                let _ = timers.send(SessionCommand::TimerFired(timer.handle));
            });
        }
        state.send_replace(session.state().clone());
    }

    info!("Session {} stopped", session_id);
}

fn apply_client_message(
    session: &mut GameSession,
    message: ClientMessage,
) -> EngineResult<Option<ServerMessage>> {
    match message {
        ClientMessage::StartRound { difficulty } => session.start_round(difficulty).map(|_| None),
        ClientMessage::AddStroke {
            points,
            color,
            size,
        } => {
            let color = Some(color).filter(|c| !c.is_empty());
            session.add_stroke(points, color, Some(size)).map(|_| None)
        }
        ClientMessage::Undo => session.undo().map(|_| None),
        ClientMessage::Clear => session.clear().map(|_| None),
        ClientMessage::NextRound => session.advance().map(|_| None),
        ClientMessage::Reset => {
            session.reset();
            Ok(None)
        }
        ClientMessage::Heartbeat => Ok(Some(ServerMessage::Pong)),
    }
}
