use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;

use crate::profiles::ProfileRegistry;
use crate::session_manager::SessionManager;
use doodle_types::ProfileId;

pub mod config;
pub mod profiles;
pub mod session_manager;
pub mod websocket;

#[derive(Deserialize)]
struct ConnectQuery {
    profile: Option<ProfileId>,
}

pub fn create_routes(
    session_manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let session_manager_filter = warp::any().map({
        let session_manager = session_manager.clone();
        move || session_manager.clone()
    });

    let profiles_filter = warp::any().map({
        let profiles = session_manager.profiles().clone();
        move || profiles.clone()
    });

    // WebSocket endpoint, one game session per connection
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(warp::query::<ConnectQuery>())
        .and(session_manager_filter.clone())
        .map(
            |ws: warp::ws::Ws, query: ConnectQuery, session_mgr: Arc<SessionManager>| {
                ws.on_upgrade(move |socket| {
                    websocket::handle_connection(socket, session_mgr, query.profile)
                })
            },
        );

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let session_state = warp::path!("session" / String / "state")
        .and(warp::get())
        .and(session_manager_filter.clone())
        .and_then(handle_session_state_request);

    let profile = warp::path!("profile" / String)
        .and(warp::get())
        .and(profiles_filter)
        .and_then(handle_profile_request);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .or(session_state)
        .or(profile)
        .with(cors)
        .with(warp::log("doodle_arena"))
}

fn error_reply(message: &str, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": message })),
        status,
    )
}

async fn handle_session_state_request(
    session_id: String,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let session_uuid = match Uuid::parse_str(&session_id) {
        Ok(uuid) => uuid,
        Err(_) => {
            return Ok(error_reply(
                "Invalid session ID format",
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    match session_manager.get_state(&session_uuid).await {
        Some(state) => Ok(warp::reply::with_status(
            warp::reply::json(&state),
            StatusCode::OK,
        )),
        None => Ok(error_reply("Session not found", StatusCode::NOT_FOUND)),
    }
}

async fn handle_profile_request(
    profile_id: String,
    profiles: Arc<ProfileRegistry>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let profile_uuid = match Uuid::parse_str(&profile_id) {
        Ok(uuid) => uuid,
        Err(_) => {
            return Ok(error_reply(
                "Invalid profile ID format",
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    match profiles.get(&profile_uuid) {
        Some(profile) => Ok(warp::reply::with_status(
            warp::reply::json(&profile),
            StatusCode::OK,
        )),
        None => Ok(error_reply("Profile not found", StatusCode::NOT_FOUND)),
    }
}
