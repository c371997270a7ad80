//! HTTP transport for Statboard server
//!
//! Everything is served from `/`:
//! - `GET`   - liveness, `204 No Content`
//! - `POST`  - leaderboard read
//! - `PATCH` - player write, requires `Authorization: Key <secret>`
//!
//! Other methods get `405`. Errors carry a status code and no body.

use crate::handler::Handler;
use axum::Json;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use serde::Serialize;
use statboard::{Result, StatsError};
use std::future::Future;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Build the router for a handler.
pub fn router(handler: Handler) -> Router {
    Router::new()
        .route("/", get(root).post(leaderboard).patch(update_player))
        .with_state(handler)
}

/// Run the HTTP server until `shutdown` resolves.
pub async fn run_server(
    listener: TcpListener,
    handler: Handler,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Statboard HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Status for a failed request.
pub fn status_for(err: &StatsError) -> StatusCode {
    match err {
        StatsError::InvalidInput(_) | StatsError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StatsError::NotFound => StatusCode::NOT_FOUND,
        StatsError::Unauthorized => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn root() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn leaderboard(State(handler): State<Handler>, body: Bytes) -> Response {
    respond(Method::POST, handler.leaderboard(body).await)
}

async fn update_player(
    State(handler): State<Handler>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    respond(
        Method::PATCH,
        handler.update_player(authorization, body).await,
    )
}

fn respond<T: Serialize>(method: Method, result: Result<T>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!(method = %method, error = %e, "Request failed");
            }
            status.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let decode = serde_json::from_str::<u8>("x").unwrap_err();

        assert_eq!(status_for(&StatsError::Decode(decode)), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_for(&StatsError::InvalidInput("bad".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(&StatsError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&StatsError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(&StatsError::Store("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&StatsError::DatabaseClosed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
