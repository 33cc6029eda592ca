//! Relay endpoints: subscribe (SSE) and publish on `/live/{room_id}`.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::{future, stream, StreamExt};
use relay_common::RoomId;

use crate::error::{ApiError, ApiErrorBody};
use crate::relay::{Payload, Subscription};
use crate::AppState;

use super::static_files;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/live/{room_id}",
        get(subscribe).post(publish).fallback(method_not_allowed),
    )
}

/// A valid room id taken from the `{room_id}` path segment.
///
/// An invalid id means the request is not a relay request at all: the
/// rejection is whatever the static file server answers for the same path.
pub struct LiveRoom(pub RoomId);

impl FromRequestParts<AppState> for LiveRoom {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match RoomId::parse(&raw) {
            Ok(id) => Ok(LiveRoom(id)),
            Err(reason) => {
                tracing::trace!(%reason, path = %parts.uri.path(), "not a relay request");
                Err(static_files::serve_path(&state.config.public_dir, parts.uri.path()).await)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// GET /live/:room_id
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/live/{room_id}",
    tag = "Relay",
    params(
        ("room_id" = String, Path, description = "Room ID, 6-64 characters of [A-Za-z0-9_-]"),
    ),
    responses(
        (status = 200, description = "Event stream: the last payload (if any), then every publish", content_type = "text/event-stream", body = String),
        (status = 404, description = "Invalid room id and no matching static file", body = ApiErrorBody),
    ),
)]
pub async fn subscribe(
    LiveRoom(room_id): LiveRoom,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let room = state.rooms.get_or_create(&room_id);
    let (subscription, replay) = Subscription::open(room, state.config.subscriber_buffer);

    let events = stream::once(future::ready(Event::default().comment("ok")))
        .chain(stream::iter(replay.map(data_event)))
        .chain(subscription.map(data_event))
        .map(Ok::<_, Infallible>);

    let sse = Sse::new(events).keep_alive(KeepAlive::new().interval(state.config.keep_alive_interval()));

    (
        [
            (CACHE_CONTROL, "no-cache"),
            (CONNECTION, "keep-alive"),
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        sse,
    )
}

fn data_event(payload: Payload) -> Event {
    Event::default().data(payload.as_str())
}

// ---------------------------------------------------------------------------
// POST /live/:room_id
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/live/{room_id}",
    tag = "Relay",
    params(
        ("room_id" = String, Path, description = "Room ID, 6-64 characters of [A-Za-z0-9_-]"),
    ),
    responses(
        (status = 204, description = "Payload stored and relayed to current subscribers"),
        (status = 400, description = "Body is not valid JSON or exceeds the size limit", body = ApiErrorBody),
        (status = 404, description = "Invalid room id and no matching static file", body = ApiErrorBody),
    ),
)]
pub async fn publish(
    LiveRoom(room_id): LiveRoom,
    State(state): State<AppState>,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let limit = state.config.max_publish_bytes;
    let bytes = axum::body::to_bytes(body, limit).await.map_err(|err| {
        tracing::debug!(room_id = %room_id, ?err, "publish body rejected");
        ApiError::bad_request(format!("Body unreadable or larger than {limit} bytes"))
    })?;

    let payload = Payload::from_body(&bytes).map_err(|err| {
        tracing::debug!(room_id = %room_id, %err, "publish body is not JSON");
        ApiError::bad_request(format!("bad json: {err}"))
    })?;

    let room = state.rooms.get_or_create(&room_id);
    let report = room.publish(payload);

    tracing::debug!(
        room_id = %room_id,
        delivered = report.delivered,
        dropped = report.dropped,
        "payload published"
    );

    Ok(StatusCode::NO_CONTENT)
}

async fn method_not_allowed(LiveRoom(_): LiveRoom) -> ApiError {
    ApiError::method_not_allowed("Use GET to subscribe or POST to publish")
}
