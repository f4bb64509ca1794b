use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use crate::{controller::ActingTenant, model::app::AppState};

pub static PUSH_TAG: &str = "push";

/// Live notification stream for the caller tenant
#[utoipa::path(
    get,
    path = "/api/push/events",
    tag = PUSH_TAG,
    responses(
        (status = 200, description = "Server-sent event stream of push messages", content_type = "text/event-stream"),
        (status = 400, description = "Missing tenant header")
    ),
)]
pub async fn events(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let receiver = state.push.subscribe(team_number);

    // Lagged subscribers skip the messages they missed and keep the
    // stream; the outbox carries anything that must not be lost.
    let stream = BroadcastStream::new(receiver).filter_map(|message| match message {
        Ok(message) => Some(Event::default().json_data(&message)),
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
