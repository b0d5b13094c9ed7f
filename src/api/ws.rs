use crate::{
    AppService,
    api::models::ApiError,
    auth::jwt::Claims,
    core::models::GroupEvent,
    infrastructure::realtime::broadcast::report_lag,
};
use axum::{
    Extension,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{debug, warn};

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/events",
    params(
        ("group_id" = String, Path, description = "ID of the group to follow")
    ),
    responses(
        (status = 101, description = "WebSocket stream of group events", body = GroupEvent),
        (status = 403, description = "Not a group member", body = crate::api::models::ErrorResponse),
        (status = 404, description = "Group not found", body = crate::api::models::ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn group_events(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    service.get_group(&group_id, &claims.sub).await?;
    // subscribe before the upgrade so no event slips between the check and the stream
    let events = service.publisher().subscribe(&group_id);
    Ok(ws.on_upgrade(move |socket| stream_events(socket, group_id, events)))
}

async fn stream_events(socket: WebSocket, group_id: String, mut events: Receiver<GroupEvent>) {
    let (mut sender, mut incoming) = socket.split();
    debug!(group_id = %group_id, "subscriber connected");

    let forward_group = group_id.clone();
    let mut forward = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!(group_id = %forward_group, error = %e, "failed to encode event");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => report_lag(&forward_group, skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Clients only listen; anything they send besides a close frame is ignored.
    let mut drain = tokio::spawn(async move {
        while let Some(Ok(message)) = incoming.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut forward => drain.abort(),
        _ = &mut drain => forward.abort(),
    }
    debug!(group_id = %group_id, "subscriber disconnected");
}
