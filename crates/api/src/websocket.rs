// Live subscription endpoint

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use oracle_services::SubscriberHandle;
use tracing::debug;

use crate::routes::AppState;

pub async fn live_feed(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (handle, mut outbox) = SubscriberHandle::channel(state.subscriber_buffer);
    let id = state.registry.register(handle);

    // Ends when the socket rejects a write or the registry drops the handle.
    let mut writer = tokio::spawn(async move {
        while let Some(payload) = outbox.recv().await {
            if ws_tx.send(Message::Text(payload.to_string())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    loop {
        tokio::select! {
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!("Subscriber {} read error: {}", id, e);
                    break;
                }
                Some(Ok(_)) => {}
            },
            _ = &mut writer => break,
        }
    }

    state.registry.unregister(&id);
    writer.abort();
}
