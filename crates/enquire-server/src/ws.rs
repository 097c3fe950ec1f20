//! `/ws/notifications`: the staff live feed.
//!
//! The caller's privilege is checked before the upgrade; everyone else gets
//! a 403 and never joins the group. Once accepted, the socket forwards group
//! messages out and answers `ping` with `pong`. Anything else the client
//! sends is ignored.

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use enquire_shared::protocol::{ClientMessage, ServerMessage};

use crate::api::AppState;
use crate::auth::Actor;
use crate::error::ServerError;
use crate::notify::Subscription;

pub async fn notifications(
    State(state): State<AppState>,
    actor: Actor,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    if !actor.is_privileged() {
        warn!(actor = %actor, "rejected notification socket");
        return ServerError::Forbidden("Staff access required".into()).into_response();
    }

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => return rejection.into_response(),
    };

    upgrade.on_upgrade(move |socket| async move {
        // Joining happens only once the handshake has completed.
        let Some(subscription) = state.hub.subscribe(&actor) else {
            return;
        };
        info!(
            connection = %subscription.id(),
            actor = %actor,
            username = actor.username().unwrap_or("-"),
            listeners = state.hub.listeners(),
            "notification socket accepted"
        );
        run(socket, subscription, actor).await;
    })
}

async fn run(socket: WebSocket, mut subscription: Subscription, actor: Actor) {
    let connection = subscription.id();
    let (mut sink, mut stream) = socket.split();

    if !send(&mut sink, &ServerMessage::connection_established()).await {
        return;
    }

    loop {
        tokio::select! {
            outbound = subscription.recv() => {
                let Some(message) = outbound else { break };
                if !send(&mut sink, &message).await {
                    break;
                }
            }
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if ClientMessage::parse(&text) == Some(ClientMessage::Ping)
                        && !send(&mut sink, &ServerMessage::pong()).await
                    {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(connection = %connection, error = %e, "notification socket errored");
                    break;
                }
            },
        }
    }

    // Dropping the subscription removes the connection from the group.
    drop(subscription);
    info!(connection = %connection, actor = %actor, "notification socket closed");
}

/// Returns `false` once the peer can no longer be written to.
async fn send<S>(sink: &mut S, message: &ServerMessage) -> bool
where
    S: futures::Sink<Message> + Unpin,
{
    match message.to_json() {
        Ok(json) => sink.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode notification");
            true
        }
    }
}
