use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::AggregatedMessage;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use crate::models::{ClientEvent, ConnectionId, ErrorResponse, ServerEvent};
use crate::routes::AppState;

/// Largest reassembled text message accepted from a client
const MAX_MESSAGE_SIZE: usize = 256 * 1024;

/// Real-time channel endpoint
///
/// GET /ws
///
/// Each connection gets a reader task that forwards parsed client events to
/// the lobby, and a writer task that drains the connection's outbox. Frames
/// are JSON objects of the form `{"event": "...", "data": ...}`.
pub async fn ws_handler(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, mut session, msg_stream) = actix_ws::handle(&req, body)?;
    // Fragmented messages are reassembled before they reach the parser
    let mut msg_stream = msg_stream
        .aggregate_continuations()
        .max_continuation_size(MAX_MESSAGE_SIZE);

    let connection = ConnectionId::new();
    let (outbox, mut outbound) = mpsc::unbounded_channel::<ServerEvent>();
    if let Err(e) = state.lobby.connect(connection, outbox.clone()) {
        tracing::error!("Refusing connection {}: {}", connection, e);
        return Ok(HttpResponse::ServiceUnavailable().finish());
    }

    // Writer: outbox -> socket, in the order the lobby queued them
    let mut writer = session.clone();
    actix_web::rt::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::error!("Failed to encode event for {}: {}", connection, e);
                    continue;
                }
            };
            if writer.text(payload).await.is_err() {
                break;
            }
        }
    });

    // Reader: socket -> lobby
    let lobby = state.lobby.clone();
    actix_web::rt::spawn(async move {
        let mut close_reason = None;

        while let Some(Ok(msg)) = msg_stream.next().await {
            match msg {
                AggregatedMessage::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => {
                        if lobby.dispatch(connection, event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Malformed frame from {}: {}", connection, e);
                        let _ = outbox.send(invalid_payload(format!("Invalid event: {}", e)));
                    }
                },
                AggregatedMessage::Binary(_) => {
                    let _ = outbox.send(invalid_payload("Binary frames are not supported".to_string()));
                }
                AggregatedMessage::Ping(bytes) => {
                    if session.pong(&bytes).await.is_err() {
                        break;
                    }
                }
                AggregatedMessage::Close(reason) => {
                    close_reason = reason;
                    break;
                }
                AggregatedMessage::Pong(_) => {}
            }
        }

        let _ = lobby.disconnect(connection);
        let _ = session.close(close_reason).await;
    });

    Ok(response)
}

fn invalid_payload(message: String) -> ServerEvent {
    ServerEvent::Error(ErrorResponse {
        error: "invalid_payload".to_string(),
        message,
        status_code: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Catalog, Engine};
    use crate::services::{Lobby, SessionPolicy};
    use actix_web::{web::Bytes, App};
    use awc::error::WsProtocolError;
    use actix_ws::Item;
    use awc::ws::{Frame, Message as WsMessage};
    use futures_util::{SinkExt, Stream};
    use std::sync::Arc;

    const JOIN_FRAME: &str =
        r#"{"event":"joinWaiting","data":{"name":"Alex","age":30,"location":"Vienna","bio":"Opera","uniqueId":"u1"}}"#;

    fn start_server() -> actix_test::TestServer {
        let catalog = Arc::new(Catalog::default());
        let (lobby, handle) = Lobby::new(Engine::new(catalog.clone()), SessionPolicy::InMemory);
        tokio::spawn(lobby.run());
        let state = AppState {
            lobby: handle,
            catalog,
            store: None,
        };

        actix_test::start(move || {
            App::new()
                .app_data(web::Data::new(state.clone()))
                .route("/ws", web::get().to(ws_handler))
        })
    }

    async fn next_event<S>(framed: &mut S) -> serde_json::Value
    where
        S: Stream<Item = Result<Frame, WsProtocolError>> + Unpin,
    {
        while let Some(frame) = framed.next().await {
            if let Frame::Text(bytes) = frame.unwrap() {
                return serde_json::from_slice(&bytes).unwrap();
            }
        }
        panic!("Connection closed before an event arrived");
    }

    #[actix_web::test]
    async fn test_fragmented_join_is_reassembled() {
        let mut srv = start_server();
        let mut framed = srv.ws_at("/ws").await.unwrap();

        let (head, rest) = JOIN_FRAME.split_at(40);
        let (middle, last) = rest.split_at(30);
        framed
            .send(WsMessage::Continuation(Item::FirstText(Bytes::from(head.to_string()))))
            .await
            .unwrap();
        framed
            .send(WsMessage::Continuation(Item::Continue(Bytes::from(middle.to_string()))))
            .await
            .unwrap();
        framed
            .send(WsMessage::Continuation(Item::Last(Bytes::from(last.to_string()))))
            .await
            .unwrap();

        let first = next_event(&mut framed).await;
        assert_eq!(first["event"], "waitingCount");
        assert_eq!(first["data"], 1);
        let second = next_event(&mut framed).await;
        assert_eq!(second["event"], "queueStatus");
        assert_eq!(second["data"]["position"], 1);
    }

    #[actix_web::test]
    async fn test_binary_and_garbage_get_invalid_payload() {
        let mut srv = start_server();
        let mut framed = srv.ws_at("/ws").await.unwrap();

        framed.send(WsMessage::Binary(Bytes::from_static(b"\x01\x02"))).await.unwrap();
        let event = next_event(&mut framed).await;
        assert_eq!(event["event"], "error");
        assert_eq!(event["data"]["error"], "invalid_payload");

        framed.send(WsMessage::Text("not json".into())).await.unwrap();
        let event = next_event(&mut framed).await;
        assert_eq!(event["data"]["error"], "invalid_payload");
    }
}
