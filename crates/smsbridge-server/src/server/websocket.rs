use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use smsbridge_classifier::{ClassificationService, ClassifyError};
use smsbridge_core::{ClassificationResult, ClassifyPayload};
use tokio::sync::mpsc;

/// Messages a client sends over the socket
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Classify a text
    #[serde(alias = "sms")]
    Classify(ClassifyPayload),
}

/// Messages the server pushes back
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Successful classification, fields inlined next to `type`
    Result(ClassificationResult),

    /// Diagnostic for a rejected or failed message
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
}

impl ServerMessage {
    /// Wrap a result; a process-emitted `type` field is dropped so the tag stays unique
    pub fn result(mut result: ClassificationResult) -> Self {
        result.extra.remove("type");
        Self::Result(result)
    }

    fn error(message: impl Into<String>, kind: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            kind: kind.map(str::to_string),
        }
    }
}

impl From<ClassifyError> for ServerMessage {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::Rejected(smsbridge_core::Error::MissingField(field)) => {
                Self::error(format!("{} is required", field), Some("missing_field"))
            }
            ClassifyError::Rejected(other) => Self::error(other.to_string(), Some("invalid_message")),
            ClassifyError::Invocation(e) => Self::error(e.message(), None),
        }
    }
}

/// Answer one inbound text frame
///
/// Results produced here are not written to history.
pub async fn reply_to(service: &ClassificationService, frame: &str) -> ServerMessage {
    let payload = match serde_json::from_str::<ClientMessage>(frame) {
        Ok(ClientMessage::Classify(payload)) => payload,
        Err(e) => {
            tracing::debug!("Rejected socket message: {}", e);
            return ServerMessage::error(
                format!("invalid message: {}", e),
                Some("invalid_message"),
            );
        }
    };

    match service.classify(payload).await {
        Ok((_, result)) => ServerMessage::result(result),
        Err(e) => e.into(),
    }
}

/// WebSocket handler for socket classification
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    tracing::info!("Socket client connected");

    // Reply forwarding task
    let mut send_task = tokio::spawn(async move {
        while let Some(reply) = rx.recv().await {
            match serde_json::to_string(&reply) {
                Ok(msg) => {
                    if sender.send(Message::Text(msg)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize reply: {}", e);
                }
            }
        }
    });

    // Receive task; each message is classified on its own task
    let service = state.service.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => break,
                Message::Text(text) => {
                    let service = service.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let reply = reply_to(&service, &text).await;
                        let _ = tx.send(reply);
                    });
                }
                Message::Ping(data) => {
                    // Pong is handled automatically by axum
                    tracing::trace!("Received ping: {:?}", data);
                }
                Message::Binary(data) => {
                    tracing::debug!(len = data.len(), "Rejected binary socket frame");
                    let _ = tx.send(ServerMessage::error(
                        "binary frames are not supported",
                        Some("invalid_message"),
                    ));
                }
                _ => {}
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            tracing::debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            tracing::debug!("Receive task completed");
            send_task.abort();
        }
    }

    tracing::info!("Socket client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_message_accepts_both_tags() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"classify","text":"hi","model":"nb"}"#).unwrap();
        let ClientMessage::Classify(payload) = msg;
        assert_eq!(payload.text.as_deref(), Some("hi"));
        assert_eq!(payload.model.as_deref(), Some("nb"));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"sms","text":"hi"}"#).unwrap();
        let ClientMessage::Classify(payload) = msg;
        assert!(payload.model.is_none());

        assert!(serde_json::from_str::<ClientMessage>(r#"{"text":"hi"}"#).is_err());
    }

    #[test]
    fn test_server_message_layout() {
        let result = ClassificationResult::new("hello", json!("ham"));
        let value = serde_json::to_value(ServerMessage::Result(result)).unwrap();
        assert_eq!(value["type"], json!("result"));
        assert_eq!(value["input"], json!("hello"));
        assert_eq!(value["prediction"], json!("ham"));

        let value = serde_json::to_value(ServerMessage::error("boom", None)).unwrap();
        assert_eq!(value, json!({ "type": "error", "message": "boom" }));

        let value =
            serde_json::to_value(ServerMessage::error("text is required", Some("missing_field")))
                .unwrap();
        assert_eq!(value["kind"], json!("missing_field"));
    }

    #[test]
    fn test_result_tag_survives_process_type_field() {
        let result = ClassificationResult::from_output(
            r#"{"input":"hi","prediction":1,"type":"spam_bucket","version":"3"}"#,
        )
        .unwrap();

        let text = serde_json::to_string(&ServerMessage::result(result)).unwrap();
        assert_eq!(text.matches("\"type\"").count(), 1);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], json!("result"));
        assert_eq!(value["prediction"], json!(1));
        assert_eq!(value["version"], json!("3"));
    }
}
