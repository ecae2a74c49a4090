//! Row-change subscription over the Supabase Realtime websocket
//!
//! The Realtime server speaks the Phoenix channel protocol: the client joins a
//! topic with a `postgres_changes` filter, keeps the socket alive with
//! heartbeats, and receives one `postgres_changes` message per row change.
//! Only the new-row image of each change is surfaced to the session.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::config::SupabaseConfig;
use crate::error::DashboardError;
use crate::reading::Reading;

const PHOENIX_TOPIC: &str = "phoenix";
const PROTOCOL_VERSION: &str = "1.0.0";

/// Kind of row change reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    Other(String),
}

impl From<&str> for ChangeKind {
    fn from(s: &str) -> Self {
        match s {
            "INSERT" => ChangeKind::Insert,
            "UPDATE" => ChangeKind::Update,
            "DELETE" => ChangeKind::Delete,
            other => ChangeKind::Other(other.to_string()),
        }
    }
}

/// A single row-change notification
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub commit_timestamp: Option<String>,
    /// New-row image; absent for deletes
    pub record: Option<Value>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, record: Option<Value>) -> Self {
        Self {
            kind,
            commit_timestamp: None,
            record,
        }
    }

    /// Validate the new-row image into a reading
    pub fn new_row(&self) -> crate::Result<Reading> {
        match &self.record {
            Some(record) => Reading::from_row(record.clone()),
            None => Err(DashboardError::InvalidRow(format!(
                "{:?} change carries no new row",
                self.kind
            ))),
        }
    }
}

/// A live stream of change notifications
#[async_trait]
pub trait ChangeStream: Send {
    /// Next notification, or `None` once the stream has ended
    async fn next_event(&mut self) -> Option<ChangeEvent>;

    /// Release the subscription
    async fn close(&mut self) -> crate::Result<()>;
}

/// Something that can open a change subscription
#[async_trait]
pub trait ChangeSource: Send + Sync {
    async fn subscribe(&self) -> crate::Result<Box<dyn ChangeStream>>;
}

/// Phoenix channel frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub msg_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

/// Build the websocket URL from the project's HTTP base URL
pub fn socket_url(base_url: &str, api_key: &str) -> crate::Result<String> {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if base.starts_with("wss://") || base.starts_with("ws://") {
        base.to_string()
    } else {
        return Err(DashboardError::Config(format!(
            "Unsupported Supabase URL scheme: {}",
            base_url
        )));
    };
    Ok(format!(
        "{}/realtime/v1/websocket?apikey={}&vsn={}",
        ws_base, api_key, PROTOCOL_VERSION
    ))
}

pub fn join_message(config: &SupabaseConfig, msg_ref: &str) -> PhoenixMessage {
    PhoenixMessage {
        topic: channel_topic(&config.channel),
        event: "phx_join".to_string(),
        payload: json!({
            "config": {
                "postgres_changes": [
                    {"event": "*", "schema": config.schema, "table": config.table}
                ]
            }
        }),
        msg_ref: Some(msg_ref.to_string()),
        join_ref: Some(msg_ref.to_string()),
    }
}

pub fn heartbeat_message(msg_ref: &str) -> PhoenixMessage {
    PhoenixMessage {
        topic: PHOENIX_TOPIC.to_string(),
        event: "heartbeat".to_string(),
        payload: json!({}),
        msg_ref: Some(msg_ref.to_string()),
        join_ref: None,
    }
}

pub fn leave_message(topic: &str, msg_ref: &str) -> PhoenixMessage {
    PhoenixMessage {
        topic: topic.to_string(),
        event: "phx_leave".to_string(),
        payload: json!({}),
        msg_ref: Some(msg_ref.to_string()),
        join_ref: None,
    }
}

pub fn channel_topic(channel: &str) -> String {
    format!("realtime:{}", channel)
}

/// Extract a change notification from one inbound text frame.
///
/// Anything that is not a row change on `topic` yields `None`.
pub fn parse_change(text: &str, topic: &str) -> Option<ChangeEvent> {
    let message: PhoenixMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!("Ignoring unparseable realtime frame: {}", e);
            return None;
        }
    };

    if message.topic != topic {
        tracing::debug!(
            "Ignoring '{}' on topic '{}'",
            message.event,
            message.topic
        );
        return None;
    }

    match message.event.as_str() {
        "postgres_changes" => {
            let data = message.payload.get("data")?;
            let kind = data
                .get("type")
                .and_then(Value::as_str)
                .map(ChangeKind::from)
                .unwrap_or_else(|| ChangeKind::Other(String::new()));
            Some(ChangeEvent {
                kind,
                commit_timestamp: data
                    .get("commit_timestamp")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                record: non_null(data.get("record")),
            })
        }
        // Legacy per-kind events carry the record directly in the payload
        "INSERT" | "UPDATE" | "DELETE" => Some(ChangeEvent {
            kind: ChangeKind::from(message.event.as_str()),
            commit_timestamp: message
                .payload
                .get("commit_timestamp")
                .and_then(Value::as_str)
                .map(str::to_string),
            record: non_null(message.payload.get("record")),
        }),
        "phx_reply" => {
            let status = message
                .payload
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("");
            if status == "ok" {
                tracing::debug!("Realtime reply ok for ref {:?}", message.msg_ref);
            } else {
                tracing::warn!("Realtime reply '{}': {}", status, message.payload);
            }
            None
        }
        other => {
            tracing::debug!("Ignoring realtime event '{}'", other);
            None
        }
    }
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

/// Opens Realtime subscriptions for the configured table
#[derive(Debug, Clone)]
pub struct RealtimeClient {
    config: SupabaseConfig,
}

impl RealtimeClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl ChangeSource for RealtimeClient {
    async fn subscribe(&self) -> crate::Result<Box<dyn ChangeStream>> {
        let url = socket_url(&self.config.url, &self.config.api_key)?;
        tracing::debug!("Connecting to realtime at {}", self.config.url);

        let (socket, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| DashboardError::Realtime(format!("WebSocket connection failed: {}", e)))?;

        let heartbeat = Duration::from_secs(self.config.heartbeat_interval_seconds.max(1));
        let mut stream = RealtimeStream::new(socket, channel_topic(&self.config.channel), heartbeat);
        let join_ref = stream.take_ref();
        stream.send(&join_message(&self.config, &join_ref)).await?;

        tracing::info!(
            "Subscribed to changes on {}.{} via '{}'",
            self.config.schema,
            self.config.table,
            stream.topic
        );
        Ok(Box::new(stream))
    }
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum Step {
    Heartbeat,
    Frame(Option<Result<Message, tokio_tungstenite::tungstenite::Error>>),
}

/// An open Realtime channel
pub struct RealtimeStream {
    socket: Socket,
    topic: String,
    heartbeat: tokio::time::Interval,
    next_ref: u64,
    closed: bool,
}

impl RealtimeStream {
    fn new(socket: Socket, topic: String, heartbeat: Duration) -> Self {
        let heartbeat =
            tokio::time::interval_at(tokio::time::Instant::now() + heartbeat, heartbeat);
        Self {
            socket,
            topic,
            heartbeat,
            next_ref: 1,
            closed: false,
        }
    }

    fn take_ref(&mut self) -> String {
        let msg_ref = self.next_ref.to_string();
        self.next_ref += 1;
        msg_ref
    }

    async fn send(&mut self, message: &PhoenixMessage) -> crate::Result<()> {
        let text = serde_json::to_string(message)?;
        self.socket
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| DashboardError::Realtime(format!("Send failed: {}", e)))
    }
}

#[async_trait]
impl ChangeStream for RealtimeStream {
    async fn next_event(&mut self) -> Option<ChangeEvent> {
        if self.closed {
            return None;
        }
        loop {
            let step = tokio::select! {
                _ = self.heartbeat.tick() => Step::Heartbeat,
                frame = self.socket.next() => Step::Frame(frame),
            };

            match step {
                Step::Heartbeat => {
                    let msg_ref = self.take_ref();
                    if let Err(e) = self.send(&heartbeat_message(&msg_ref)).await {
                        tracing::warn!("Realtime heartbeat failed: {}", e);
                        return None;
                    }
                }
                Step::Frame(Some(Ok(Message::Text(text)))) => {
                    if let Some(event) = parse_change(&text.to_string(), &self.topic) {
                        return Some(event);
                    }
                }
                Step::Frame(Some(Ok(Message::Close(_)))) | Step::Frame(None) => {
                    tracing::warn!("Realtime stream for '{}' ended", self.topic);
                    return None;
                }
                Step::Frame(Some(Ok(_))) => continue,
                Step::Frame(Some(Err(e))) => {
                    tracing::warn!("Realtime stream for '{}' failed: {}", self.topic, e);
                    return None;
                }
            }
        }
    }

    async fn close(&mut self) -> crate::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let msg_ref = self.take_ref();
        let topic = self.topic.clone();
        if let Err(e) = self.send(&leave_message(&topic, &msg_ref)).await {
            tracing::debug!("Could not send leave for '{}': {}", topic, e);
        }
        self.socket
            .close(None)
            .await
            .map_err(|e| DashboardError::Realtime(format!("Close failed: {}", e)))?;
        tracing::debug!("Realtime channel '{}' closed", topic);
        Ok(())
    }
}
