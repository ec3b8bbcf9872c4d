//! In-process backend that echoes user text back over its channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use proto::{ActorHandle, ChannelError, ChatSession, ClientError, SessionConfig, generate_actor_id};
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::client::{ChannelStream, ChatClient};
use crate::payload::ChannelPayload;

const CHANNEL_CAPACITY: usize = 64;

/// Channel half of [`LoopbackClient`].
pub struct LoopbackChannel {
    id: String,
    tx: broadcast::Sender<ChannelPayload>,
    closed: AtomicBool,
}

impl LoopbackChannel {
    fn new(id: String) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            id,
            tx,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn publish(&self, payload: Value) -> Result<(), ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        // no subscribers is not an error
        let _ = self.tx.send(ChannelPayload::Text(payload.to_string()));
        Ok(())
    }

    /// Emits the user's message followed by a completion echoing it.
    fn echo(&self, text: &str) -> Result<(), ChannelError> {
        self.publish(json!({
            "message": {"entry": {"Message": {"role": "user", "content": text}}}
        }))?;
        self.publish(json!({
            "message": {"entry": {"Completion": {"content": [
                {"type": "text", "text": format!("You said: {text}")}
            ]}}}
        }))
    }
}

#[async_trait]
impl ChannelStream for LoopbackChannel {
    fn channel_id(&self) -> &str {
        &self.id
    }

    fn subscribe(&self) -> broadcast::Receiver<ChannelPayload> {
        self.tx.subscribe()
    }

    async fn send_message(&self, text: &str) -> Result<(), ChannelError> {
        self.echo(text)
    }

    fn close(&self) -> Result<(), ChannelError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(channel = %self.id, "Loopback channel closed");
        }
        Ok(())
    }
}

/// [`ChatClient`] served entirely in-process.
#[derive(Default)]
pub struct LoopbackClient {
    channel: Mutex<Option<Arc<LoopbackChannel>>>,
    running: Mutex<Option<ActorHandle>>,
}

impl LoopbackClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actor started by [`ChatClient::start_chat`] and not yet stopped.
    pub fn running_actor(&self) -> Option<ActorHandle> {
        self.running.lock().clone()
    }
}

#[async_trait]
impl ChatClient for LoopbackClient {
    async fn create_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Option<ChatSession>, ClientError> {
        let domain_actor = ActorHandle(generate_actor_id("domain"));
        info!(
            server = config.server.as_deref().unwrap_or("-"),
            actor = %domain_actor,
            "Loopback session created"
        );
        Ok(Some(ChatSession {
            domain_actor,
            chat_actor_id: Some(generate_actor_id("chat")),
        }))
    }

    async fn open_channel_stream(
        &self,
        actor_id: &str,
    ) -> Result<Option<Arc<dyn ChannelStream>>, ClientError> {
        let channel = Arc::new(LoopbackChannel::new(format!("{actor_id}-channel")));
        *self.channel.lock() = Some(Arc::clone(&channel));
        Ok(Some(channel))
    }

    async fn start_chat(&self, actor: &ActorHandle) -> Result<(), ClientError> {
        *self.running.lock() = Some(actor.clone());
        Ok(())
    }

    async fn send_message(&self, actor: &ActorHandle, text: &str) -> Result<Value, ClientError> {
        if self.running.lock().as_ref() != Some(actor) {
            return Err(ClientError::Backend(format!("Actor {actor} is not running")));
        }
        let channel = self.channel.lock().clone();
        if let Some(channel) = channel {
            channel
                .echo(text)
                .map_err(|e| ClientError::Connection(e.to_string()))?;
        }
        Ok(json!({ "status": "sent", "actor": actor.as_str() }))
    }

    async fn stop_actor(&self, actor: &ActorHandle) -> Result<(), ClientError> {
        let mut running = self.running.lock();
        if running.as_ref() == Some(actor) {
            *running = None;
        }
        Ok(())
    }
}
