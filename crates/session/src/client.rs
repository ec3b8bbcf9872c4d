//! Capability traits for the remote backend and its streaming channels.

use std::sync::Arc;

use async_trait::async_trait;
use proto::{ActorHandle, ChannelError, ChatSession, ClientError, SessionConfig};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::payload::ChannelPayload;

/// Backend collaborator driven by [`SessionLifecycle`](crate::SessionLifecycle).
///
/// Every capability is optional. The defaults describe a backend that offers
/// nothing: no session, no channel, nothing to start or stop, and a send that
/// reports [`ClientError::Unsupported`].
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Creates (or attaches to) a remote session.
    async fn create_session(
        &self,
        _config: &SessionConfig,
    ) -> Result<Option<ChatSession>, ClientError> {
        Ok(None)
    }

    /// Opens the streaming channel of the given chat actor.
    async fn open_channel_stream(
        &self,
        _actor_id: &str,
    ) -> Result<Option<Arc<dyn ChannelStream>>, ClientError> {
        Ok(None)
    }

    /// Starts chat automation on the domain actor.
    async fn start_chat(&self, _actor: &ActorHandle) -> Result<(), ClientError> {
        Ok(())
    }

    /// Delivers user text to the domain actor.
    async fn send_message(&self, _actor: &ActorHandle, _text: &str) -> Result<Value, ClientError> {
        Err(ClientError::Unsupported("send_message"))
    }

    /// Asks the backend to stop the domain actor.
    async fn stop_actor(&self, _actor: &ActorHandle) -> Result<(), ClientError> {
        Ok(())
    }
}

/// Bidirectional streaming handle tied to a session.
#[async_trait]
pub trait ChannelStream: Send + Sync {
    /// Backend identifier of the channel.
    fn channel_id(&self) -> &str;

    /// New receiver for inbound payloads. Dropping it unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<ChannelPayload>;

    /// Sends text out of band.
    async fn send_message(&self, text: &str) -> Result<(), ChannelError>;

    /// Closes the channel. Closing twice is not an error.
    fn close(&self) -> Result<(), ChannelError>;
}
