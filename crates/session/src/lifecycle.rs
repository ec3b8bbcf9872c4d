//! Multi-phase session setup and teardown.
//!
//! Setup walks `Connecting → OpeningChannel → LoadingActor → Ready`, awaiting
//! one [`ChatClient`] capability per phase. Any failure lands in the terminal
//! `Error` phase instead of propagating. Every backend call races the
//! caller's [`CancellationToken`]; once it fires, the run returns at once and
//! mutates nothing. A call abandoned mid-flight finishes in the background and
//! any handle it yields is released there.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use proto::{ChatSession, ClientError, SessionConfig, SessionError, SetupPhase};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{ChannelStream, ChatClient};

/// Observable setup state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStatus {
    pub phase: SetupPhase,
    /// Phase text, or `Error: {message}` after a failure.
    pub message: String,
}

impl SetupStatus {
    fn of(phase: SetupPhase) -> Self {
        Self {
            phase,
            message: phase.status_message().to_string(),
        }
    }
}

enum Abort {
    Cancelled,
    Failed(ClientError),
}

/// Owns the remote session and channel handles of one session generation.
pub struct SessionLifecycle {
    client: Arc<dyn ChatClient>,
    config: SessionConfig,
    status: watch::Sender<SetupStatus>,
    session: Mutex<Option<ChatSession>>,
    channel: Mutex<Option<Arc<dyn ChannelStream>>>,
    started: AtomicBool,
}

impl SessionLifecycle {
    pub fn new(client: Arc<dyn ChatClient>, config: SessionConfig) -> Self {
        let (status, _) = watch::channel(SetupStatus::of(SetupPhase::Connecting));
        Self {
            client,
            config,
            status,
            session: Mutex::new(None),
            channel: Mutex::new(None),
            started: AtomicBool::new(false),
        }
    }

    /// Current status snapshot.
    pub fn status(&self) -> SetupStatus {
        self.status.borrow().clone()
    }

    pub fn phase(&self) -> SetupPhase {
        self.status.borrow().phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == SetupPhase::Ready
    }

    /// Receiver notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<SetupStatus> {
        self.status.subscribe()
    }

    pub fn session(&self) -> Option<ChatSession> {
        self.session.lock().clone()
    }

    pub fn channel(&self) -> Option<Arc<dyn ChannelStream>> {
        self.channel.lock().clone()
    }

    /// Runs setup on a background task.
    pub fn spawn_setup(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let lifecycle = Arc::clone(self);
        tokio::spawn(async move { lifecycle.run_setup(&cancel).await })
    }

    /// Drives setup to `Ready` or `Error`. Only the first call does anything.
    pub async fn run_setup(&self, cancel: &CancellationToken) {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Session setup already started; ignoring");
            return;
        }

        match self.drive(cancel).await {
            Ok(()) => info!("Session ready"),
            Err(Abort::Cancelled) => debug!("Session setup cancelled"),
            Err(Abort::Failed(e)) => {
                warn!("Session setup failed: {e}");
                self.fail(&e);
            }
        }
    }

    async fn drive(&self, cancel: &CancellationToken) -> Result<(), Abort> {
        live(cancel)?;
        self.enter(SetupPhase::Connecting);
        let client = Arc::clone(&self.client);
        let reaper = Arc::clone(&self.client);
        let config = self.config.clone();
        let session = until_cancelled(
            cancel,
            async move { client.create_session(&config).await },
            move |created| async move {
                if let Ok(Some(session)) = created {
                    stop_session(reaper.as_ref(), &session).await;
                }
            },
        )
        .await?
        .map_err(Abort::Failed)?;
        *self.session.lock() = session.clone();

        if let Some(actor_id) = session.as_ref().and_then(|s| s.chat_actor_id.clone()) {
            self.enter(SetupPhase::OpeningChannel);
            let client = Arc::clone(&self.client);
            let channel = until_cancelled(
                cancel,
                async move { client.open_channel_stream(&actor_id).await },
                |opened| async move {
                    if let Ok(Some(channel)) = opened {
                        release_channel(channel.as_ref());
                    }
                },
            )
            .await?
            .map_err(Abort::Failed)?;
            *self.channel.lock() = channel;
        }

        self.enter(SetupPhase::LoadingActor);
        if let Some(session) = session {
            let client = Arc::clone(&self.client);
            let actor = session.domain_actor;
            // handles stay with the lifecycle; cleanup releases them
            until_cancelled(
                cancel,
                async move { client.start_chat(&actor).await },
                |_| async {},
            )
            .await?
            .map_err(Abort::Failed)?;
        }

        self.enter(SetupPhase::Ready);
        Ok(())
    }

    fn enter(&self, phase: SetupPhase) {
        self.status.send_if_modified(|status| {
            if status.phase.is_terminal() || status.phase == phase {
                return false;
            }
            debug!(from = %status.phase, to = %phase, "Setup phase transition");
            *status = SetupStatus::of(phase);
            true
        });
    }

    fn fail(&self, error: &ClientError) {
        self.status.send_if_modified(|status| {
            if status.phase.is_terminal() {
                return false;
            }
            *status = SetupStatus {
                phase: SetupPhase::Error,
                message: format!("Error: {error}"),
            };
            true
        });
    }

    /// Delegates to the backend once a session exists.
    pub async fn send_message(&self, text: &str) -> Result<Value, SessionError> {
        let actor = self
            .session
            .lock()
            .as_ref()
            .map(|s| s.domain_actor.clone())
            .ok_or(SessionError::NotReady)?;
        match self.client.send_message(&actor, text).await {
            Err(ClientError::Unsupported(_)) => Err(SessionError::NotReady),
            result => Ok(result?),
        }
    }

    /// Closes the channel, then stops the remote session. Idempotent; errors
    /// are logged and dropped.
    pub async fn cleanup(&self) {
        let channel = self.channel.lock().take();
        if let Some(channel) = channel {
            release_channel(channel.as_ref());
        }
        let session = self.session.lock().take();
        if let Some(session) = session {
            stop_session(self.client.as_ref(), &session).await;
        }
    }
}

fn live(cancel: &CancellationToken) -> Result<(), Abort> {
    if cancel.is_cancelled() {
        Err(Abort::Cancelled)
    } else {
        Ok(())
    }
}

/// Awaits `call` unless `cancel` fires first. An abandoned call keeps running
/// on its own task and its output goes to `reap`.
async fn until_cancelled<T, F, R, Fut>(
    cancel: &CancellationToken,
    call: F,
    reap: R,
) -> Result<T, Abort>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
    R: FnOnce(T) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    live(cancel)?;
    let mut call = Box::pin(call);
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tokio::spawn(async move { reap(call.await).await });
            Err(Abort::Cancelled)
        }
        output = &mut call => Ok(output),
    }
}

async fn stop_session(client: &dyn ChatClient, session: &ChatSession) {
    match client.stop_actor(&session.domain_actor).await {
        Ok(()) => debug!(actor = %session.domain_actor, "Stopped session actor"),
        Err(e) => debug!(actor = %session.domain_actor, "Ignoring stop failure: {e}"),
    }
}

fn release_channel(channel: &dyn ChannelStream) {
    match channel.close() {
        Ok(()) => debug!(channel = channel.channel_id(), "Closed channel"),
        Err(e) => debug!(channel = channel.channel_id(), "Ignoring close failure: {e}"),
    }
}
