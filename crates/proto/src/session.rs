use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default backend address used when nothing else is configured.
pub const DEFAULT_SERVER: &str = "127.0.0.1:9000";

/// One discrete state of the session-setup state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupPhase {
    /// Creating the remote session.
    #[default]
    Connecting,
    /// Opening the streaming channel.
    OpeningChannel,
    /// Starting remote chat automation.
    LoadingActor,
    /// Setup finished; the session accepts messages.
    Ready,
    /// Setup failed; terminal.
    Error,
}

impl SetupPhase {
    /// Fixed human-readable description of the phase.
    pub fn status_message(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting to the backend...",
            Self::OpeningChannel => "Opening communication channel...",
            Self::LoadingActor => "Starting chat automation...",
            Self::Ready => "Chat ready!",
            Self::Error => "Connection failed",
        }
    }

    /// `Ready` and `Error` admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }

    /// Whether a progress spinner belongs next to the status.
    pub fn shows_spinner(self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for SetupPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::OpeningChannel => "opening_channel",
            Self::LoadingActor => "loading_actor",
            Self::Ready => "ready",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Actor to launch when no running server session is reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSpec {
    /// Path to the actor manifest (`.toml`).
    pub manifest_path: String,
    /// Optional initial state handed to the actor.
    #[serde(default)]
    pub initial_state: Option<serde_json::Value>,
}

/// Connection settings consumed by the session lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Backend address (`host:port`).
    #[serde(default)]
    pub server: Option<String>,
    /// Actor to start.
    #[serde(default)]
    pub actor: Option<ActorSpec>,
    /// Opaque backend-specific settings.
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server: Some(DEFAULT_SERVER.to_string()),
            actor: None,
            config: None,
        }
    }
}

impl SessionConfig {
    /// Checks the configuration shape. Never fails; the caller decides.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();
        let server = self.server.as_deref().filter(|s| !s.trim().is_empty());
        let manifest = self
            .actor
            .as_ref()
            .map(|a| a.manifest_path.as_str())
            .filter(|p| !p.trim().is_empty());

        if server.is_none() && manifest.is_none() {
            errors.push("Either server address or actor manifest path is required".to_string());
        }
        if let Some(path) = manifest
            && !path.ends_with(".toml")
        {
            errors.push("Actor manifest path should point to a .toml file".to_string());
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Outcome of [`SessionConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Opaque reference to a remote actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorHandle(pub String);

impl ActorHandle {
    /// Returns the raw actor identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActorHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ActorHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Session returned by the backend's session-creation capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Actor driving the conversation.
    pub domain_actor: ActorHandle,
    /// Actor whose channel streams chat output, if any.
    pub chat_actor_id: Option<String>,
}

/// Generates a unique actor id: `{prefix}-{base36 millis}-{6 random chars}`.
pub fn generate_actor_id(prefix: &str) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let mut rng = rand::thread_rng();
    let random: String = (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{prefix}-{}-{random}", to_base36(millis))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
