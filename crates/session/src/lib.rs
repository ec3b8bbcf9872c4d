//! Remote chat session management.
//!
//! [`SessionLifecycle`] drives a [`ChatClient`] through session creation,
//! channel opening and chat start, and tears everything down again.
//! [`LoopbackClient`] is an in-process backend for local use and tests.

pub mod client;
pub mod lifecycle;
pub mod loopback;
pub mod payload;

pub use client::{ChannelStream, ChatClient};
pub use lifecycle::{SessionLifecycle, SetupStatus};
pub use loopback::{LoopbackChannel, LoopbackClient};
pub use payload::{
    ChannelPayload, ExtractedContent, ToolBlock, extract_message_content, parse_channel_payload,
};
