use proto::{ActorSpec, ChatMessage, Role, SessionConfig, SetupPhase, ToolDisplayMode};

#[test]
fn session_config_json_contract() {
    let raw = serde_json::json!({
        "actor": {
            "manifest_path": "actors/chat/manifest.toml",
            "initial_state": {"system": "be brief"}
        },
        "config": {"model": "small"}
    });

    let config: SessionConfig = serde_json::from_value(raw).expect("parse session config");
    assert_eq!(config.server, None);
    let actor = config.actor.as_ref().expect("actor should exist");
    assert_eq!(actor.manifest_path, "actors/chat/manifest.toml");
    assert_eq!(
        actor.initial_state,
        Some(serde_json::json!({"system": "be brief"}))
    );
    assert!(config.validate().valid);

    let serialized = serde_json::to_value(&config).expect("serialize");
    let reparsed: SessionConfig = serde_json::from_value(serialized).expect("reparse");
    assert_eq!(reparsed, config);
}

#[test]
fn session_config_rejects_wrong_manifest_shape_without_throwing() {
    let config = SessionConfig {
        server: None,
        actor: Some(ActorSpec {
            manifest_path: "manifest.yaml".to_string(),
            initial_state: None,
        }),
        config: None,
    };
    let report = config.validate();
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn chat_message_wire_shape_uses_lowercase_tags() {
    let msg = ChatMessage::tool("read_file", vec!["src/lib.rs".to_string()]);
    let value = serde_json::to_value(&msg).expect("serialize message");
    assert_eq!(value["role"], "tool");
    assert_eq!(value["status"], "complete");
    assert_eq!(value["tool_name"], "read_file");
    assert_eq!(value["tool_args"][0], "src/lib.rs");

    let parsed: ChatMessage = serde_json::from_value(value).expect("parse message");
    assert_eq!(parsed.role, Role::Tool);
}

#[test]
fn phase_and_tool_display_tags() {
    assert_eq!(
        serde_json::to_value(SetupPhase::OpeningChannel).expect("phase"),
        "opening_channel"
    );
    assert_eq!(
        serde_json::to_value(ToolDisplayMode::Hidden).expect("mode"),
        "hidden"
    );
}
