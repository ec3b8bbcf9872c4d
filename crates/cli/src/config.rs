use proto::{
    ActorSpec, ConfigError, InputMode, SessionConfig, ToolDisplayMode, UiVariant,
    ValidationReport,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up in the working directory.
const LOCAL_CONFIG_FILE: &str = "termchat.toml";
/// Per-user state directory under `$HOME`.
const HOME_DIR_NAME: &str = ".termchat";

/// Top-level configuration file shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Presentation settings.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Presentation settings for the interactive surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Requested input presentation (`simple`, `multiline`, `auto`).
    #[serde(default)]
    pub input_mode: InputMode,
    /// Character count above which `auto` switches to multi-line.
    #[serde(default = "default_multiline_threshold")]
    pub multiline_threshold: usize,
    /// Visible lines of the multi-line editor.
    #[serde(default = "default_max_height")]
    pub max_height: usize,
    #[serde(default)]
    pub tool_display: ToolDisplayMode,
    #[serde(default)]
    pub variant: UiVariant,
    #[serde(default)]
    pub show_timestamps: bool,
    /// Header title.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_multiline_threshold() -> usize {
    input::DEFAULT_MULTILINE_THRESHOLD
}

fn default_max_height() -> usize {
    6
}

fn default_title() -> String {
    "termchat".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            input_mode: InputMode::default(),
            multiline_threshold: default_multiline_threshold(),
            max_height: default_max_height(),
            tool_display: ToolDisplayMode::default(),
            variant: UiVariant::default(),
            show_timestamps: false,
            title: default_title(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, `./termchat.toml`, or
    /// `~/.termchat/config.toml`, then applies `TERMCHAT_*` overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path.map(|p| p.to_path_buf()).or_else(|| {
            let cwd = std::env::current_dir().ok()?.join(LOCAL_CONFIG_FILE);
            if cwd.exists() {
                return Some(cwd);
            }
            let home_config = Self::home_dir()?.join("config.toml");
            if home_config.exists() {
                return Some(home_config);
            }
            None
        });
        debug!(path = ?config_path, "Config file resolved");

        let mut config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(&path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(|e| ConfigError::Toml(e.to_string()))?
        } else {
            Config::default()
        };

        if let Ok(server) = std::env::var("TERMCHAT_SERVER") {
            config.session.server = Some(server);
        }
        if let Ok(manifest) = std::env::var("TERMCHAT_MANIFEST") {
            config.set_manifest(manifest);
        }
        if let Ok(mode) = std::env::var("TERMCHAT_INPUT_MODE") {
            match mode.parse::<InputMode>() {
                Ok(mode) => config.ui.input_mode = mode,
                Err(e) => warn!("Ignoring TERMCHAT_INPUT_MODE: {e}"),
            }
        }
        if let Ok(threshold) = std::env::var("TERMCHAT_MULTILINE_THRESHOLD") {
            match threshold.parse::<usize>() {
                Ok(n) => config.ui.multiline_threshold = n,
                Err(e) => warn!("Ignoring TERMCHAT_MULTILINE_THRESHOLD: {e}"),
            }
        }

        debug!(
            server = ?config.session.server,
            manifest = ?config.session.actor.as_ref().map(|a| &a.manifest_path),
            input_mode = ?config.ui.input_mode,
            "Config loaded"
        );
        Ok(config)
    }

    /// Applies command-line overrides, which beat both file and environment.
    pub fn with_overrides(mut self, server: Option<String>, manifest: Option<String>) -> Self {
        if let Some(server) = server {
            self.session.server = Some(server);
        }
        if let Some(manifest) = manifest {
            self.set_manifest(manifest);
        }
        self
    }

    /// Validates the merged session settings and UI bounds.
    pub fn validate(&self) -> ValidationReport {
        let mut report = self.session.validate();
        if self.ui.max_height == 0 {
            report
                .errors
                .push("ui.max_height must be at least 1".to_string());
        }
        report.valid = report.errors.is_empty();
        report
    }

    fn set_manifest(&mut self, manifest_path: String) {
        match self.session.actor.as_mut() {
            Some(actor) => actor.manifest_path = manifest_path,
            None => {
                self.session.actor = Some(ActorSpec {
                    manifest_path,
                    initial_state: None,
                })
            }
        }
    }

    /// `~/.termchat`, when `HOME` is set.
    pub fn home_dir() -> Option<PathBuf> {
        let home = std::env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(HOME_DIR_NAME))
    }

    /// Directory for `--debug` log files.
    pub fn log_dir() -> PathBuf {
        Self::home_dir()
            .unwrap_or_else(|| PathBuf::from(HOME_DIR_NAME))
            .join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScopedEnv, set_env_var, with_locked_env};
    use proto::DEFAULT_SERVER;

    const ENV_KEYS: [&str; 5] = [
        "TERMCHAT_SERVER",
        "TERMCHAT_MANIFEST",
        "TERMCHAT_INPUT_MODE",
        "TERMCHAT_MULTILINE_THRESHOLD",
        "HOME",
    ];

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, content).expect("write config");
    }

    #[test]
    fn default_config_has_expected_values() {
        let cfg = Config::default();
        assert_eq!(cfg.session.server.as_deref(), Some(DEFAULT_SERVER));
        assert_eq!(cfg.ui.input_mode, InputMode::Auto);
        assert_eq!(cfg.ui.multiline_threshold, 50);
        assert_eq!(cfg.ui.max_height, 6);
        assert_eq!(cfg.ui.tool_display, ToolDisplayMode::Minimal);
        assert_eq!(cfg.ui.variant, UiVariant::Default);
        assert!(!cfg.ui.show_timestamps);
        assert!(cfg.validate().valid);
    }

    #[test]
    fn load_reads_explicit_file_path() {
        with_locked_env(|| {
            let _env = ScopedEnv::cleared(&ENV_KEYS);
            let tmp = tempfile::tempdir().expect("tempdir");
            let config_path = tmp.path().join("custom.toml");
            write_file(
                &config_path,
                r#"
[session]
server = "10.0.0.5:9100"

[session.actor]
manifest_path = "actors/chat/manifest.toml"

[ui]
input_mode = "multiline"
multiline_threshold = 80
max_height = 10
tool_display = "full"
variant = "git"
show_timestamps = true
title = "Git Chat"
"#,
            );
            let cfg = Config::load(Some(&config_path)).expect("config should parse");
            assert_eq!(cfg.session.server.as_deref(), Some("10.0.0.5:9100"));
            assert_eq!(
                cfg.session.actor.as_ref().map(|a| a.manifest_path.as_str()),
                Some("actors/chat/manifest.toml")
            );
            assert_eq!(cfg.ui.input_mode, InputMode::Multiline);
            assert_eq!(cfg.ui.multiline_threshold, 80);
            assert_eq!(cfg.ui.max_height, 10);
            assert_eq!(cfg.ui.tool_display, ToolDisplayMode::Full);
            assert_eq!(cfg.ui.variant, UiVariant::Git);
            assert!(cfg.ui.show_timestamps);
            assert_eq!(cfg.ui.title, "Git Chat");
        });
    }

    #[test]
    fn partial_ui_section_keeps_defaults() {
        with_locked_env(|| {
            let _env = ScopedEnv::cleared(&ENV_KEYS);
            let tmp = tempfile::tempdir().expect("tempdir");
            let config_path = tmp.path().join("config.toml");
            write_file(&config_path, "[ui]\nvariant = \"chat\"\n");
            let cfg = Config::load(Some(&config_path)).expect("config should parse");
            assert_eq!(cfg.ui.variant, UiVariant::Chat);
            assert_eq!(cfg.ui.multiline_threshold, 50);
            assert_eq!(cfg.ui.title, "termchat");
            assert_eq!(cfg.session.server.as_deref(), Some(DEFAULT_SERVER));
        });
    }

    #[test]
    fn load_reports_toml_errors() {
        with_locked_env(|| {
            let _env = ScopedEnv::cleared(&ENV_KEYS);
            let tmp = tempfile::tempdir().expect("tempdir");
            let config_path = tmp.path().join("config.toml");
            write_file(&config_path, "[ui\nbroken");
            let err = Config::load(Some(&config_path)).expect_err("invalid toml");
            assert!(matches!(err, ConfigError::Toml(_)));
        });
    }

    #[test]
    fn load_reports_missing_explicit_file() {
        with_locked_env(|| {
            let _env = ScopedEnv::cleared(&ENV_KEYS);
            let tmp = tempfile::tempdir().expect("tempdir");
            let err = Config::load(Some(&tmp.path().join("absent.toml"))).expect_err("missing");
            assert!(matches!(err, ConfigError::Io(_)));
        });
    }

    #[test]
    fn env_overrides_file_values() {
        with_locked_env(|| {
            let _env = ScopedEnv::cleared(&ENV_KEYS);
            let tmp = tempfile::tempdir().expect("tempdir");
            let config_path = tmp.path().join("config.toml");
            write_file(&config_path, "[session]\nserver = \"file:1\"\n");

            set_env_var("TERMCHAT_SERVER", "env:2");
            set_env_var("TERMCHAT_MANIFEST", "env/manifest.toml");
            set_env_var("TERMCHAT_INPUT_MODE", "simple");
            set_env_var("TERMCHAT_MULTILINE_THRESHOLD", "12");
            let cfg = Config::load(Some(&config_path)).expect("config should parse");

            assert_eq!(cfg.session.server.as_deref(), Some("env:2"));
            assert_eq!(
                cfg.session.actor.map(|a| a.manifest_path),
                Some("env/manifest.toml".to_string())
            );
            assert_eq!(cfg.ui.input_mode, InputMode::Simple);
            assert_eq!(cfg.ui.multiline_threshold, 12);
        });
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        with_locked_env(|| {
            let _env = ScopedEnv::cleared(&ENV_KEYS);
            let tmp = tempfile::tempdir().expect("tempdir");
            let config_path = tmp.path().join("config.toml");
            write_file(&config_path, "");

            set_env_var("TERMCHAT_INPUT_MODE", "sideways");
            set_env_var("TERMCHAT_MULTILINE_THRESHOLD", "many");
            let cfg = Config::load(Some(&config_path)).expect("config should parse");

            assert_eq!(cfg.ui.input_mode, InputMode::Auto);
            assert_eq!(cfg.ui.multiline_threshold, 50);
        });
    }

    #[test]
    fn home_config_is_used_when_no_path_given() {
        with_locked_env(|| {
            let _env = ScopedEnv::cleared(&ENV_KEYS);
            let tmp = tempfile::tempdir().expect("tempdir");
            let original_cwd = std::env::current_dir().expect("cwd");
            let work = tmp.path().join("work");
            std::fs::create_dir_all(&work).expect("work dir");
            std::env::set_current_dir(&work).expect("chdir");
            set_env_var("HOME", tmp.path().to_str().unwrap());
            write_file(
                &tmp.path().join(".termchat").join("config.toml"),
                "[ui]\ntitle = \"from home\"\n",
            );

            let cfg = Config::load(None).expect("config should parse");
            assert_eq!(cfg.ui.title, "from home");

            std::env::set_current_dir(original_cwd).expect("restore cwd");
        });
    }

    #[test]
    fn cli_overrides_beat_environment() {
        let mut cfg = Config::default();
        cfg.session.server = Some("env:2".into());
        let cfg = cfg.with_overrides(Some("cli:3".into()), Some("cli/manifest.toml".into()));
        assert_eq!(cfg.session.server.as_deref(), Some("cli:3"));
        assert_eq!(
            cfg.session.actor.map(|a| a.manifest_path),
            Some("cli/manifest.toml".to_string())
        );
    }

    #[test]
    fn manifest_override_keeps_initial_state() {
        let mut cfg = Config::default();
        cfg.session.actor = Some(ActorSpec {
            manifest_path: "old.toml".into(),
            initial_state: Some(serde_json::json!({"k": 1})),
        });
        let cfg = cfg.with_overrides(None, Some("new.toml".into()));
        let actor = cfg.session.actor.expect("actor");
        assert_eq!(actor.manifest_path, "new.toml");
        assert_eq!(actor.initial_state, Some(serde_json::json!({"k": 1})));
    }

    #[test]
    fn validate_collects_session_and_ui_errors() {
        let mut cfg = Config::default();
        cfg.session.server = None;
        cfg.ui.max_height = 0;
        let report = cfg.validate();
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn log_dir_lives_under_home() {
        with_locked_env(|| {
            let _env = ScopedEnv::cleared(&["HOME"]);
            set_env_var("HOME", "/tmp/termchat-test-home");
            assert_eq!(
                Config::log_dir(),
                PathBuf::from("/tmp/termchat-test-home/.termchat/logs")
            );
        });
    }
}
