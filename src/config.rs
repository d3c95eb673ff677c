//! Layered configuration.
//!
//! Priority, lowest first: built-in defaults, YAML file (`--config` /
//! `CONFIG_FILE`, else `./config.yaml` when present), `MEDISCHEDULE_`
//! environment variables (`MEDISCHEDULE_SERVER__PORT=8080`), CLI flags.

use std::path::Path;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::ui::input::DEFAULT_PLACEHOLDER;

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the scheduling backend
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub ui: UiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Scheme and authority of the backend, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Path of the chat endpoint.
    pub chat_path: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// Directory served under `/static`.
    pub static_dir: String,
    /// How long an error toast stays visible.
    pub toast_timeout_ms: u64,
    /// Placeholder of the message input.
    pub placeholder: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Sessions idle for longer are dropped.
    pub idle_timeout_secs: u64,
    /// Optional instruction prepended to every payload.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("backend.base_url", "http://localhost:8000")?
            .set_default("backend.chat_path", "/api/chat")?
            .set_default("backend.timeout_secs", 60)?
            .set_default("ui.static_dir", "static")?
            .set_default("ui.toast_timeout_ms", 5000)?
            .set_default(
                "ui.placeholder",
                "Ask about appointments, clinic info, or anything else...",
            )?
            .set_default("session.idle_timeout_secs", 30 * 60)?
            .set_default("logging.json", false)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::from(Path::new(CWD_CONFIG_FILE)));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEDISCHEDULE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        if cfg.ui.placeholder.trim().is_empty() {
            cfg.ui.placeholder = DEFAULT_PLACEHOLDER.to_string();
        }
        Ok(cfg)
    }

    /// Address the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
