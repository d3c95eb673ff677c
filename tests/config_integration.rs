use medischedule_chat::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;

const BIN: &str = "medischedule-chat";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("MEDISCHEDULE_SERVER__PORT");
        env::remove_var("MEDISCHEDULE_BACKEND__BASE_URL");
        env::remove_var("MEDISCHEDULE_SESSION__SYSTEM_PROMPT");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("BACKEND_URL");
        env::remove_var("LOG_JSON");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).unwrap();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.backend.base_url, "http://localhost:8000");
    assert_eq!(config.backend.chat_path, "/api/chat");
    assert_eq!(config.ui.toast_timeout_ms, 5000);
    assert_eq!(
        config.ui.placeholder,
        "Ask about appointments, clinic info, or anything else..."
    );
    assert_eq!(config.session.system_prompt, None);
    assert!(!config.logging.json);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("MEDISCHEDULE_SERVER__PORT", "9090");
        env::set_var("MEDISCHEDULE_SESSION__SYSTEM_PROMPT", "Be brief.");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.session.system_prompt.as_deref(), Some("Be brief."));

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        r#"
server:
  port: 7070
backend:
  base_url: "http://scheduler.internal:8000"
ui:
  placeholder: ""
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let config =
        AppConfig::load_from_args([BIN, "--config", path]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.backend.base_url, "http://scheduler.internal:8000");
    // Blank placeholder falls back to the input default.
    assert_eq!(config.ui.placeholder, "Type your message...");
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("MEDISCHEDULE_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args([
        BIN,
        "--port",
        "4040",
        "--backend-url",
        "http://10.0.0.5:8000",
    ])
    .unwrap();
    assert_eq!(config.server.port, 4040);
    assert_eq!(config.backend.base_url, "http://10.0.0.5:8000");
    assert_eq!(config.bind_address(), "0.0.0.0:4040");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let config_content = r#"
server:
  port: 6060
    "#;
    let cwd_path = "config.yaml";
    fs::write(cwd_path, config_content).expect("Failed to write ./config.yaml");

    let config = AppConfig::load_from_args([BIN]);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        assert_eq!(config.unwrap().server.port, 6060);
    }));

    fs::remove_file(cwd_path).unwrap();

    if let Err(e) = result {
        std::panic::resume_unwind(e);
    }
}
