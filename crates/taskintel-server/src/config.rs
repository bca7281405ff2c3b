use std::path::Path;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "taskintel-server", about = "Task intelligence agent service")]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, env = "TASKINTEL_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Listening port
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Gemini API key. Without it the server still starts, but every
    /// breakdown returns the fallback plan.
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Gemini API base URL
    #[arg(
        long,
        env = "GEMINI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub gemini_base_url: String,

    /// Wall-clock limit for one agent turn (seconds)
    #[arg(long, env = "TASKINTEL_AGENT_TIMEOUT", default_value = "60")]
    pub agent_timeout: u64,

    /// Browser origin allowed to call this service
    #[arg(
        long,
        env = "TASKINTEL_ALLOWED_ORIGIN",
        default_value = "http://localhost:3000"
    )]
    pub allowed_origin: String,
}

impl ServerConfig {
    /// Wall-clock bound for one agent turn.
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout)
    }
}

/// Load KEY=VALUE pairs from a local env file into the process
/// environment. Variables that are already set win; a missing file is
/// not an error.
pub fn load_env_file(path: &Path) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if key.is_empty() || std::env::var_os(key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        let mut full = vec!["taskintel-server"];
        full.extend_from_slice(args);
        ServerConfig::parse_from(full)
    }

    #[test]
    fn explicit_flags_win() {
        let config = parse(&[
            "--bind",
            "127.0.0.1",
            "--port",
            "9090",
            "--agent-timeout",
            "5",
            "--allowed-origin",
            "http://localhost:5173",
        ]);
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.agent_timeout, 5);
        assert_eq!(config.allowed_origin, "http://localhost:5173");
    }

    #[test]
    fn turn_timeout_is_seconds() {
        let config = parse(&["--agent-timeout", "7"]);
        assert_eq!(config.turn_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn origin_default() {
        let config = parse(&[]);
        assert_eq!(config.allowed_origin, "http://localhost:3000");
    }

    #[test]
    fn env_file_sets_missing_vars() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# credentials").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "TASKINTEL_TEST_KEY_A=alpha").unwrap();
        writeln!(file, "export TASKINTEL_TEST_KEY_B=\"beta\"").unwrap();
        writeln!(file, "not a pair").unwrap();

        std::env::remove_var("TASKINTEL_TEST_KEY_A");
        std::env::remove_var("TASKINTEL_TEST_KEY_B");
        load_env_file(file.path());

        assert_eq!(std::env::var("TASKINTEL_TEST_KEY_A").unwrap(), "alpha");
        assert_eq!(std::env::var("TASKINTEL_TEST_KEY_B").unwrap(), "beta");
    }

    #[test]
    fn env_file_does_not_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "TASKINTEL_TEST_KEY_C=from_file").unwrap();

        std::env::set_var("TASKINTEL_TEST_KEY_C", "from_env");
        load_env_file(file.path());

        assert_eq!(std::env::var("TASKINTEL_TEST_KEY_C").unwrap(), "from_env");
    }

    #[test]
    fn missing_env_file_is_ignored() {
        load_env_file(Path::new("/nonexistent/.env"));
    }
}
