// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{builder::ValueParser, Parser, ValueEnum};
use std::{collections::HashSet, fmt, path::PathBuf, sync::LazyLock};
use url::Url;

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Debug, Parser)]
#[clap(
    name = "campaign-mailer",
    about = "Compose marketing emails from free-form text, preview them and send them in bulk over SMTP.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// Log level (default: "info")
    #[clap(long, default_value = "info", env, help = "Set the log level")]
    pub mailer_log_level: String,

    /// HTTP port (default: 15630)
    #[clap(long, default_value = "15630", env, help = "Set the HTTP port")]
    pub mailer_http_port: u16,

    #[clap(
        long,
        env,
        default_value = "0.0.0.0",
        help = "The IPv4 address the HTTP server binds to",
        value_parser = ValueParser::new(|s: &str| {
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub mailer_bind_ip: String,

    #[clap(
        long,
        env,
        help = "Directory holding the log database, log files and staged attachments",
        value_parser = ValueParser::new(|s: &str| {
            let path = PathBuf::from(s);
            if !path.is_absolute() {
                return Err("Path must be an absolute directory path".to_string());
            }
            if !path.exists() {
                return Err(format!("Path {:?} does not exist", path));
            }
            if !path.is_dir() {
                return Err(format!("Path {:?} is not a directory", path));
            }
            Ok(s.to_string())
        })
    )]
    pub mailer_root_dir: String,

    #[clap(
        long,
        default_value = "http://localhost:5173, *",
        env,
        help = "Allowed CORS origins (comma-separated list)",
        value_parser = ValueParser::new(|s: &str| -> Result<HashSet<String>, String> {
            let set: HashSet<String> = s.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            Ok(set)
        })
    )]
    pub mailer_cors_origins: HashSet<String>,

    #[clap(long, default_value = "86400", env, help = "CORS max age in seconds")]
    pub mailer_cors_max_age: i32,

    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub mailer_ansi_logs: bool,

    /// If false, logs are printed to stdout
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable log file output (otherwise logs go to stdout)"
    )]
    pub mailer_log_to_file: bool,

    #[clap(long, default_value = "false", env, help = "Enable JSON formatted logs")]
    pub mailer_json_logs: bool,

    #[clap(
        long,
        default_value = "5",
        env,
        help = "Maximum number of rolled server log files"
    )]
    pub mailer_max_server_log_files: usize,

    #[clap(
        long,
        default_value = "true",
        env,
        help = "Enable response compression for the HTTP server"
    )]
    pub mailer_http_compression_enabled: bool,

    #[clap(
        long,
        env,
        default_value = "33554432",
        help = "Cache size for the delivery log database in bytes"
    )]
    pub mailer_log_cache_size: usize,

    #[clap(long, env, help = "SMTP server host name")]
    pub smtp_server: Option<String>,

    #[clap(long, env, default_value = "587", help = "SMTP server port")]
    pub smtp_port: u16,

    #[clap(long, env, help = "Sender mailbox, also used as SMTP login")]
    pub smtp_email: Option<String>,

    #[clap(long, env, hide_env_values = true, help = "SMTP password")]
    pub smtp_password: Option<String>,

    #[clap(
        long,
        env,
        default_value = "starttls",
        help = "Transport encryption for the SMTP connection"
    )]
    pub smtp_encryption: Encryption,

    #[clap(
        long,
        env,
        default_value = "60",
        help = "Socket timeout for SMTP sends, in seconds",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub smtp_timeout_secs: u64,

    #[clap(
        long,
        env,
        hide_env_values = true,
        help = "API key for the chat-completions endpoint; leave unset to disable rewriting"
    )]
    pub openai_api_key: Option<String>,

    #[clap(
        long,
        env,
        default_value = "https://api.openai.com/v1",
        help = "Base URL of the chat-completions API",
        value_parser = ValueParser::new(|s: &str| -> Result<String, String> {
            Url::parse(s).map_err(|_| format!("Invalid URL for openai_base_url: {}", s))?;
            Ok(s.trim_end_matches('/').to_string())
        })
    )]
    pub openai_base_url: String,

    #[clap(long, env, default_value = "gpt-3.5-turbo", help = "Chat model name")]
    pub openai_model: String,

    #[clap(
        long,
        env,
        default_value = "30",
        help = "Request timeout for the chat-completions API, in seconds"
    )]
    pub openai_timeout_secs: u64,

    #[clap(long, env, help = "Fallback image shown in styled fragments")]
    pub animated_gif_url: Option<String>,

    #[clap(long, env, help = "Small icon rendered inside call-to-action buttons")]
    pub cta_pulse_url: Option<String>,

    #[clap(
        long,
        env,
        default_value = "https://www.eduaihub.in/demo",
        help = "Link used by the demo call-to-action"
    )]
    pub default_cta_link: String,

    #[clap(
        long,
        env,
        default_value = "4",
        help = "Number of send tasks processed concurrently",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub send_concurrency: u16,

    #[clap(
        long,
        env,
        default_value = "100",
        help = "Delay between two recipients of the same task, in milliseconds"
    )]
    pub send_interval_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Encryption {
    #[clap(name = "starttls")]
    StartTls,
    #[clap(name = "ssl")]
    Ssl,
    #[clap(name = "none")]
    None,
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encryption::StartTls => write!(f, "starttls"),
            Encryption::Ssl => write!(f, "ssl"),
            Encryption::None => write!(f, "none"),
        }
    }
}

impl Settings {
    pub fn llm_enabled(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    #[cfg(test)]
    fn new_for_test() -> Self {
        Self {
            mailer_log_level: "info".to_string(),
            mailer_http_port: 15630,
            mailer_bind_ip: "0.0.0.0".to_string(),
            mailer_root_dir: std::env::temp_dir()
                .join("campaign_mailer_test")
                .to_string_lossy()
                .into_owned(),
            mailer_cors_origins: Default::default(),
            mailer_cors_max_age: 86400,
            mailer_ansi_logs: false,
            mailer_log_to_file: false,
            mailer_json_logs: false,
            mailer_max_server_log_files: 5,
            mailer_http_compression_enabled: true,
            mailer_log_cache_size: 33554432,
            smtp_server: None,
            smtp_port: 587,
            smtp_email: None,
            smtp_password: None,
            smtp_encryption: Encryption::StartTls,
            smtp_timeout_secs: 60,
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            openai_timeout_secs: 30,
            animated_gif_url: None,
            cta_pulse_url: None,
            default_cta_link: "https://www.eduaihub.in/demo".to_string(),
            send_concurrency: 2,
            send_interval_ms: 0,
        }
    }
}
